//! Probe and module model
//!
//! A probe is a named zero-argument test function exported by a module.
//! The contract is raise-to-fail: a probe passes iff it returns `Ok(())`
//! without panicking. The historical convention where a probe signalled
//! failure by returning `false` is supported only through the
//! [`Probe::from_legacy`] adapter, which converts a `false` return into a
//! [`ProbeError`] before the runner ever sees it.

use std::fmt;
use thiserror::Error;

/// Failure raised by a probe: a human-readable message plus an optional
/// stack/trace string when the probe had one to give.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProbeError {
    message: String,
    trace: Option<String>,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    /// Attach a stack/trace string to the diagnostic.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

/// What a probe returns.
pub type ProbeResult = Result<(), ProbeError>;

/// A named zero-argument test function exported by a module.
///
/// Probes are invoked exactly once per run, strictly one at a time. They
/// may freely mutate shared fixtures; the runner never overlaps two
/// invocations.
pub struct Probe {
    name: String,
    func: Box<dyn FnMut() -> ProbeResult>,
}

impl Probe {
    /// Create a probe following the raise-to-fail contract.
    pub fn new(name: impl Into<String>, func: impl FnMut() -> ProbeResult + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    /// Adapt a legacy boolean-convention probe: a `false` return becomes a
    /// [`ProbeError`], so the runner only ever sees the raise-to-fail
    /// contract.
    pub fn from_legacy(name: impl Into<String>, mut func: impl FnMut() -> bool + 'static) -> Self {
        let name = name.into();
        let probe_name = name.clone();
        Self {
            name,
            func: Box::new(move || {
                if func() {
                    Ok(())
                } else {
                    Err(ProbeError::new(format!(
                        "probe '{}' returned false",
                        probe_name
                    )))
                }
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&mut self) -> ProbeResult {
        (self.func)()
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe").field("name", &self.name).finish()
    }
}

/// A loaded test module: the originating file's name plus its probes in
/// definition order. Modules are created fresh per discovered file and
/// never cached across runs.
#[derive(Debug, Default)]
pub struct TestModule {
    id: String,
    probes: Vec<Probe>,
}

impl TestModule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            probes: Vec::new(),
        }
    }

    /// Builder-style probe registration.
    pub fn with_probe(mut self, probe: Probe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn push(&mut self, probe: Probe) {
        self.probes.push(probe);
    }

    /// Module identifier (the file name it was loaded from).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Probe>) {
        (self.id, self.probes)
    }
}
