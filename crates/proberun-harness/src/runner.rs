//! Probe execution - run every discovered probe with per-probe isolation
//!
//! The runner is strictly sequential: probes execute one at a time, in
//! module order then definition order. Probes routinely mutate shared
//! fixtures in the system under test, so non-overlap is part of the
//! contract rather than a missed optimization.
//!
//! Isolation is the core reliability property: a probe that panics or
//! returns an error must never prevent later probes (same module or later
//! modules) from running. Each invocation goes through
//! `std::panic::catch_unwind`, with a scoped panic hook capturing the
//! panic location and backtrace for the diagnostic.

use crate::module::{Probe, TestModule};
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

/// Outcome of a single probe invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Probe returned `Ok(())` without panicking.
    Passed,
    /// Probe returned an error or panicked.
    Failed {
        message: String,
        trace: Option<String>,
    },
}

impl ProbeStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, ProbeStatus::Passed)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, ProbeStatus::Failed { .. })
    }
}

/// A completed probe invocation, tagged with its origin.
#[derive(Debug, Clone)]
pub struct ProbeRun {
    /// Identifier of the owning module (file name).
    pub module: String,
    /// Probe name.
    pub probe: String,
    pub status: ProbeStatus,
    pub duration: Duration,
}

/// Diagnostic recorded for one failed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub module: String,
    pub probe: String,
    pub message: String,
    pub trace: Option<String>,
}

/// Aggregate counters and ordered failure diagnostics for one run.
///
/// Accumulated incrementally as probes complete, consumed once at the end.
/// Invariant: `passed() + failed() == attempted()`, and every attempted
/// probe contributed exactly one outcome.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    attempted: usize,
    passed: usize,
    failures: Vec<FailureReport>,
}

impl RunSummary {
    /// Fold one completed invocation into the summary.
    pub fn record(&mut self, run: &ProbeRun) {
        self.attempted += 1;
        match &run.status {
            ProbeStatus::Passed => self.passed += 1,
            ProbeStatus::Failed { message, trace } => self.failures.push(FailureReport {
                module: run.module.clone(),
                probe: run.probe.clone(),
                message: message.clone(),
                trace: trace.clone(),
            }),
        }
        debug_assert_eq!(self.passed + self.failures.len(), self.attempted);
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failure diagnostics in execution order.
    pub fn failures(&self) -> &[FailureReport] {
        &self.failures
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A completed run: every invocation in execution order plus the summary.
#[derive(Debug)]
pub struct RunOutcome {
    pub runs: Vec<ProbeRun>,
    pub summary: RunSummary,
}

/// Sequential probe runner.
#[derive(Debug, Default)]
pub struct Runner;

impl Runner {
    pub fn new() -> Self {
        Self
    }

    /// Run every probe in every module, in order, isolating each call.
    pub fn run(&self, modules: Vec<TestModule>) -> RunOutcome {
        let mut runs = Vec::new();
        let mut summary = RunSummary::default();

        for module in modules {
            let (id, probes) = module.into_parts();
            for mut probe in probes {
                let run = self.run_probe(&id, &mut probe);
                summary.record(&run);
                runs.push(run);
            }
        }

        RunOutcome { runs, summary }
    }

    fn run_probe(&self, module: &str, probe: &mut Probe) -> ProbeRun {
        let start = Instant::now();
        let outcome = panic_trap::call(AssertUnwindSafe(|| probe.invoke()));
        let duration = start.elapsed();

        let status = match outcome {
            Ok(Ok(())) => ProbeStatus::Passed,
            Ok(Err(e)) => ProbeStatus::Failed {
                message: e.message().to_string(),
                trace: e.trace().map(str::to_string),
            },
            Err(panic) => ProbeStatus::Failed {
                message: panic.message,
                trace: panic.trace,
            },
        };

        ProbeRun {
            module: module.to_string(),
            probe: probe.name().to_string(),
            status,
            duration,
        }
    }
}

mod panic_trap {
    //! Converts a panic into a message plus captured trace.
    //!
    //! A process-wide hook is installed once; it only captures for threads
    //! currently inside a probe call and delegates to the previous hook
    //! everywhere else, so unrelated panics keep their normal output.

    use std::any::Any;
    use std::backtrace::Backtrace;
    use std::cell::{Cell, RefCell};
    use std::panic::{self, UnwindSafe};
    use std::sync::Once;

    pub struct CaughtPanic {
        pub message: String,
        pub trace: Option<String>,
    }

    thread_local! {
        static IN_PROBE: Cell<bool> = const { Cell::new(false) };
        static CAPTURED: RefCell<Option<String>> = const { RefCell::new(None) };
    }

    static INSTALL: Once = Once::new();

    fn install_hook() {
        INSTALL.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if IN_PROBE.with(Cell::get) {
                    let location = info
                        .location()
                        .map(|l| l.to_string())
                        .unwrap_or_else(|| "<unknown location>".to_string());
                    let trace = format!("panicked at {}\n{}", location, Backtrace::capture());
                    CAPTURED.with(|c| *c.borrow_mut() = Some(trace));
                } else {
                    previous(info);
                }
            }));
        });
    }

    /// Run `f`, turning an unwinding panic into a [`CaughtPanic`].
    pub fn call<T>(f: impl FnOnce() -> T + UnwindSafe) -> Result<T, CaughtPanic> {
        install_hook();
        CAPTURED.with(|c| c.borrow_mut().take());
        IN_PROBE.with(|flag| flag.set(true));
        let result = panic::catch_unwind(f);
        IN_PROBE.with(|flag| flag.set(false));
        let trace = CAPTURED.with(|c| c.borrow_mut().take());

        match result {
            Ok(value) => Ok(value),
            Err(payload) => Err(CaughtPanic {
                message: payload_message(&*payload),
                trace,
            }),
        }
    }

    fn payload_message(payload: &(dyn Any + Send)) -> String {
        if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "probe panicked".to_string()
        }
    }
}
