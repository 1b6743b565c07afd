//! proberun harness
//!
//! Discovery, execution, and reporting for dynamically loaded probe
//! modules. A probe module is one file exporting named zero-argument test
//! functions ("probes"); the harness lists a directory, loads every
//! eligible file, runs every probe with per-probe failure isolation, and
//! emits a summary plus a persisted failure log when anything failed.
//!
//! # Example
//!
//! ```no_run
//! use proberun_harness::{DiscoveredModules, FailureLog, NativeLoader, Reporter, Runner};
//! use std::path::Path;
//!
//! let mut loader = NativeLoader::new();
//! let found = DiscoveredModules::discover(Path::new("."), &mut loader);
//! let outcome = Runner::new().run(found.modules);
//!
//! Reporter::new(true).report(&outcome);
//! if let Some(log) = FailureLog::from_summary(&outcome.summary) {
//!     log.persist(Path::new("."))?;
//! }
//! # Ok::<(), proberun_harness::PersistenceError>(())
//! ```

pub mod discovery;
pub mod loader;
pub mod logfile;
pub mod module;
pub mod native;
pub mod reporter;
pub mod runner;

pub use discovery::DiscoveredModules;
pub use loader::{LoadError, MemoryLoader, ModuleLoader};
pub use logfile::{FailureLog, PersistenceError, LOG_FILE_NAME};
pub use module::{Probe, ProbeError, ProbeResult, TestModule};
pub use native::{NativeLoader, RegisterFn, REGISTER_SYMBOL};
pub use reporter::Reporter;
pub use runner::{FailureReport, ProbeRun, ProbeStatus, RunOutcome, Runner, RunSummary};
