//! Failure log assembly and persistence
//!
//! The log is the concatenation of every failure's message and trace,
//! newline-joined, written under a fixed name in the run directory. It is
//! written only when at least one probe failed, and a fresh run overwrites
//! whatever the previous run left behind.

use crate::runner::RunSummary;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed file name the failure log is written under.
pub const LOG_FILE_NAME: &str = "test.log";

/// Failure log write errors. These occur after all probes have already
/// completed, so they are reported and never allowed to abort anything.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to write failure log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Concatenated diagnostics for all failed probes in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLog {
    contents: String,
}

impl FailureLog {
    /// Assemble the log from a run summary; `None` when nothing failed, so
    /// the "no log file on a clean run" rule falls out of the type.
    pub fn from_summary(summary: &RunSummary) -> Option<Self> {
        if summary.all_passed() {
            return None;
        }

        let blocks: Vec<String> = summary
            .failures()
            .iter()
            .map(|failure| {
                let mut block =
                    format!("{}::{}: {}", failure.module, failure.probe, failure.message);
                if let Some(trace) = &failure.trace {
                    block.push('\n');
                    block.push_str(trace);
                }
                block
            })
            .collect();

        let mut contents = blocks.join("\n");
        contents.push('\n');
        Some(Self { contents })
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Write the log to `dir/test.log`, replacing any previous run's file.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, PersistenceError> {
        let path = dir.join(LOG_FILE_NAME);
        fs::write(&path, &self.contents).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
