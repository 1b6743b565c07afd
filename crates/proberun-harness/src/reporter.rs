//! Console reporting for probe runs

use crate::loader::LoadError;
use crate::runner::{ProbeRun, ProbeStatus, RunOutcome};
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Reporter with output configuration.
///
/// Verbose mode prints one line per probe; quiet mode compresses passes and
/// failures into a dot strip. Either way the summary block and the failure
/// details come last.
///
/// `no_color` is applied per string as it is printed. The reporter never
/// touches `colored`'s process-global override, so a caller-level override
/// (the CLI sets one for its own output) stays in force.
pub struct Reporter {
    verbose: bool,
    no_color: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
        }
    }

    /// Strip styling from everything this reporter prints.
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        if self.no_color {
            text.clear()
        } else {
            text
        }
    }

    /// Report files that were eligible but could not be loaded, and
    /// directories that could not be enumerated.
    pub fn report_load_errors(&self, errors: &[(PathBuf, LoadError)]) {
        if errors.is_empty() {
            return;
        }

        eprintln!();
        eprintln!(
            "{}",
            self.paint("Failed to load module files:".yellow().bold())
        );
        for (path, error) in errors {
            eprintln!("  {} {}", self.paint("●".yellow()), path.display());
            eprintln!("    {}", self.paint(error.to_string().dimmed()));
        }
        eprintln!();
    }

    /// Report a full run: per-probe results, summary, failure details.
    pub fn report(&self, outcome: &RunOutcome) {
        let mut current_module = None::<&str>;
        for run in &outcome.runs {
            if self.verbose && current_module != Some(run.module.as_str()) {
                println!("{} {}", self.paint("Running".bold()), run.module);
                current_module = Some(run.module.as_str());
            }
            self.print_probe_result(run);
        }

        // Dot strip needs its own newline before the summary.
        if !self.verbose && !outcome.runs.is_empty() {
            println!();
        }

        println!();
        self.print_summary(outcome);
        self.print_failures(outcome);
    }

    /// Announce where the failure log landed.
    pub fn report_log_written(&self, path: &Path) {
        println!("Failure log written to {}", path.display());
    }

    /// A failed log write is console-only; the run itself already finished.
    pub fn report_log_error(&self, error: &crate::logfile::PersistenceError) {
        eprintln!("{} {}", self.paint("warning:".yellow().bold()), error);
    }

    fn print_probe_result(&self, run: &ProbeRun) {
        match &run.status {
            ProbeStatus::Passed => {
                if self.verbose {
                    println!(
                        "{} {} ({:.2?})",
                        self.paint("PASS".green().bold()),
                        run.probe,
                        run.duration
                    );
                } else {
                    print!("{}", self.paint(".".green()));
                    let _ = io::stdout().flush();
                }
            }
            ProbeStatus::Failed { .. } => {
                if self.verbose {
                    println!(
                        "{} {} ({:.2?})",
                        self.paint("FAIL".red().bold()),
                        run.probe,
                        run.duration
                    );
                } else {
                    print!("{}", self.paint("F".red().bold()));
                    let _ = io::stdout().flush();
                }
            }
        }
    }

    fn print_summary(&self, outcome: &RunOutcome) {
        let summary = &outcome.summary;

        println!("{}", "─".repeat(50));

        let status = if summary.all_passed() {
            self.paint("PASSED".green().bold())
        } else {
            self.paint("FAILED".red().bold())
        };

        println!(
            "Probe result: {} | {} attempted, {} passed, {} failed",
            status,
            self.paint(summary.attempted().to_string().bold()),
            self.paint(summary.passed().to_string().green().bold()),
            if summary.failed() > 0 {
                self.paint(summary.failed().to_string().red().bold())
            } else {
                summary.failed().to_string().normal()
            }
        );
    }

    fn print_failures(&self, outcome: &RunOutcome) {
        let failures = outcome.summary.failures();
        if failures.is_empty() {
            return;
        }

        println!();
        println!("{}", self.paint("Failures:".red().bold()));
        println!();

        for failure in failures {
            println!("  {} {}", self.paint("●".red()), failure.module);
            println!("    {}", self.paint(failure.probe.bold()));
            for line in failure.message.lines() {
                println!("      {}", self.paint(line.dimmed()));
            }
            if let Some(trace) = &failure.trace {
                for line in trace.lines() {
                    println!("      {}", self.paint(line.dimmed()));
                }
            }
            println!();
        }
    }
}
