use anyhow::Result;
use clap::Parser;
use colored::*;
use proberun_harness::{DiscoveredModules, FailureLog, NativeLoader, Reporter, Runner};
use std::path::PathBuf;

/// Discover and run probe modules.
///
/// Scans a directory (one level, no recursion) for probe-module dynamic
/// libraries, runs every probe they export one at a time, prints a summary,
/// and writes test.log into the scanned directory when any probe failed.
/// The exit code is non-zero iff at least one probe failed.
///
/// EXAMPLES:
///     proberun                     Run modules from the current directory
///     proberun target/probes       Run modules from a build directory
///     proberun -v --no-color       Plain, line-per-probe output
///
/// ENVIRONMENT VARIABLES:
///     NO_COLOR          Set to disable colored output
#[derive(Parser)]
#[command(name = "proberun")]
#[command(version)]
struct Cli {
    /// Directory to scan for probe modules
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Verbose output (print every probe result)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Directory to write test.log into (defaults to the scanned directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    println!("{}", "Discovering probe modules...".bold());

    let mut loader = NativeLoader::new();
    let found = DiscoveredModules::discover(&cli.dir, &mut loader);

    let reporter = Reporter::new(cli.verbose).with_no_color(cli.no_color);
    reporter.report_load_errors(&found.load_errors);

    if found.is_empty() {
        println!("{}", "No probe modules found.".yellow());
    } else {
        println!(
            "Found {} module{} with {} probe{}",
            found.module_count().to_string().bold(),
            if found.module_count() == 1 { "" } else { "s" },
            found.probe_count().to_string().bold(),
            if found.probe_count() == 1 { "" } else { "s" },
        );
        println!();
    }

    let outcome = Runner::new().run(found.modules);
    reporter.report(&outcome);

    if let Some(log) = FailureLog::from_summary(&outcome.summary) {
        let log_dir = cli.log_dir.as_deref().unwrap_or(&cli.dir);
        match log.persist(log_dir) {
            Ok(path) => reporter.report_log_written(&path),
            Err(e) => reporter.report_log_error(&e),
        }
    }

    if !outcome.summary.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
