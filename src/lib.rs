//! sumdedup - SHA-256 duplicate file finder
//!
//! Walks one or more directory trees, groups regular files by size and
//! SHA-256 digest, and reports (optionally removes) the duplicates. The
//! order of the roots decides which copy of a group is kept.
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::actions::{execute, RemovalPolicy, ResolutionPlan};
//! use sumdedup::duplicates::{DuplicateFinder, FinderConfig};
//! use sumdedup::output::TextOutput;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_parallel(true));
//! let (groups, summary) = finder
//!     .find_duplicates_in_paths(vec![PathBuf::from("/a"), PathBuf::from("/b")])
//!     .unwrap();
//!
//! let plan = ResolutionPlan::new(groups, RemovalPolicy::keep_first().with_dry_run(true));
//! TextOutput::new(&plan).write_to(&mut std::io::stdout()).unwrap();
//! let report = execute(&plan);
//! println!("{} of {} reclaimable", report.summary(), summary.reclaimable_display());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{execute, RemovalReport, ResolutionPlan};
use crate::cli::{Cli, OutputFormat};
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;

/// Run a scan with the given arguments, writing the report to stdout.
///
/// # Errors
///
/// Returns an error if a root is invalid, strict mode hit a failure, or the
/// report could not be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_writer(cli, &mut out)
}

/// Run a scan with the given arguments, writing the report to `out`.
///
/// The text report is written before any file is removed. The JSON report
/// is written afterwards since it carries the removal outcomes.
///
/// # Errors
///
/// Returns an error if a root is invalid, strict mode hit a failure, or the
/// report could not be written.
pub fn run_with_writer<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    let policy = cli.removal_policy();

    let mut config = FinderConfig::default()
        .with_parallel(cli.multithread)
        .with_sort(cli.sort)
        .with_strict(cli.strict)
        .with_dry_run(cli.dryrun)
        .with_walker_config(WalkerConfig::new(cli.detail));

    if show_progress(&cli) {
        config = config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder
        .find_duplicates_in_paths(cli.paths.clone())
        .context("Scan failed")?;

    let plan = ResolutionPlan::new(groups, policy);

    if !cli.quiet && cli.output == OutputFormat::Text {
        TextOutput::new(&plan)
            .write_to(out)
            .context("Failed to write report")?;
    }

    let removals: Option<RemovalReport> = policy.removes_anything().then(|| execute(&plan));
    let removal_failures = removals.as_ref().map_or(0, RemovalReport::failure_count);

    let exit_code =
        ExitCode::for_completed_run(!plan.is_empty(), summary.has_failures() || removal_failures > 0);

    if !cli.quiet && cli.output == OutputFormat::Json {
        JsonOutput::new(&plan, removals.as_ref(), &summary, exit_code)
            .write_to(out, true)
            .context("Failed to write JSON report")?;
    }

    log::info!(
        "{} duplicate group(s), {} duplicate file(s), {} reclaimable",
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.reclaimable_display()
    );
    // Error level so the line survives --quiet.
    if summary.has_failures() || removal_failures > 0 {
        log::error!(
            "Completed with {} walk failure(s), {} unreadable file(s), {} failed removal(s)",
            summary.walk_failures.len(),
            summary.hash_failures.len(),
            removal_failures
        );
    }

    Ok(exit_code)
}

/// Whether per-root spinners are drawn on stderr.
fn show_progress(cli: &Cli) -> bool {
    !cli.quiet && !cli.detail && !cli.no_progress && io::stderr().is_terminal()
}
