//! Command-line interface definitions for sumdedup.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates across two trees
//! sumdedup ~/photos /mnt/backup/photos
//!
//! # Walk both trees in parallel and show what --rm would delete
//! sumdedup --multithread --rm --dryrun ~/photos /mnt/backup/photos
//!
//! # JSON output for scripting
//! sumdedup --output json ~/Downloads
//!
//! # Verbose mode for debugging
//! sumdedup -v ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::actions::RemovalPolicy;

/// Find byte-identical files across directory trees by SHA-256.
///
/// Files are grouped by size and content digest. With --rm the first copy of
/// each group is kept; the order of PATH arguments decides which copy is
/// first when --sort or --multithread is given.
#[derive(Debug, Parser)]
#[command(name = "sumdedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan, in precedence order
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Print each file as it is processed
    #[arg(long)]
    pub detail: bool,

    /// Remove all duplicates except the first one of each group
    #[arg(long)]
    pub rm: bool,

    /// Remove every file that has a duplicate (all copies)
    #[arg(long = "rm-all", conflicts_with = "rm")]
    pub rm_all: bool,

    /// Do not print duplicate information
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plan and report removals without performing them
    #[arg(long)]
    pub dryrun: bool,

    /// Order each group by PATH order, then by path (first file remains with --rm)
    #[arg(long)]
    pub sort: bool,

    /// Walk each PATH on its own thread; implies --sort ordering
    #[arg(long)]
    pub multithread: bool,

    /// Move removed files to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Fail when any directory or file cannot be read
    #[arg(long)]
    pub strict: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Never draw progress spinners
    #[arg(long, env = "SUMDEDUP_NO_PROGRESS")]
    pub no_progress: bool,
}

impl Cli {
    /// Removal policy selected by the removal flags.
    #[must_use]
    pub fn removal_policy(&self) -> RemovalPolicy {
        RemovalPolicy {
            remove_all_copies: self.rm_all,
            remove_except_first: self.rm,
            dry_run: self.dryrun,
            use_trash: self.trash,
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated text blocks
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
