//! JSON output formatter for scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "fingerprint": "5+2cf24dba...",
//!       "size": 5,
//!       "digest": "2cf24dba...",
//!       "members": [
//!         {"path": "/a/x", "name": "x", "identity": "2049+131", "action": "keep"},
//!         {"path": "/b/y", "name": "y", "identity": "2049+132", "action": "remove"}
//!       ]
//!     }
//!   ],
//!   "removals": [
//!     {"path": "/b/y", "status": "removed", "error": null}
//!   ],
//!   "summary": {
//!     "total_files": 2,
//!     "duplicate_groups": 1,
//!     "exit_code": 0,
//!     "exit_code_name": "SD000"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::actions::{RemovalPolicy, ResolutionPlan};
//! use sumdedup::duplicates::DuplicateFinder;
//! use sumdedup::error::ExitCode;
//! use sumdedup::output::json::JsonOutput;
//! use std::path::PathBuf;
//!
//! let (groups, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates_in_paths(vec![PathBuf::from(".")])
//!     .unwrap();
//! let plan = ResolutionPlan::new(groups, RemovalPolicy::report_only());
//!
//! let output = JsonOutput::new(&plan, None, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;

use serde::Serialize;

use crate::actions::{PlannedMember, RemovalOutcome, RemovalReport, ResolutionPlan};
use crate::duplicates::ScanSummary;
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup<'a> {
    /// `size+sha` fingerprint string
    pub fingerprint: String,
    /// File size in bytes
    pub size: u64,
    /// SHA-256 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// Members with their planned action
    pub members: &'a [PlannedMember],
}

/// Outcome of one removal in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRemoval {
    /// Path of the marked member
    pub path: String,
    /// `removed`, `trashed`, `skipped` or `failed`
    pub status: &'static str,
    /// Failure cause, if any
    pub error: Option<String>,
}

impl JsonRemoval {
    fn from_outcome(outcome: &RemovalOutcome) -> Self {
        let (status, error) = match outcome {
            RemovalOutcome::Removed(r) if r.permanent => ("removed", None),
            RemovalOutcome::Removed(_) => ("trashed", None),
            RemovalOutcome::Skipped(_) => ("skipped", None),
            RemovalOutcome::Failed(e) => ("failed", Some(e.to_string())),
        };
        Self {
            path: outcome.path().to_string_lossy().into_owned(),
            status,
            error,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of roots walked
    pub roots: usize,
    /// Total number of files indexed
    pub total_files: usize,
    /// Total size of all indexed files in bytes
    pub total_size: u64,
    /// Number of distinct fingerprints
    pub buckets: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the first of each group)
    pub duplicate_files: usize,
    /// Total space held by those duplicates (bytes)
    pub reclaimable_space: u64,
    /// Roots whose walk was cut short, with the cause
    pub walk_failures: Vec<String>,
    /// Files skipped because they could not be read
    pub hash_failures: Vec<String>,
    /// Number of removals that failed
    pub removal_failures: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary, removal results and an exit code.
    #[must_use]
    pub fn from_scan_summary(
        summary: &ScanSummary,
        removals: Option<&RemovalReport>,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            roots: summary.roots,
            total_files: summary.total_files,
            total_size: summary.total_size,
            buckets: summary.buckets,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            walk_failures: summary
                .walk_failures
                .iter()
                .map(|f| format!("{}: {}", f.root.display(), f.error))
                .collect(),
            hash_failures: summary.hash_failures.iter().map(ToString::to_string).collect(),
            removal_failures: removals.map_or(0, RemovalReport::failure_count),
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup<'a>>,
    /// Removal outcomes, in plan order
    pub removals: Vec<JsonRemoval>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output.
    ///
    /// # Arguments
    ///
    /// * `plan` - Planned groups in report order
    /// * `removals` - Outcomes of executing the plan, if it was executed
    /// * `summary` - The scan summary statistics
    /// * `exit_code` - The exit code for this run
    ///
    /// # Example
    ///
    /// ```
    /// use sumdedup::actions::{RemovalPolicy, ResolutionPlan};
    /// use sumdedup::duplicates::ScanSummary;
    /// use sumdedup::error::ExitCode;
    /// use sumdedup::output::json::JsonOutput;
    ///
    /// let plan = ResolutionPlan::new(Vec::new(), RemovalPolicy::report_only());
    /// let output = JsonOutput::new(&plan, None, &ScanSummary::default(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// assert!(output.to_json().unwrap().starts_with('{'));
    /// ```
    #[must_use]
    pub fn new(
        plan: &'a ResolutionPlan,
        removals: Option<&RemovalReport>,
        summary: &ScanSummary,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            duplicates: plan
                .groups
                .iter()
                .map(|g| JsonDuplicateGroup {
                    fingerprint: g.fingerprint.to_string(),
                    size: g.size(),
                    digest: g.fingerprint.digest_hex(),
                    members: &g.members,
                })
                .collect(),
            removals: removals
                .map(|r| r.outcomes.iter().map(JsonRemoval::from_outcome).collect())
                .unwrap_or_default(),
            summary: JsonSummary::from_scan_summary(summary, removals, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
