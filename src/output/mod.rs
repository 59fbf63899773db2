//! Output formatters for scan results.
//!
//! This module provides the two report formats:
//! - Tab-separated text blocks, one per duplicate group
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use sumdedup::actions::{RemovalPolicy, ResolutionPlan};
//! use sumdedup::duplicates::DuplicateFinder;
//! use sumdedup::output::TextOutput;
//! use std::path::PathBuf;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates_in_paths(vec![PathBuf::from(".")])
//!     .unwrap();
//! let plan = ResolutionPlan::new(groups, RemovalPolicy::report_only());
//!
//! TextOutput::new(&plan).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
