//! File actions module.
//!
//! This module provides functionality for:
//! - Deciding which duplicate copies are kept and which are removed
//! - Removal of the marked copies, permanent or via the trash crate
//! - Dry runs that report without touching the filesystem
//!
//! ```no_run
//! use sumdedup::actions::{execute, RemovalPolicy, ResolutionPlan};
//! use sumdedup::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let (groups, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates_in_paths(vec![PathBuf::from(".")])
//!     .unwrap();
//! let plan = ResolutionPlan::new(groups, RemovalPolicy::keep_first().with_dry_run(true));
//! let report = execute(&plan);
//! println!("{}", report.summary());
//! ```

pub mod delete;
pub mod resolve;

// Re-export commonly used types
pub use delete::{
    delete_to_trash, execute, permanent_delete, DeleteError, DeleteResult, RemovalOutcome,
    RemovalReport,
};
pub use resolve::{
    plan_group, Disposition, PlannedGroup, PlannedMember, RemovalPolicy, ResolutionPlan,
};
