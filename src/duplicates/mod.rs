//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The shared fingerprint index filled during the walk
//! - Sequential or one-thread-per-root scanning with a join barrier
//! - Exact-entry collapse, root-precedence ordering and group extraction

pub mod finder;
pub mod groups;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, WalkFailure};
pub use groups::{build_groups, dedup_exact_entries, DuplicateGroup, GroupingStats, RootOrder};
pub use index::{Buckets, DedupIndex};
