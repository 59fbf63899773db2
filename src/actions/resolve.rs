//! Removal policy: decides which members of each duplicate group are marked.
//!
//! # Overview
//!
//! A [`RemovalPolicy`] turns the ordered duplicate groups into a
//! [`ResolutionPlan`], where every member carries a [`Disposition`]. Reports
//! are rendered from the plan and removal executes the plan, so a dry run
//! prints exactly what a real run would.
//!
//! | Policy                | Marked members          |
//! |-----------------------|-------------------------|
//! | report only (default) | none                    |
//! | keep first            | every member but the first |
//! | remove all copies     | every member            |
//!
//! # Example
//!
//! ```
//! use sumdedup::actions::resolve::{Disposition, RemovalPolicy, ResolutionPlan};
//! use sumdedup::duplicates::DuplicateGroup;
//! use sumdedup::scanner::{FileIdentity, FileRecord, Fingerprint};
//! use std::path::PathBuf;
//!
//! let group = DuplicateGroup::new(
//!     Fingerprint::of_bytes(b"hello"),
//!     vec![
//!         FileRecord::new(PathBuf::from("/a/x"), "x", FileIdentity::unknown()),
//!         FileRecord::new(PathBuf::from("/b/y"), "y", FileIdentity::unknown()),
//!     ],
//! );
//!
//! let plan = ResolutionPlan::new(vec![group], RemovalPolicy::keep_first());
//! assert_eq!(plan.groups[0].members[0].disposition, Disposition::Keep);
//! assert_eq!(plan.groups[0].members[1].disposition, Disposition::Remove);
//! ```

use serde::Serialize;

use crate::duplicates::DuplicateGroup;
use crate::scanner::{FileRecord, Fingerprint};

/// Which members get removed, and how.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalPolicy {
    /// Mark every member of every group.
    pub remove_all_copies: bool,
    /// Mark every member except the first (ignored with `remove_all_copies`).
    pub remove_except_first: bool,
    /// Plan and report removals without touching the filesystem.
    pub dry_run: bool,
    /// Move marked files to the system trash instead of unlinking them.
    pub use_trash: bool,
}

impl RemovalPolicy {
    /// Report duplicates, remove nothing.
    #[must_use]
    pub fn report_only() -> Self {
        Self::default()
    }

    /// Keep the first member of each group, remove the rest.
    #[must_use]
    pub fn keep_first() -> Self {
        Self {
            remove_except_first: true,
            ..Self::default()
        }
    }

    /// Remove every member of each group.
    #[must_use]
    pub fn remove_all() -> Self {
        Self {
            remove_all_copies: true,
            ..Self::default()
        }
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable/disable moving to trash.
    #[must_use]
    pub fn with_trash(mut self, use_trash: bool) -> Self {
        self.use_trash = use_trash;
        self
    }

    /// Whether this policy marks anything at all.
    #[must_use]
    pub fn removes_anything(&self) -> bool {
        self.remove_all_copies || self.remove_except_first
    }

    /// Disposition of the member at `position` within its group.
    #[must_use]
    pub fn disposition(&self, position: usize) -> Disposition {
        if self.remove_all_copies || (self.remove_except_first && position > 0) {
            Disposition::Remove
        } else {
            Disposition::Keep
        }
    }
}

/// Fate of one group member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Retained
    Keep,
    /// Marked for removal
    Remove,
}

impl Disposition {
    /// Whether this member is marked for removal.
    #[must_use]
    pub fn is_remove(self) -> bool {
        self == Self::Remove
    }
}

/// A group member with its decided fate.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMember {
    /// The member
    #[serde(flatten)]
    pub record: FileRecord,
    /// Keep or remove
    #[serde(rename = "action")]
    pub disposition: Disposition,
}

/// A duplicate group with a disposition for each member.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedGroup {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// Members in group order
    pub members: Vec<PlannedMember>,
}

impl PlannedGroup {
    /// Content size shared by every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.fingerprint.size
    }

    /// Members marked for removal.
    pub fn marked(&self) -> impl Iterator<Item = &FileRecord> {
        self.members
            .iter()
            .filter(|m| m.disposition.is_remove())
            .map(|m| &m.record)
    }
}

/// Apply `policy` to one group.
#[must_use]
pub fn plan_group(group: DuplicateGroup, policy: &RemovalPolicy) -> PlannedGroup {
    let members = group
        .files
        .into_iter()
        .enumerate()
        .map(|(position, record)| PlannedMember {
            record,
            disposition: policy.disposition(position),
        })
        .collect();

    PlannedGroup {
        fingerprint: group.fingerprint,
        members,
    }
}

/// Every group of a scan with the policy that classified it.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    /// Planned groups in report order
    pub groups: Vec<PlannedGroup>,
    /// Policy the plan was built with
    pub policy: RemovalPolicy,
}

impl ResolutionPlan {
    /// Classify every member of `groups`.
    #[must_use]
    pub fn new(groups: Vec<DuplicateGroup>, policy: RemovalPolicy) -> Self {
        let groups = groups
            .into_iter()
            .map(|g| plan_group(g, &policy))
            .collect();
        Self { groups, policy }
    }

    /// Whether there are no duplicate groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Members marked for removal, with the size each one holds.
    pub fn marked(&self) -> impl Iterator<Item = (&FileRecord, u64)> {
        self.groups
            .iter()
            .flat_map(|g| g.marked().map(move |r| (r, g.size())))
    }

    /// Number of members marked for removal.
    #[must_use]
    pub fn removal_count(&self) -> usize {
        self.marked().count()
    }

    /// Bytes held by the marked members.
    #[must_use]
    pub fn removal_bytes(&self) -> u64 {
        self.marked().map(|(_, size)| size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileIdentity;
    use std::path::PathBuf;

    fn group(content: &[u8], paths: &[&str]) -> DuplicateGroup {
        DuplicateGroup::new(
            Fingerprint::of_bytes(content),
            paths
                .iter()
                .map(|p| {
                    let path = PathBuf::from(p);
                    let name = path.file_name().unwrap().to_string_lossy().into_owned();
                    FileRecord::new(path, name, FileIdentity::unknown())
                })
                .collect(),
        )
    }

    fn dispositions(plan: &PlannedGroup) -> Vec<Disposition> {
        plan.members.iter().map(|m| m.disposition).collect()
    }

    #[test]
    fn test_report_only_marks_nothing() {
        let plan = plan_group(group(b"abc", &["/a", "/b", "/c"]), &RemovalPolicy::report_only());
        assert_eq!(dispositions(&plan), vec![Disposition::Keep; 3]);
        assert!(!RemovalPolicy::report_only().removes_anything());
    }

    #[test]
    fn test_keep_first_marks_rest() {
        let plan = plan_group(group(b"abc", &["/a", "/b", "/c"]), &RemovalPolicy::keep_first());
        assert_eq!(
            dispositions(&plan),
            vec![Disposition::Keep, Disposition::Remove, Disposition::Remove]
        );
        let marked: Vec<_> = plan.marked().map(|r| r.path.clone()).collect();
        assert_eq!(marked, vec![PathBuf::from("/b"), PathBuf::from("/c")]);
    }

    #[test]
    fn test_remove_all_wins_over_keep_first() {
        let policy = RemovalPolicy {
            remove_all_copies: true,
            remove_except_first: true,
            ..Default::default()
        };
        let plan = plan_group(group(b"abc", &["/a", "/b"]), &policy);
        assert_eq!(dispositions(&plan), vec![Disposition::Remove; 2]);
    }

    #[test]
    fn test_dry_run_does_not_change_plan() {
        let real = plan_group(group(b"abc", &["/a", "/b"]), &RemovalPolicy::keep_first());
        let dry = plan_group(
            group(b"abc", &["/a", "/b"]),
            &RemovalPolicy::keep_first().with_dry_run(true),
        );
        assert_eq!(dispositions(&real), dispositions(&dry));
    }

    #[test]
    fn test_resolution_plan_totals() {
        let plan = ResolutionPlan::new(
            vec![group(b"hello", &["/a", "/b", "/c"]), group(b"hi", &["/d", "/e"])],
            RemovalPolicy::keep_first(),
        );
        assert_eq!(plan.removal_count(), 3);
        assert_eq!(plan.removal_bytes(), 5 + 5 + 2);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_disposition_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Disposition::Remove).unwrap(), "\"remove\"");
        assert_eq!(serde_json::to_string(&Disposition::Keep).unwrap(), "\"keep\"");
    }
}
