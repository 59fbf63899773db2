//! Line-oriented text report.
//!
//! # Format
//!
//! One block per duplicate group, members in plan order:
//!
//! ```text
//! DUPLICATE: size+sha=5+2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! <TAB>      <TAB>inode=2049+131<TAB>name=x<TAB>path=/a/x
//! <TAB>remove<TAB>inode=2049+132<TAB>name=y<TAB>path=/b/y
//! ```
//!
//! The block is rendered from the [`ResolutionPlan`] alone, so dry runs and
//! real runs print the same bytes.

use std::io::{self, Write};

use crate::actions::{Disposition, PlannedGroup, PlannedMember, ResolutionPlan};

/// Marker column for a member that will be removed.
const REMOVE_MARK: &str = "remove";
/// Marker column for a retained member, padded to the same width.
const KEEP_MARK: &str = "      ";

/// Text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    plan: &'a ResolutionPlan,
}

impl<'a> TextOutput<'a> {
    /// Create a text report for `plan`.
    #[must_use]
    pub fn new(plan: &'a ResolutionPlan) -> Self {
        Self { plan }
    }

    /// Write every group block to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in &self.plan.groups {
            write_group(writer, group)?;
        }
        writer.flush()
    }

    /// Render the whole report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Write one group block.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_group<W: Write>(writer: &mut W, group: &PlannedGroup) -> io::Result<()> {
    writeln!(writer, "DUPLICATE: size+sha={}", group.fingerprint)?;
    for member in &group.members {
        write_member(writer, member)?;
    }
    Ok(())
}

fn write_member<W: Write>(writer: &mut W, member: &PlannedMember) -> io::Result<()> {
    let mark = match member.disposition {
        Disposition::Remove => REMOVE_MARK,
        Disposition::Keep => KEEP_MARK,
    };
    let record = &member.record;
    writeln!(
        writer,
        "\t{}\tinode={}\tname={}\tpath={}",
        mark,
        record.identity,
        record.name,
        record.path.display()
    )
}
