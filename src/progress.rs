//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display one spinner per root on stderr while the roots are walked.
//!
//! Callbacks may arrive from several worker threads at once, one per root.
//! Every callback carries the root's slot (its position in the root list),
//! so a root listed twice gets two independent spinners.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for the walk of each root.
///
/// Implement this trait to receive progress updates while
/// [`DuplicateFinder`](crate::duplicates::DuplicateFinder) runs.
pub trait ProgressCallback: Send + Sync {
    /// Called when the walk of `root`, at position `slot` in the root list,
    /// starts.
    fn on_root_start(&self, slot: usize, root: &Path);

    /// Called after a file has been fingerprinted and indexed.
    ///
    /// # Arguments
    ///
    /// * `slot` - Position of the root being walked
    /// * `path` - File that was indexed
    /// * `bytes` - Number of bytes streamed through the digest
    fn on_file_indexed(&self, slot: usize, path: &Path, bytes: u64);

    /// Called when the walk of `root` ends, successfully or not.
    ///
    /// # Arguments
    ///
    /// * `slot` - Position of the root that was walked
    /// * `root` - Root that was walked
    /// * `files` - Number of files indexed from this root
    fn on_root_end(&self, slot: usize, root: &Path, files: usize);

    /// Called once every root has finished and grouping starts.
    fn on_grouping(&self) {}
}

/// Progress reporter using indicatif.
///
/// Keeps one spinner per active root inside a shared [`MultiProgress`].
pub struct Progress {
    multi: MultiProgress,
    bars: Mutex<HashMap<usize, ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no spinners will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumdedup::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            quiet,
        }
    }

    fn root_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} [{elapsed_precise}] {pos} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bars(&self) -> MutexGuard<'_, HashMap<usize, ProgressBar>> {
        self.bars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressCallback for Progress {
    fn on_root_start(&self, slot: usize, root: &Path) {
        if self.quiet {
            return;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::root_style());
        pb.set_prefix(truncate_path(&root.to_string_lossy(), 40));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.bars().insert(slot, pb);
    }

    fn on_file_indexed(&self, slot: usize, path: &Path, _bytes: u64) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.bars().get(&slot) {
            pb.inc(1);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_root_end(&self, slot: usize, _root: &Path, files: usize) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.bars().remove(&slot) {
            pb.set_position(files as u64);
            pb.finish_with_message("done");
        }
    }

    fn on_grouping(&self) {
        if self.quiet {
            return;
        }
        // Spinners of aborted or panicked roots may still be registered.
        for (_, pb) in self.bars().drain() {
            pb.abandon();
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
