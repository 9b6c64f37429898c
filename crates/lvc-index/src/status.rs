//! Working directory status types.
//!
//! These types hold the result of comparing the staging area and the working
//! tree against head's snapshot.

use serde::{Deserialize, Serialize};

/// Complete status of the working directory.
///
/// Three independent checks feed into it: staged changes, unstaged changes
/// to tracked files, and untracked files. All lists are sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdirStatus {
    /// Staged additions, each marked New or Modified relative to head.
    pub staged: Vec<StatusEntry>,
    /// Tracked files whose on-disk content differs from head, or that are
    /// gone from disk.
    pub unstaged: Vec<StatusEntry>,
    /// Files present in the working directory but not tracked.
    pub untracked: Vec<String>,
}

impl WorkdirStatus {
    /// Create an empty status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if all three checks came back clean.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }

    /// Returns `true` if there are any staged changes.
    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Staged paths with the given status.
    pub fn staged_with(&self, status: FileStatus) -> impl Iterator<Item = &str> {
        filter_paths(&self.staged, status)
    }

    /// Unstaged paths with the given status.
    pub fn unstaged_with(&self, status: FileStatus) -> impl Iterator<Item = &str> {
        filter_paths(&self.unstaged, status)
    }

    /// Total number of entries across all categories.
    pub fn total_entries(&self) -> usize {
        self.staged.len() + self.unstaged.len() + self.untracked.len()
    }
}

fn filter_paths(entries: &[StatusEntry], status: FileStatus) -> impl Iterator<Item = &str> {
    entries
        .iter()
        .filter(move |e| e.status == status)
        .map(|e| e.path.as_str())
}

/// A single status entry representing a file change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// The file path relative to the workdir root.
    pub path: String,
    /// The kind of change.
    pub status: FileStatus,
}

impl StatusEntry {
    /// Create a new status entry.
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// The kind of file change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    /// A file head does not track.
    New,
    /// A tracked file whose content has changed.
    Modified,
    /// A tracked file that is gone (or unreadable) on disk.
    Deleted,
}
