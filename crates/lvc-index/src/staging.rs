//! The staging area: a pending add/delete overlay on head's snapshot.
//!
//! [`StagingArea`] keeps staged additions in a `BTreeMap<String, ObjectId>`
//! and staged deletions in a `BTreeSet<String>`. A path is never in both at
//! once. Filesystem I/O (reading files, storing blobs) is the caller's job;
//! this type only records digests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lvc_types::ObjectId;

use crate::error::{IndexError, IndexResult};

/// Pending changes for the next commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingArea {
    /// Staged additions, keyed by path. Last write wins.
    added: BTreeMap<String, ObjectId>,
    /// Paths staged for deletion.
    deleted: BTreeSet<String>,
}

impl StagingArea {
    /// Create an empty staging area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }

    /// Staged additions, keyed by path.
    pub fn added(&self) -> &BTreeMap<String, ObjectId> {
        &self.added
    }

    /// Paths staged for deletion.
    pub fn deleted(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    /// Digest staged for `path`, if any.
    pub fn added_digest(&self, path: &str) -> Option<&ObjectId> {
        self.added.get(path)
    }

    /// Returns `true` if `path` is staged for addition.
    pub fn is_added(&self, path: &str) -> bool {
        self.added.contains_key(path)
    }

    /// Returns `true` if `path` is staged for deletion.
    pub fn is_deleted(&self, path: &str) -> bool {
        self.deleted.contains(path)
    }

    // ---------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------

    /// Stage `path` with content `digest`, overriding any earlier addition
    /// or deletion of the same path.
    pub fn stage_add(&mut self, path: &str, digest: ObjectId) -> IndexResult<()> {
        validate_path(path)?;
        self.deleted.remove(path);
        self.added.insert(path.to_string(), digest);
        Ok(())
    }

    /// Stage the deletion of `path`, dropping any pending addition.
    ///
    /// The path does not have to exist on disk or be tracked.
    pub fn stage_delete(&mut self, path: &str) -> IndexResult<()> {
        validate_path(path)?;
        self.added.remove(path);
        self.deleted.insert(path.to_string());
        Ok(())
    }

    /// Drop a pending addition without staging a deletion.
    ///
    /// Returns the digest that was staged, if any.
    pub fn unstage(&mut self, path: &str) -> Option<ObjectId> {
        self.added.remove(path)
    }

    /// Keep only the staged additions for which `keep` returns `true`.
    ///
    /// Returns the paths that were dropped.
    pub fn retain_added<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str, &ObjectId) -> bool,
    {
        let dropped: Vec<String> = self
            .added
            .iter()
            .filter(|(path, digest)| !keep(path.as_str(), *digest))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &dropped {
            self.added.remove(path);
        }
        dropped
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.added.clear();
        self.deleted.clear();
    }
}

fn validate_path(path: &str) -> IndexResult<()> {
    if path.is_empty() {
        return Err(IndexError::InvalidPath("empty path".to_string()));
    }
    Ok(())
}
