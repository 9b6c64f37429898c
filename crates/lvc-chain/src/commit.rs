//! The commit record.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use lvc_index::StagingArea;
use lvc_types::{ContentHasher, ObjectId};

/// Message carried by the root commit created at `init`.
pub const ROOT_MESSAGE: &str = "Initial commit";

/// An immutable snapshot of the tracked files, linked to its parent.
///
/// Everything except the successor link is fixed at construction. The
/// successor can only be changed through [`CommitChain`](crate::CommitChain).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    hash: ObjectId,
    previous: Option<ObjectId>,
    #[serde(default)]
    next: Option<ObjectId>,
    tracked_files: BTreeMap<String, ObjectId>,
    message: String,
    author: String,
    date: DateTime<Utc>,
}

impl Commit {
    /// Create the root commit: no parent, no tracked files.
    pub fn root(author: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::build(None, BTreeMap::new(), ROOT_MESSAGE.to_string(), author.into(), date)
    }

    /// Create a child of `parent` from the staged changes.
    ///
    /// The snapshot is the parent's tracked files, minus every staged
    /// deletion, overlaid with every staged addition. The parent itself is
    /// not modified; linking happens in [`CommitChain::append`](crate::CommitChain::append).
    pub fn child(
        message: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<Utc>,
        parent: &Commit,
        staging: &StagingArea,
    ) -> Self {
        let mut tracked_files = parent.tracked_files.clone();
        for path in staging.deleted() {
            tracked_files.remove(path);
        }
        for (path, digest) in staging.added() {
            tracked_files.insert(path.clone(), *digest);
        }
        Self::build(
            Some(parent.hash),
            tracked_files,
            message.into(),
            author.into(),
            date,
        )
    }

    fn build(
        previous: Option<ObjectId>,
        tracked_files: BTreeMap<String, ObjectId>,
        message: String,
        author: String,
        date: DateTime<Utc>,
    ) -> Self {
        let hash = compute_hash(previous.as_ref(), &tracked_files, &message, &author, &date);
        Self {
            hash,
            previous,
            next: None,
            tracked_files,
            message,
            author,
            date,
        }
    }

    /// This commit's identity.
    pub fn hash(&self) -> ObjectId {
        self.hash
    }

    /// Parent hash, or `None` for the root commit.
    pub fn previous_commit(&self) -> Option<ObjectId> {
        self.previous
    }

    /// Recorded successor, if a child was created from this commit.
    pub fn next_commit(&self) -> Option<ObjectId> {
        self.next
    }

    /// Full `path -> digest` map of the working tree at this commit.
    pub fn tracked_files(&self) -> &BTreeMap<String, ObjectId> {
        &self.tracked_files
    }

    /// Digest of `path` at this commit, if tracked.
    pub fn tracked_digest(&self, path: &str) -> Option<&ObjectId> {
        self.tracked_files.get(path)
    }

    /// Returns `true` if `path` is tracked at this commit.
    pub fn tracks(&self, path: &str) -> bool {
        self.tracked_files.contains_key(path)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns `true` if this is the root commit.
    pub fn is_root(&self) -> bool {
        self.previous.is_none()
    }

    /// Returns `true` if the stored hash matches the commit's content.
    pub fn is_intact(&self) -> bool {
        self.hash
            == compute_hash(
                self.previous.as_ref(),
                &self.tracked_files,
                &self.message,
                &self.author,
                &self.date,
            )
    }

    pub(crate) fn set_next(&mut self, next: Option<ObjectId>) {
        self.next = next;
    }
}

/// Hash the commit's semantic fields under the commit domain.
fn compute_hash(
    previous: Option<&ObjectId>,
    tracked_files: &BTreeMap<String, ObjectId>,
    message: &str,
    author: &str,
    date: &DateTime<Utc>,
) -> ObjectId {
    let parent = previous.map(ObjectId::to_hex).unwrap_or_default();
    let timestamp = date.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let files: Vec<String> = tracked_files
        .iter()
        .map(|(path, digest)| format!("{path}\0{digest}"))
        .collect();

    let mut parts: Vec<&[u8]> = vec![
        parent.as_bytes(),
        message.as_bytes(),
        author.as_bytes(),
        timestamp.as_bytes(),
    ];
    parts.extend(files.iter().map(|f| f.as_bytes()));
    ContentHasher::COMMIT.hash_parts(&parts)
}
