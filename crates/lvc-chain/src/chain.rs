//! The commit set and its traversal algorithms.
//!
//! [`CommitChain`] stores every commit ever created, keyed by hash. Entries
//! are only ever added; the one mutation allowed on an existing commit is
//! its successor link, which [`append`] sets on the parent and
//! [`sever_successor`] clears.
//!
//! [`append`]: CommitChain::append
//! [`sever_successor`]: CommitChain::sever_successor

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lvc_types::ObjectId;

use crate::commit::Commit;
use crate::error::{ChainError, ChainResult};
use crate::revision::Revision;

/// Append-only set of commits forming a single line of history per head.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitChain {
    commits: BTreeMap<ObjectId, Commit>,
}

impl CommitChain {
    /// Create a chain holding only `root`.
    pub fn with_root(root: Commit) -> Self {
        let mut commits = BTreeMap::new();
        commits.insert(root.hash(), root);
        Self { commits }
    }

    /// Total number of commits, including abandoned ones.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns `true` if the chain has no commits.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Returns `true` if a commit with this hash exists.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.commits.contains_key(id)
    }

    /// Look up a commit by hash.
    pub fn get(&self, id: &ObjectId) -> Option<&Commit> {
        self.commits.get(id)
    }

    /// Look up a commit by hash, failing if it is absent.
    pub fn require(&self, id: &ObjectId) -> ChainResult<&Commit> {
        self.commits.get(id).ok_or(ChainError::UnknownCommit(*id))
    }

    /// All commits, ordered by hash.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Append a child commit and record it as its parent's successor.
    ///
    /// Fails if the hash is already present, if the commit has no parent or
    /// the parent is missing, or if the parent already records a successor.
    pub fn append(&mut self, commit: Commit) -> ChainResult<ObjectId> {
        let id = commit.hash();
        if self.commits.contains_key(&id) {
            return Err(ChainError::DuplicateCommit(id));
        }
        let parent_id = commit.previous_commit().ok_or(ChainError::MissingParent(id))?;
        let parent = self
            .commits
            .get_mut(&parent_id)
            .ok_or(ChainError::DanglingParent {
                commit: id,
                parent: parent_id,
            })?;
        if let Some(successor) = parent.next_commit() {
            return Err(ChainError::SuccessorTaken {
                parent: parent_id,
                successor,
            });
        }

        parent.set_next(Some(id));
        self.commits.insert(id, commit);
        debug!(commit = %id.short_hex(), parent = %parent_id.short_hex(), "appended commit");
        Ok(id)
    }

    /// Clear the successor link of `id`, abandoning its descendants from
    /// tip resolution. Returns the successor that was cleared, if any.
    pub fn sever_successor(&mut self, id: &ObjectId) -> ChainResult<Option<ObjectId>> {
        let commit = self
            .commits
            .get_mut(id)
            .ok_or(ChainError::UnknownCommit(*id))?;
        let previous = commit.next_commit();
        commit.set_next(None);
        if let Some(successor) = previous {
            debug!(commit = %id.short_hex(), severed = %successor.short_hex(), "severed successor");
        }
        Ok(previous)
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Walk parent links from `start` (inclusive) back to the root.
    pub fn ancestors(&self, start: &ObjectId) -> Ancestors<'_> {
        Ancestors {
            chain: self,
            next: Some(*start),
        }
    }

    /// Follow the parent link exactly `n` times from `start`.
    pub fn nth_ancestor(&self, start: &ObjectId, n: usize) -> ChainResult<&Commit> {
        let mut current = self.require(start)?;
        for step in 0..n {
            let parent = current
                .previous_commit()
                .ok_or(ChainError::InsufficientHistory {
                    requested: n,
                    available: step,
                })?;
            current = self.require(&parent)?;
        }
        Ok(current)
    }

    /// Follow successor links from `start` until one is empty.
    pub fn tip_from(&self, start: &ObjectId) -> ChainResult<&Commit> {
        let mut current = self.require(start)?;
        let mut steps = 0;
        while let Some(next) = current.next_commit() {
            steps += 1;
            if steps > self.commits.len() {
                return Err(ChainError::CycleDetected(next));
            }
            current = self.require(&next)?;
        }
        Ok(current)
    }

    /// Find the single commit whose hash starts with `prefix`.
    pub fn find_by_prefix(&self, prefix: &str) -> ChainResult<&Commit> {
        let mut matches = self.commits.values().filter(|c| c.hash().matches_prefix(prefix));
        let first = matches
            .next()
            .ok_or_else(|| ChainError::UnknownRevision(prefix.to_string()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(ChainError::AmbiguousRevision {
                prefix: prefix.to_string(),
                candidates: extra + 1,
            });
        }
        Ok(first)
    }

    /// Resolve `revision` relative to `head`.
    pub fn resolve(&self, head: &ObjectId, revision: &Revision) -> ChainResult<&Commit> {
        match revision {
            Revision::Hash(id) => self
                .get(id)
                .ok_or_else(|| ChainError::UnknownRevision(id.to_hex())),
            Revision::Prefix(prefix) => self.find_by_prefix(prefix),
            Revision::Relative(n) => self.nth_ancestor(head, *n),
            Revision::Tip => self.tip_from(head),
        }
    }

    /// Returns `true` if `head` is not the newest commit in its own line,
    /// i.e. it records a successor.
    pub fn is_detached(&self, head: &ObjectId) -> ChainResult<bool> {
        Ok(self.require(head)?.next_commit().is_some())
    }
}

/// Iterator over a commit and its ancestors, newest first.
///
/// Stops after the root, or early if a parent link points at a commit the
/// chain does not hold.
pub struct Ancestors<'a> {
    chain: &'a CommitChain,
    next: Option<ObjectId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Commit;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let commit = self.chain.get(&id)?;
        self.next = commit.previous_commit();
        Some(commit)
    }
}
