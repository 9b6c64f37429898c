//! The repository state: every commit, the head pointer and the staging area.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lvc_chain::{Commit, CommitChain};
use lvc_index::StagingArea;
use lvc_types::ObjectId;

use crate::error::{SdkError, SdkResult};

/// Everything that is persisted between commands.
///
/// Head is held by hash; [`head_commit`](Self::head_commit) looks it up in
/// the chain, so the successor link seen through head is always the one the
/// chain records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub chain: CommitChain,
    pub head: ObjectId,
    pub staging: StagingArea,
}

impl RepositoryState {
    /// A fresh repository: a root commit with no files, which is also head.
    pub fn new(author: &str, now: DateTime<Utc>) -> Self {
        let root = Commit::root(author, now);
        let head = root.hash();
        Self {
            chain: CommitChain::with_root(root),
            head,
            staging: StagingArea::new(),
        }
    }

    pub fn head_commit(&self) -> SdkResult<&Commit> {
        self.chain
            .get(&self.head)
            .ok_or_else(|| SdkError::CorruptState(format!("head {} is not a known commit", self.head)))
    }

    /// Returns `true` if head records a successor.
    pub fn is_detached(&self) -> SdkResult<bool> {
        Ok(self.head_commit()?.next_commit().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_state_points_at_root() {
        let state = RepositoryState::new("Test user", Utc.timestamp_opt(0, 0).unwrap());
        let head = state.head_commit().unwrap();
        assert!(head.is_root());
        assert!(head.tracked_files().is_empty());
        assert_eq!(state.chain.len(), 1);
        assert!(state.staging.is_empty());
        assert!(!state.is_detached().unwrap());
    }

    #[test]
    fn dangling_head_is_corrupt() {
        let mut state = RepositoryState::new("u", Utc::now());
        state.head = ObjectId::from_bytes(b"elsewhere");
        assert!(matches!(state.head_commit(), Err(SdkError::CorruptState(_))));
    }
}
