//! Commit chain for lvc.
//!
//! Commits are immutable snapshots of the full tracked-file map, linked to
//! their parent by hash. Each commit may additionally record a single
//! successor, which is how the tip of history is found by walking forward
//! from an older commit. There are no branches: at most one successor is
//! ever recorded per commit.
//!
//! # Invariants
//!
//! - A commit's hash and tracked files never change after construction.
//! - The successor link is set only when a child is appended, and cleared
//!   only by [`CommitChain::sever_successor`].
//! - Every non-root commit's parent exists in the chain.

pub mod chain;
pub mod commit;
pub mod error;
pub mod revision;

pub use chain::{Ancestors, CommitChain};
pub use commit::{Commit, ROOT_MESSAGE};
pub use error::{ChainError, ChainResult};
pub use revision::{Revision, DEFAULT_TIP_NAME, MIN_PREFIX_LEN};
