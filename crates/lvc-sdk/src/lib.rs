//! High-level SDK for lvc.
//!
//! Ties the content store, staging area and commit chain into a repository
//! that lives in a working directory, and implements the commands as
//! transitions over the persisted [`RepositoryState`].
//!
//! ```text
//! <root>/
//!   .lvc/
//!     config.toml   RepoConfig
//!     state         RepositoryState snapshot
//!     blobs/<hex>   file contents by SHA-256
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod ops;
pub mod persist;
pub mod repository;
pub mod state;
pub mod worktree;

pub use codec::{codec_for, BincodeCodec, JsonCodec, SnapshotCodec};
pub use config::{CodecKind, RepoConfig, DEFAULT_AUTHOR};
pub use error::{SdkError, SdkResult};
pub use persist::{FsStateStore, InMemoryStateStore, StateStore};
pub use repository::Lvc;
pub use state::RepositoryState;
pub use worktree::{Worktree, METADATA_DIR};

// Re-export key types
pub use lvc_chain::{Commit, Revision};
pub use lvc_index::{FileStatus, StagingArea, StatusEntry, WorkdirStatus};
pub use lvc_types::ObjectId;
