use std::io;
use std::path::PathBuf;

use thiserror::Error;

use lvc_chain::ChainError;
use lvc_index::IndexError;
use lvc_store::StoreError;
use lvc_types::ObjectId;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not an lvc repository: {} (run `lvc init` first)", .0.display())]
    NotInitialized(PathBuf),

    #[error("content missing from store: {0}")]
    ContentMissing(ObjectId),

    #[error("stored content is corrupt: {0}")]
    CorruptContent(ObjectId),

    #[error("cannot read {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    #[error("ambiguous revision {prefix}: matches {candidates} commits")]
    AmbiguousRevision { prefix: String, candidates: usize },

    #[error("cannot go back {requested} commits: only {available} ancestors exist")]
    InsufficientHistory { requested: usize, available: usize },

    /// The command refuses to run while head has a recorded successor.
    #[error("Error while performing {0}: Head is detached")]
    HeadDetached(&'static str),

    #[error("path is not tracked at head: {0}")]
    NotTracked(String),

    #[error("failed to persist repository state: {0}")]
    PersistenceFailure(String),

    #[error("repository state is unreadable: {0}")]
    CorruptState(String),

    #[error("commit history is inconsistent: {0}")]
    History(ChainError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<StoreError> for SdkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ContentMissing(id),
            StoreError::HashMismatch { id, .. } => Self::CorruptContent(id),
            StoreError::Io(e) => Self::Io(e),
        }
    }
}

impl From<ChainError> for SdkError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::UnknownRevision(spec) => Self::UnknownRevision(spec),
            ChainError::UnknownCommit(id) => Self::UnknownRevision(id.to_hex()),
            ChainError::AmbiguousRevision { prefix, candidates } => {
                Self::AmbiguousRevision { prefix, candidates }
            }
            ChainError::InsufficientHistory {
                requested,
                available,
            } => Self::InsufficientHistory {
                requested,
                available,
            },
            other => Self::History(other),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
