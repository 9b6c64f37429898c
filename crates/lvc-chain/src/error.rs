//! Error types for the commit chain.

use lvc_types::ObjectId;

/// Errors that can occur during chain operations and revision resolution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    /// The revision specifier could not be parsed or matched no commit.
    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    /// A hash prefix matched more than one commit.
    #[error("ambiguous revision {prefix}: matches {candidates} commits")]
    AmbiguousRevision { prefix: String, candidates: usize },

    /// A commit hash is not present in the chain.
    #[error("commit not found: {0}")]
    UnknownCommit(ObjectId),

    /// `HEAD~n` walked past the root commit.
    #[error("cannot go back {requested} commits: only {available} ancestors exist")]
    InsufficientHistory { requested: usize, available: usize },

    /// A commit with this hash already exists.
    #[error("duplicate commit: {0}")]
    DuplicateCommit(ObjectId),

    /// Only the root commit may lack a parent.
    #[error("commit {0} has no parent")]
    MissingParent(ObjectId),

    /// The parent of an appended commit is not in the chain.
    #[error("commit {commit} references missing parent {parent}")]
    DanglingParent { commit: ObjectId, parent: ObjectId },

    /// The parent already records a successor; history is linear.
    #[error("commit {parent} already has successor {successor}")]
    SuccessorTaken { parent: ObjectId, successor: ObjectId },

    /// Successor links loop back on themselves.
    #[error("successor cycle detected at {0}")]
    CycleDetected(ObjectId),
}

/// Convenience alias for chain results.
pub type ChainResult<T> = Result<T, ChainError>;
