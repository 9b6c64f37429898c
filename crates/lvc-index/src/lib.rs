//! Staging area for lvc.
//!
//! Holds the pending additions and deletions that the next commit layers on
//! top of head's snapshot, and the report types produced by `status`.
//!
//! # Key Types
//!
//! - [`StagingArea`] -- staged additions (`path -> digest`) and deletions
//! - [`WorkdirStatus`] -- result of comparing staging, head and working tree
//! - [`FileStatus`] -- kind of change (New, Modified, Deleted)

pub mod error;
pub mod staging;
pub mod status;

pub use error::{IndexError, IndexResult};
pub use staging::StagingArea;
pub use status::{FileStatus, StatusEntry, WorkdirStatus};
