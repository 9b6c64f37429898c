//! Foundation types for lvc, a linear version-control engine.
//!
//! Every other lvc crate depends on `lvc-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- SHA-256 digest identifying a blob or a commit
//! - [`ContentHasher`] -- raw and domain-separated SHA-256 hashing

pub mod error;
pub mod hasher;
pub mod object;

pub use error::TypeError;
pub use hasher::ContentHasher;
pub use object::ObjectId;
