//! Revision specifiers.
//!
//! Accepted forms:
//! - `HEAD` -- head itself (same as `HEAD~0`)
//! - `HEAD~n` -- the n-th ancestor of head (`HEAD~` is `HEAD~1`)
//! - the tip name (default `master`) -- newest commit reachable forward from head
//! - a full 64-character commit hash
//! - a unique hash prefix of at least [`MIN_PREFIX_LEN`] hex characters

use lvc_types::ObjectId;

use crate::error::{ChainError, ChainResult};

/// Default name of the symbolic tip marker.
pub const DEFAULT_TIP_NAME: &str = "master";

/// Shortest hash prefix accepted as a revision.
pub const MIN_PREFIX_LEN: usize = 4;

/// A parsed revision specifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Revision {
    /// An exact commit hash.
    Hash(ObjectId),
    /// An abbreviated commit hash (lowercase hex).
    Prefix(String),
    /// `HEAD~n`: follow the parent link `n` times from head.
    Relative(usize),
    /// The tip marker: follow successor links forward from head.
    Tip,
}

impl Revision {
    /// Parse `input`, treating `tip_name` as the symbolic tip marker.
    pub fn parse(input: &str, tip_name: &str) -> ChainResult<Self> {
        let input = input.trim();
        if input == tip_name {
            return Ok(Self::Tip);
        }
        if input == "HEAD" {
            return Ok(Self::Relative(0));
        }
        if let Some(steps) = input.strip_prefix("HEAD~") {
            if steps.is_empty() {
                return Ok(Self::Relative(1));
            }
            if !steps.chars().all(|c| c.is_ascii_digit()) {
                return Err(ChainError::UnknownRevision(input.to_string()));
            }
            // too many digits for usize is still just more history than exists
            return Ok(Self::Relative(steps.parse().unwrap_or(usize::MAX)));
        }

        let is_hex = !input.is_empty() && input.chars().all(|c| c.is_ascii_hexdigit());
        if is_hex && input.len() == 64 {
            return ObjectId::from_hex(input)
                .map(Self::Hash)
                .map_err(|_| ChainError::UnknownRevision(input.to_string()));
        }
        if is_hex && input.len() >= MIN_PREFIX_LEN && input.len() < 64 {
            return Ok(Self::Prefix(input.to_ascii_lowercase()));
        }

        Err(ChainError::UnknownRevision(input.to_string()))
    }
}
