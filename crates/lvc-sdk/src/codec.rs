//! Snapshot codecs: turning a [`RepositoryState`] into bytes and back.

use crate::config::CodecKind;
use crate::error::{SdkError, SdkResult};
use crate::state::RepositoryState;

/// Encodes and decodes the whole repository state as one snapshot.
pub trait SnapshotCodec: Send + Sync {
    fn encode(&self, state: &RepositoryState) -> SdkResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> SdkResult<RepositoryState>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Pretty-printed JSON. Human-readable and diffable.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl SnapshotCodec for JsonCodec {
    fn encode(&self, state: &RepositoryState) -> SdkResult<Vec<u8>> {
        serde_json::to_vec_pretty(state).map_err(|e| SdkError::PersistenceFailure(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> SdkResult<RepositoryState> {
        serde_json::from_slice(bytes).map_err(|e| SdkError::CorruptState(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Compact binary encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl SnapshotCodec for BincodeCodec {
    fn encode(&self, state: &RepositoryState) -> SdkResult<Vec<u8>> {
        bincode::serialize(state).map_err(|e| SdkError::PersistenceFailure(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> SdkResult<RepositoryState> {
        bincode::deserialize(bytes).map_err(|e| SdkError::CorruptState(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

pub fn codec_for(kind: CodecKind) -> Box<dyn SnapshotCodec> {
    match kind {
        CodecKind::Json => Box::new(JsonCodec),
        CodecKind::Bincode => Box::new(BincodeCodec),
    }
}
