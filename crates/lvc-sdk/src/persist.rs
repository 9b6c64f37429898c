//! The persistence boundary: load the state at the start of a command, save
//! it at the end.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::codec::SnapshotCodec;
use crate::error::{SdkError, SdkResult};
use crate::state::RepositoryState;

/// Where the repository state lives between commands.
pub trait StateStore: Send + Sync {
    /// Returns `true` if a state has been saved.
    fn exists(&self) -> bool;

    /// Load the last saved state. Fails with `NotInitialized` if there is none.
    fn load(&self) -> SdkResult<RepositoryState>;

    /// Replace the saved state.
    fn save(&self, state: &RepositoryState) -> SdkResult<()>;
}

/// A single snapshot file, encoded with a [`SnapshotCodec`].
///
/// Writes overwrite the file in place.
pub struct FsStateStore {
    path: PathBuf,
    codec: Box<dyn SnapshotCodec>,
}

impl FsStateStore {
    pub fn new(path: impl Into<PathBuf>, codec: Box<dyn SnapshotCodec>) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FsStateStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> SdkResult<RepositoryState> {
        // missing and unreadable are reported the same way
        let bytes = fs::read(&self.path).map_err(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = %self.path.display(), error = %e, "state file unreadable");
            }
            SdkError::NotInitialized(self.path.clone())
        })?;
        let state = self.codec.decode(&bytes)?;
        debug!(codec = self.codec.name(), commits = state.chain.len(), "loaded state");
        Ok(state)
    }

    fn save(&self, state: &RepositoryState) -> SdkResult<()> {
        let bytes = self.codec.encode(state)?;
        fs::write(&self.path, &bytes).map_err(|e| {
            SdkError::PersistenceFailure(format!("{}: {e}", self.path.display()))
        })?;
        debug!(codec = self.codec.name(), bytes = bytes.len(), "saved state");
        Ok(())
    }
}

/// Keeps the state in memory. Used by tests and embedders that persist
/// elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: RwLock<Option<RepositoryState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn exists(&self) -> bool {
        self.state.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn load(&self) -> SdkResult<RepositoryState> {
        let guard = self
            .state
            .read()
            .map_err(|_| SdkError::CorruptState("state lock poisoned".into()))?;
        guard
            .clone()
            .ok_or_else(|| SdkError::NotInitialized(PathBuf::from("<memory>")))
    }

    fn save(&self, state: &RepositoryState) -> SdkResult<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| SdkError::PersistenceFailure("state lock poisoned".into()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}
