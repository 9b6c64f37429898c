//! Filesystem-backed blob store: one file per digest.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use lvc_types::{ContentHasher, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Blob store laid out as a flat directory of files named by hex digest.
///
/// ```text
/// blobs/
///   2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
///   486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a7
/// ```
///
/// New blobs are written to a temporary file in the same directory and
/// renamed into place, so a blob file is either absent or complete.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    dir: PathBuf,
}

impl FsObjectStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the blob files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds (or would hold) blob `id`.
    pub fn blob_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(id.to_hex())
    }
}

impl ObjectStore for FsObjectStore {
    fn store(&self, data: &[u8]) -> StoreResult<ObjectId> {
        let id = ContentHasher::BLOB.hash(data);
        let path = self.blob_path(&id);
        if path.exists() {
            debug!(id = %id.short_hex(), "blob already stored");
            return Ok(id);
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(data)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), len = data.len(), "stored blob");
        Ok(id)
    }

    fn fetch(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let data = match fs::read(self.blob_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id));
            }
            Err(e) => return Err(e.into()),
        };

        let computed = ContentHasher::BLOB.hash(&data);
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(data)
    }

    fn contains(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.blob_path(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("blobs")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_creates_directory() {
        let (dir, store) = temp_store();
        assert!(store.dir().is_dir());
        assert!(store.dir().starts_with(dir.path()));
    }

    #[test]
    fn store_writes_file_named_by_digest() {
        let (_dir, store) = temp_store();
        let id = store.store(b"hello").unwrap();
        let path = store.blob_path(&id);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(fs::read(path).unwrap(), b"hello");
    }

    #[test]
    fn store_and_fetch_roundtrip() {
        let (_dir, store) = temp_store();
        let id = store.store(b"some file content\n").unwrap();
        assert_eq!(store.fetch(&id).unwrap(), b"some file content\n");
    }

    #[test]
    fn restore_is_noop() {
        let (_dir, store) = temp_store();
        let id1 = store.store(b"twice").unwrap();
        let id2 = store.store(b"twice").unwrap();
        assert_eq!(id1, id2);
        let files = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn fetch_missing_blob() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_bytes(b"absent");
        assert!(matches!(store.fetch(&id), Err(StoreError::NotFound(_))));
        assert!(!store.contains(&id).unwrap());
    }

    #[test]
    fn fetch_detects_corruption() {
        let (_dir, store) = temp_store();
        let id = store.store(b"original").unwrap();
        fs::write(store.blob_path(&id), b"tampered").unwrap();
        let err = store.fetch(&id).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
    }

    #[test]
    fn reopen_sees_existing_blobs() {
        let (dir, store) = temp_store();
        let id = store.store(b"persisted").unwrap();
        drop(store);

        let reopened = FsObjectStore::open(dir.path().join("blobs")).unwrap();
        assert!(reopened.contains(&id).unwrap());
        assert_eq!(reopened.fetch(&id).unwrap(), b"persisted");
    }
}
