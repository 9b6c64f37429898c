use lvc_types::ObjectId;

use crate::error::StoreResult;

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - The ID of a blob is the plain SHA-256 of its bytes.
/// - `store` is idempotent: the same bytes always produce the same ID and
///   re-storing them leaves the store unchanged.
/// - Blobs are never mutated or deleted once written.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Store `data` and return its content-addressed ID.
    fn store(&self, data: &[u8]) -> StoreResult<ObjectId>;

    /// Read back previously stored bytes.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the
    /// digest is unknown.
    fn fetch(&self, id: &ObjectId) -> StoreResult<Vec<u8>>;

    /// Check whether a blob exists in the store.
    fn contains(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Store several blobs and return their IDs in order.
    fn store_batch(&self, blobs: &[&[u8]]) -> StoreResult<Vec<ObjectId>> {
        blobs.iter().map(|data| self.store(data)).collect()
    }
}
