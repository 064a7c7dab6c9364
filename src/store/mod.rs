//! Record store adapters.
//!
//! A store fetches whole groups and persists one record at a time with a
//! compare-and-swap on the record's [`Version`]. Multi-record renumbering goes
//! through [`RecordStore::write_ordinals_batch`], which validates every version
//! before writing anything.
mod file;
mod memory;
mod ops;
mod snapshot;

pub use file::{FileStore, GROUPS_DIR, RENUMBER_MARKER};
pub use memory::MemoryStore;
pub use snapshot::GroupSnapshot;

use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch, Version};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Version conflict on record {id} (expected {expected})")]
    VersionConflict { id: String, expected: Version },
    #[error("Ordinal {0} is already taken in this group")]
    OrdinalTaken(i64),
    #[error("An entry with key '{0}' already exists in this group")]
    AlreadyExists(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl StoreError {
    /// The write lost a race and can be recomputed from a fresh snapshot.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::VersionConflict { .. } | StoreError::OrdinalTaken(_)
        )
    }
}

/// A single compare-and-swap ordinal write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalWrite {
    pub id: String,
    pub ordinal: i64,
    pub expected_version: Version,
}

/// A record whose version must still match for a write to proceed, typically
/// a neighbour the new ordinal was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGuard {
    pub id: String,
    pub version: Version,
}

impl From<&OrderedRecord> for VersionGuard {
    fn from(record: &OrderedRecord) -> Self {
        Self {
            id: record.id.clone(),
            version: record.version,
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of `group` in display order. `suspect` is set when an
    /// earlier renumbering batch did not complete.
    async fn fetch_group(&self, group: &GroupKey) -> Result<GroupSnapshot, StoreError>;

    async fn get(&self, group: &GroupKey, id: &str) -> Result<OrderedRecord, StoreError>;

    /// Insert a record at `ordinal`. Fails with `AlreadyExists` when the key is
    /// taken, `OrdinalTaken` when another record holds `ordinal` and
    /// `VersionConflict` when any guard is stale.
    async fn create(
        &self,
        record: NewRecord,
        ordinal: i64,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError>;

    /// Edit non-ordering fields of a record.
    async fn update_fields(
        &self,
        group: &GroupKey,
        id: &str,
        patch: &RecordPatch,
        expected_version: Version,
    ) -> Result<OrderedRecord, StoreError>;

    /// Persist one ordinal. The target's version and every guard's version
    /// must match; a missing guard counts as a conflict. Another record
    /// already holding the ordinal fails with `OrdinalTaken`.
    async fn write_ordinal(
        &self,
        group: &GroupKey,
        write: &OrdinalWrite,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError>;

    /// Persist a renumbering. Either every write lands or, if interrupted, the
    /// group is reported as suspect until renumbered again.
    async fn write_ordinals_batch(
        &self,
        group: &GroupKey,
        writes: &[OrdinalWrite],
    ) -> Result<Vec<OrderedRecord>, StoreError>;

    /// Remove one record. Siblings are never touched.
    async fn delete(
        &self,
        group: &GroupKey,
        id: &str,
        expected_version: Option<Version>,
    ) -> Result<(), StoreError>;
}
