use super::ops::{self, GroupMap};
use super::{GroupSnapshot, OrdinalWrite, RecordStore, StoreError, VersionGuard};
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch, Version};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-process store. Every call runs under one lock, so batches are
/// all-or-nothing and groups are never suspect.
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: Mutex<HashMap<GroupKey, GroupMap>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record verbatim, bypassing sequencing. Used to load existing
    /// data, including ordinals written by older unguarded clients.
    pub async fn insert_raw(&self, record: OrderedRecord) {
        let mut groups = self.groups.lock().await;
        groups
            .entry(record.group.clone())
            .or_default()
            .insert(record.id.clone(), record);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_group(&self, group: &GroupKey) -> Result<GroupSnapshot, StoreError> {
        let groups = self.groups.lock().await;
        let records = groups
            .get(group)
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        Ok(GroupSnapshot::new(group.clone(), records, false))
    }

    async fn get(&self, group: &GroupKey, id: &str) -> Result<OrderedRecord, StoreError> {
        let groups = self.groups.lock().await;
        groups
            .get(group)
            .and_then(|map| map.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(
        &self,
        record: NewRecord,
        ordinal: i64,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError> {
        let mut groups = self.groups.lock().await;
        let map = groups.entry(record.group.clone()).or_default();
        ops::create(map, record, ordinal, guards, Utc::now())
    }

    async fn update_fields(
        &self,
        group: &GroupKey,
        id: &str,
        patch: &RecordPatch,
        expected_version: Version,
    ) -> Result<OrderedRecord, StoreError> {
        let mut groups = self.groups.lock().await;
        let map = groups
            .get_mut(group)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        ops::update_fields(map, id, patch, expected_version, Utc::now())
    }

    async fn write_ordinal(
        &self,
        group: &GroupKey,
        write: &OrdinalWrite,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError> {
        let mut groups = self.groups.lock().await;
        let map = groups
            .get_mut(group)
            .ok_or_else(|| StoreError::NotFound(write.id.clone()))?;
        ops::write_ordinal(map, write, guards, Utc::now())
    }

    async fn write_ordinals_batch(
        &self,
        group: &GroupKey,
        writes: &[OrdinalWrite],
    ) -> Result<Vec<OrderedRecord>, StoreError> {
        let mut groups = self.groups.lock().await;
        let map = groups.entry(group.clone()).or_default();
        ops::write_batch(map, writes, Utc::now())
    }

    async fn delete(
        &self,
        group: &GroupKey,
        id: &str,
        expected_version: Option<Version>,
    ) -> Result<(), StoreError> {
        let mut groups = self.groups.lock().await;
        let map = groups
            .get_mut(group)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        ops::delete(map, id, expected_version).map(|_| ())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;
