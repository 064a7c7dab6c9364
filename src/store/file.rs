//! JSON-file record store.
//!
//! Layout: `<root>/groups/<group>/<id>.json`, one file per record, each written
//! atomically. A renumbering batch drops a `.renumber-pending` marker in the
//! group directory before its first write and removes it after the last; a
//! marker left behind by a crash marks the group suspect.
use super::ops::{self, GroupMap};
use super::{GroupSnapshot, OrdinalWrite, RecordStore, StoreError, VersionGuard};
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch, Version};
use crate::utils::{atomic_write, now_iso};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Directory under the store root holding one folder per group.
pub const GROUPS_DIR: &str = "groups";

/// Marker present while a renumbering batch is being written.
pub const RENUMBER_MARKER: &str = ".renumber-pending";

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Serializes read-check-write cycles within this process.
    lock: Mutex<()>,
}

fn is_valid_record_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn group_dir(&self, group: &GroupKey) -> PathBuf {
        self.root.join(GROUPS_DIR).join(group.as_str())
    }

    fn record_path(&self, group: &GroupKey, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_record_id(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.group_dir(group).join(format!("{id}.json")))
    }

    async fn read_record(path: &Path) -> Result<OrderedRecord, StoreError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load every record of `group` plus whether the group is suspect.
    async fn load(&self, group: &GroupKey) -> Result<(GroupMap, bool), StoreError> {
        let dir = self.group_dir(group);
        let mut map = GroupMap::new();
        if !dir.exists() {
            return Ok((map, false));
        }
        let suspect = dir.join(RENUMBER_MARKER).exists();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(".json") {
                continue;
            }
            let record = match Self::read_record(&entry.path()).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(file = %entry.path().display(), error = %e, "Skipping unreadable record file");
                    continue;
                }
            };
            if record.group != *group {
                warn!(file = %entry.path().display(), "Skipping record filed under the wrong group");
                continue;
            }
            map.insert(record.id.clone(), record);
        }
        Ok((map, suspect))
    }

    async fn persist(&self, record: &OrderedRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.group, &record.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(record)?;
        atomic_write(&path, &content).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn fetch_group(&self, group: &GroupKey) -> Result<GroupSnapshot, StoreError> {
        let _guard = self.lock.lock().await;
        let (map, suspect) = self.load(group).await?;
        if suspect {
            warn!(group = %group, "Group has an unfinished renumbering; ordinals are suspect");
        }
        Ok(GroupSnapshot::new(group.clone(), map.into_values().collect(), suspect))
    }

    async fn get(&self, group: &GroupKey, id: &str) -> Result<OrderedRecord, StoreError> {
        let path = self.record_path(group, id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let _guard = self.lock.lock().await;
        Self::read_record(&path).await
    }

    async fn create(
        &self,
        record: NewRecord,
        ordinal: i64,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.load(&record.group).await?;
        let created = ops::create(&mut map, record, ordinal, guards, Utc::now())?;
        self.persist(&created).await?;
        Ok(created)
    }

    async fn update_fields(
        &self,
        group: &GroupKey,
        id: &str,
        patch: &RecordPatch,
        expected_version: Version,
    ) -> Result<OrderedRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.load(group).await?;
        let updated = ops::update_fields(&mut map, id, patch, expected_version, Utc::now())?;
        self.persist(&updated).await?;
        Ok(updated)
    }

    async fn write_ordinal(
        &self,
        group: &GroupKey,
        write: &OrdinalWrite,
        guards: &[VersionGuard],
    ) -> Result<OrderedRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.load(group).await?;
        let updated = ops::write_ordinal(&mut map, write, guards, Utc::now())?;
        self.persist(&updated).await?;
        Ok(updated)
    }

    async fn write_ordinals_batch(
        &self,
        group: &GroupKey,
        writes: &[OrdinalWrite],
    ) -> Result<Vec<OrderedRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.load(group).await?;
        let written = ops::write_batch(&mut map, writes, Utc::now())?;
        let dir = self.group_dir(group);
        fs::create_dir_all(&dir).await?;
        let marker = dir.join(RENUMBER_MARKER);
        fs::write(&marker, now_iso()).await?;
        for record in &written {
            self.persist(record).await?;
        }
        fs::remove_file(&marker).await?;
        debug!(group = %group, count = written.len(), "Renumbering batch persisted");
        Ok(written)
    }

    async fn delete(
        &self,
        group: &GroupKey,
        id: &str,
        expected_version: Option<Version>,
    ) -> Result<(), StoreError> {
        let path = self.record_path(group, id)?;
        let _guard = self.lock.lock().await;
        let (mut map, _) = self.load(group).await?;
        ops::delete(&mut map, id, expected_version)?;
        fs::remove_file(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod file_tests;
