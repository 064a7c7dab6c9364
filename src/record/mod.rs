//! Ordered records shared by the sequencer and the record stores.
//!
//! A record belongs to exactly one [`GroupKey`] for its whole life and carries
//! an integer `ordinal` that defines its position inside that group. Field
//! edits go through [`RecordPatch`], which has no way to express a change of
//! group or ordinal.
mod group;
mod patch;
mod version;

pub use group::{
    GroupKey, ARTICLES, CATEGORY, CONSULTATIONS, CONTACTS, DOCUMENT_TYPE, SPECIAL_ARTICLES,
};
pub use patch::RecordPatch;
pub use version::Version;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid group key '{0}': use lowercase letters, digits and underscores")]
    InvalidGroup(String),
}

/// A record as persisted by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedRecord {
    pub id: String,
    pub group: GroupKey,
    pub ordinal: i64,
    pub active: bool,
    pub version: Version,
    pub name: String,
    /// Normalized uniqueness key within the group.
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderedRecord {
    /// Look up a free-form field as a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(serde_json::Value::as_str)
    }
}

/// Input for creating a record. The store assigns id, version and timestamps;
/// the ordering service assigns the ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub group: GroupKey,
    pub name: String,
    pub key: String,
    pub active: bool,
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl NewRecord {
    /// New active record keyed by its normalized name.
    #[must_use]
    pub fn new(group: GroupKey, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self {
            key: normalize_key(&name),
            group,
            name,
            active: true,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = normalize_key(key);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Materialize the record at `ordinal` with a fresh id and version.
    #[must_use]
    pub fn into_record(self, ordinal: i64, now: DateTime<Utc>) -> OrderedRecord {
        OrderedRecord {
            id: uuid::Uuid::new_v4().to_string(),
            group: self.group,
            ordinal,
            active: self.active,
            version: Version::initial(),
            name: self.name,
            key: self.key,
            fields: self.fields,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim and lowercase a uniqueness key.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Display order: ascending ordinal, then creation time, then id.
#[must_use]
pub fn compare_records(a: &OrderedRecord, b: &OrderedRecord) -> Ordering {
    a.ordinal
        .cmp(&b.ordinal)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort records into display order in place.
pub fn sort_records(records: &mut [OrderedRecord]) {
    records.sort_by(compare_records);
}

#[cfg(test)]
#[path = "../record_tests.rs"]
mod record_tests;
