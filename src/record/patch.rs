use super::{normalize_key, OrderedRecord};
use std::collections::BTreeMap;

/// Field edits for an existing record. Group and ordinal are deliberately
/// absent: only the sequencer moves records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub key: Option<String>,
    pub active: Option<bool>,
    /// Replaces individual fields; a `Null` value removes the field.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl RecordPatch {
    #[must_use]
    pub fn activation(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key.is_none() && self.active.is_none() && self.fields.is_empty()
    }

    /// Apply the edits to `record`; versions and timestamps are the store's job.
    pub fn apply(&self, record: &mut OrderedRecord) {
        if let Some(name) = &self.name {
            record.name = name.trim().to_string();
        }
        if let Some(key) = &self.key {
            record.key = normalize_key(key);
        }
        if let Some(active) = self.active {
            record.active = active;
        }
        for (field, value) in &self.fields {
            if value.is_null() {
                record.fields.remove(field);
            } else {
                record.fields.insert(field.clone(), value.clone());
            }
        }
    }
}
