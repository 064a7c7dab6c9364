//! Mutation rules shared by every store. Each function works on one group's
//! records keyed by id, validates everything before mutating, and returns the
//! records it changed so file-backed stores know what to persist.
use super::{OrdinalWrite, StoreError, VersionGuard};
use crate::record::{NewRecord, OrderedRecord, RecordPatch, Version};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub(super) type GroupMap = HashMap<String, OrderedRecord>;

fn check_version(record: &OrderedRecord, expected: Version) -> Result<(), StoreError> {
    if record.version == expected {
        Ok(())
    } else {
        Err(StoreError::VersionConflict {
            id: record.id.clone(),
            expected,
        })
    }
}

fn check_guards(map: &GroupMap, guards: &[VersionGuard]) -> Result<(), StoreError> {
    for guard in guards {
        match map.get(&guard.id) {
            Some(record) => check_version(record, guard.version)?,
            None => {
                return Err(StoreError::VersionConflict {
                    id: guard.id.clone(),
                    expected: guard.version,
                })
            }
        }
    }
    Ok(())
}

fn check_key_free(map: &GroupMap, key: &str, except: Option<&str>) -> Result<(), StoreError> {
    let taken = map
        .values()
        .any(|r| r.key == key && except.is_none_or(|id| r.id != id));
    if taken {
        Err(StoreError::AlreadyExists(key.to_string()))
    } else {
        Ok(())
    }
}

fn check_ordinal_free(map: &GroupMap, ordinal: i64, except: Option<&str>) -> Result<(), StoreError> {
    let taken = map
        .values()
        .any(|r| r.ordinal == ordinal && except.is_none_or(|id| r.id != id));
    if taken {
        Err(StoreError::OrdinalTaken(ordinal))
    } else {
        Ok(())
    }
}

fn touch(record: &mut OrderedRecord, now: DateTime<Utc>) {
    record.version = record.version.next();
    record.updated_at = now;
}

pub(super) fn create(
    map: &mut GroupMap,
    new: NewRecord,
    ordinal: i64,
    guards: &[VersionGuard],
    now: DateTime<Utc>,
) -> Result<OrderedRecord, StoreError> {
    if new.name.is_empty() {
        return Err(StoreError::ValidationError("name must not be empty".to_string()));
    }
    if new.key.is_empty() {
        return Err(StoreError::ValidationError("key must not be empty".to_string()));
    }
    check_key_free(map, &new.key, None)?;
    check_guards(map, guards)?;
    check_ordinal_free(map, ordinal, None)?;
    let record = new.into_record(ordinal, now);
    map.insert(record.id.clone(), record.clone());
    Ok(record)
}

pub(super) fn update_fields(
    map: &mut GroupMap,
    id: &str,
    patch: &RecordPatch,
    expected: Version,
    now: DateTime<Utc>,
) -> Result<OrderedRecord, StoreError> {
    let current = map
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    check_version(current, expected)?;
    let mut updated = current.clone();
    patch.apply(&mut updated);
    if updated.name.is_empty() {
        return Err(StoreError::ValidationError("name must not be empty".to_string()));
    }
    if updated.key != current.key {
        check_key_free(map, &updated.key, Some(id))?;
    }
    touch(&mut updated, now);
    map.insert(id.to_string(), updated.clone());
    Ok(updated)
}

pub(super) fn write_ordinal(
    map: &mut GroupMap,
    write: &OrdinalWrite,
    guards: &[VersionGuard],
    now: DateTime<Utc>,
) -> Result<OrderedRecord, StoreError> {
    let current = map
        .get(&write.id)
        .ok_or_else(|| StoreError::NotFound(write.id.clone()))?;
    check_version(current, write.expected_version)?;
    check_guards(map, guards)?;
    check_ordinal_free(map, write.ordinal, Some(&write.id))?;
    let record = map
        .get_mut(&write.id)
        .ok_or_else(|| StoreError::NotFound(write.id.clone()))?;
    record.ordinal = write.ordinal;
    touch(record, now);
    Ok(record.clone())
}

/// Renumbering must cover the whole group: every current record needs a
/// write with a matching version.
pub(super) fn write_batch(
    map: &mut GroupMap,
    writes: &[OrdinalWrite],
    now: DateTime<Utc>,
) -> Result<Vec<OrderedRecord>, StoreError> {
    let guards: Vec<VersionGuard> = writes
        .iter()
        .map(|w| VersionGuard {
            id: w.id.clone(),
            version: w.expected_version,
        })
        .collect();
    check_guards(map, &guards)?;
    // A record the caller never saw would keep its old ordinal and land
    // somewhere inside the fresh sequence.
    if let Some(unseen) = map
        .values()
        .find(|r| !writes.iter().any(|w| w.id == r.id))
    {
        return Err(StoreError::VersionConflict {
            id: unseen.id.clone(),
            expected: unseen.version,
        });
    }
    let mut written = Vec::with_capacity(writes.len());
    for write in writes {
        if let Some(record) = map.get_mut(&write.id) {
            record.ordinal = write.ordinal;
            touch(record, now);
            written.push(record.clone());
        }
    }
    Ok(written)
}

pub(super) fn delete(
    map: &mut GroupMap,
    id: &str,
    expected: Option<Version>,
) -> Result<OrderedRecord, StoreError> {
    let current = map
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    if let Some(expected) = expected {
        check_version(current, expected)?;
    }
    map.remove(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}
