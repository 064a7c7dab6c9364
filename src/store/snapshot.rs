use crate::record::{sort_records, GroupKey, OrderedRecord};
use crate::sequencer::has_duplicate_ordinals;

/// One group's records as read at a single point in time, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSnapshot {
    pub group: GroupKey,
    pub records: Vec<OrderedRecord>,
    /// A renumbering batch was interrupted; ordinals cannot be trusted.
    pub suspect: bool,
}

impl GroupSnapshot {
    #[must_use]
    pub fn new(group: GroupKey, mut records: Vec<OrderedRecord>, suspect: bool) -> Self {
        sort_records(&mut records);
        Self {
            group,
            records,
            suspect,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&OrderedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn first(&self) -> Option<&OrderedRecord> {
        self.records.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&OrderedRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[must_use]
    pub fn ordinals(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.ordinal).collect()
    }

    /// Active records only, still in display order.
    pub fn active(&self) -> impl Iterator<Item = &OrderedRecord> {
        self.records.iter().filter(|r| r.active)
    }

    #[must_use]
    pub fn has_duplicate_ordinals(&self) -> bool {
        has_duplicate_ordinals(&self.records)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
