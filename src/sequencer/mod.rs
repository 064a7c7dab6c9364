//! Ordinal sequencing engine.
//!
//! Every operation is a pure function of a group snapshot in display order
//! (ascending ordinal, ties by creation time). New ordinals are picked from the
//! gaps between neighbours; when no integer is left strictly between two
//! neighbours the planner renumbers the whole group to `gap, 2*gap, ...` in
//! its current order and recomputes the request against that sequence.
mod bounds;
mod plan;

pub use plan::{apply_assignments, Assignment, InsertPlan, MovePlan};

use crate::record::OrderedRecord;
use thiserror::Error;

/// Default spacing between ordinals handed out by append and renumber.
pub const DEFAULT_GAP: i64 = 1000;

/// Smallest usable gap; with a gap of 1 no midpoint ever exists.
pub const MIN_GAP: i64 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Record not found in group snapshot: {0}")]
    NotFound(String),
    #[error("No free ordinal between {lower} and {upper}")]
    GapExhausted { lower: i64, upper: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The record takes `ordinal`; no other record changes.
    Moved { id: String, ordinal: i64 },
    /// Boundary move (first moved up, last moved down, or already in place).
    NoOp,
}

/// Computes ordinals for one configured gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequencer {
    gap: i64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self { gap: DEFAULT_GAP }
    }
}

impl Sequencer {
    /// Gaps below [`MIN_GAP`] are raised to it.
    #[must_use]
    pub fn new(gap: i64) -> Self {
        Self {
            gap: gap.max(MIN_GAP),
        }
    }

    #[must_use]
    pub fn gap(&self) -> i64 {
        self.gap
    }

    /// Ordinal that sorts after every record: `max + gap`, or `gap` when empty.
    /// Saturates at `i64::MAX`.
    #[must_use]
    pub fn append_ordinal(&self, records: &[OrderedRecord]) -> i64 {
        records
            .iter()
            .map(|r| r.ordinal)
            .max()
            .map_or(self.gap, |max| max.saturating_add(self.gap))
    }

    /// Ordinal that sorts before every record: `min - gap`, or `gap` when empty.
    /// Saturates at `i64::MIN`.
    #[must_use]
    pub fn prepend_ordinal(&self, records: &[OrderedRecord]) -> i64 {
        records
            .iter()
            .map(|r| r.ordinal)
            .min()
            .map_or(self.gap, |min| min.saturating_sub(self.gap))
    }

    /// Move one position towards the front.
    pub fn move_up(&self, records: &[OrderedRecord], id: &str) -> Result<MoveOutcome, SequenceError> {
        let index = position(records, id)?;
        let Some(before) = index.checked_sub(1) else {
            return Ok(MoveOutcome::NoOp);
        };
        let prev = neighbour(records, before)?;
        let ordinal = match before.checked_sub(1).and_then(|i| records.get(i)) {
            None => bounds::below(prev.ordinal, self.gap)?,
            Some(prev_prev) => bounds::between(prev_prev.ordinal, prev.ordinal)?,
        };
        Ok(MoveOutcome::Moved {
            id: id.to_string(),
            ordinal,
        })
    }

    /// Move one position towards the back.
    pub fn move_down(
        &self,
        records: &[OrderedRecord],
        id: &str,
    ) -> Result<MoveOutcome, SequenceError> {
        let index = position(records, id)?;
        let after = index.saturating_add(1);
        let Some(next) = records.get(after) else {
            return Ok(MoveOutcome::NoOp);
        };
        let ordinal = match records.get(after.saturating_add(1)) {
            None => bounds::above(next.ordinal, self.gap)?,
            Some(next_next) => bounds::between(next.ordinal, next_next.ordinal)?,
        };
        Ok(MoveOutcome::Moved {
            id: id.to_string(),
            ordinal,
        })
    }

    /// Move one step in `direction`.
    pub fn step(
        &self,
        records: &[OrderedRecord],
        id: &str,
        direction: Direction,
    ) -> Result<MoveOutcome, SequenceError> {
        match direction {
            Direction::Up => self.move_up(records, id),
            Direction::Down => self.move_down(records, id),
        }
    }

    /// Ordinal for a new record so that it lands at `target_index`.
    ///
    /// Index 0 prepends, an index at or past the end appends, anything else
    /// takes the midpoint of the records at `target_index - 1` and
    /// `target_index`.
    pub fn insert_at(&self, records: &[OrderedRecord], target_index: usize) -> Result<i64, SequenceError> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Ok(self.gap);
        };
        if target_index == 0 {
            return bounds::below(first.ordinal, self.gap);
        }
        if target_index >= records.len() {
            return bounds::above(last.ordinal, self.gap);
        }
        let lower = neighbour(records, target_index.saturating_sub(1))?;
        let upper = neighbour(records, target_index)?;
        bounds::between(lower.ordinal, upper.ordinal)
    }

    /// Reposition an existing record so it ends up at `target_index`
    /// (clamped to the group size).
    pub fn move_to(
        &self,
        records: &[OrderedRecord],
        id: &str,
        target_index: usize,
    ) -> Result<MoveOutcome, SequenceError> {
        let current = position(records, id)?;
        let others: Vec<OrderedRecord> = records.iter().filter(|r| r.id != id).cloned().collect();
        let target = target_index.min(others.len());
        if target == current {
            return Ok(MoveOutcome::NoOp);
        }
        let ordinal = self.insert_at(&others, target)?;
        Ok(MoveOutcome::Moved {
            id: id.to_string(),
            ordinal,
        })
    }

    /// Fresh evenly spaced ordinals for every record, in current order.
    #[must_use]
    pub fn renumber(&self, records: &[OrderedRecord]) -> Vec<Assignment> {
        let mut ordinal = 0_i64;
        records
            .iter()
            .map(|record| {
                ordinal = ordinal.saturating_add(self.gap);
                Assignment {
                    id: record.id.clone(),
                    ordinal,
                }
            })
            .collect()
    }
}

/// Whether two records of the snapshot share an ordinal. Display order is
/// still deterministic, but such groups came from an unguarded writer.
#[must_use]
pub fn has_duplicate_ordinals(records: &[OrderedRecord]) -> bool {
    records
        .windows(2)
        .any(|pair| matches!(pair, [a, b] if a.ordinal == b.ordinal))
}

fn position(records: &[OrderedRecord], id: &str) -> Result<usize, SequenceError> {
    records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| SequenceError::NotFound(id.to_string()))
}

fn neighbour(records: &[OrderedRecord], index: usize) -> Result<&OrderedRecord, SequenceError> {
    records
        .get(index)
        .ok_or_else(|| SequenceError::NotFound(format!("position {index}")))
}

#[cfg(test)]
#[path = "../sequencer_tests.rs"]
mod sequencer_tests;
