//! Operation plans that absorb gap exhaustion.
//!
//! A plan is what the caller has to persist: an optional full renumbering of
//! the group followed by the single ordinal the request asked for. The
//! renumbering is empty unless the snapshot ran out of room between the
//! neighbours involved.
use super::{Direction, MoveOutcome, SequenceError, Sequencer};
use crate::record::OrderedRecord;
use tracing::debug;

/// A new ordinal for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub ordinal: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Renumbering to persist before `outcome`; empty on a plain move.
    pub renumber: Vec<Assignment>,
    pub outcome: MoveOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub renumber: Vec<Assignment>,
    pub ordinal: i64,
}

impl MovePlan {
    #[must_use]
    pub fn renumbers(&self) -> bool {
        !self.renumber.is_empty()
    }
}

impl InsertPlan {
    #[must_use]
    pub fn renumbers(&self) -> bool {
        !self.renumber.is_empty()
    }
}

/// Copy of `records` with `assignments` applied, kept in display order.
#[must_use]
pub fn apply_assignments(records: &[OrderedRecord], assignments: &[Assignment]) -> Vec<OrderedRecord> {
    let mut updated: Vec<OrderedRecord> = records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if let Some(a) = assignments.iter().find(|a| a.id == record.id) {
                record.ordinal = a.ordinal;
            }
            record
        })
        .collect();
    crate::record::sort_records(&mut updated);
    updated
}

impl Sequencer {
    /// Plan a one-step move, renumbering first if the gap is exhausted.
    pub fn plan_move(
        &self,
        records: &[OrderedRecord],
        id: &str,
        direction: Direction,
    ) -> Result<MovePlan, SequenceError> {
        self.with_renumber(records, |seq, snapshot| seq.step(snapshot, id, direction))
            .map(|(renumber, outcome)| MovePlan { renumber, outcome })
    }

    /// Plan a reposition to `target_index`.
    pub fn plan_move_to(
        &self,
        records: &[OrderedRecord],
        id: &str,
        target_index: usize,
    ) -> Result<MovePlan, SequenceError> {
        self.with_renumber(records, |seq, snapshot| seq.move_to(snapshot, id, target_index))
            .map(|(renumber, outcome)| MovePlan { renumber, outcome })
    }

    /// Plan the ordinal for an insertion at `target_index`.
    pub fn plan_insert(
        &self,
        records: &[OrderedRecord],
        target_index: usize,
    ) -> Result<InsertPlan, SequenceError> {
        self.with_renumber(records, |seq, snapshot| seq.insert_at(snapshot, target_index))
            .map(|(renumber, ordinal)| InsertPlan { renumber, ordinal })
    }

    fn with_renumber<T>(
        &self,
        records: &[OrderedRecord],
        compute: impl Fn(&Self, &[OrderedRecord]) -> Result<T, SequenceError>,
    ) -> Result<(Vec<Assignment>, T), SequenceError> {
        match compute(self, records) {
            Err(SequenceError::GapExhausted { lower, upper }) => {
                debug!(lower, upper, size = records.len(), "Gap exhausted, planning renumber");
                let renumber = self.renumber(records);
                let renumbered = apply_assignments(records, &renumber);
                let value = compute(self, &renumbered)?;
                Ok((renumber, value))
            }
            other => other.map(|value| (Vec::new(), value)),
        }
    }
}
