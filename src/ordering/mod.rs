//! Boundary between the pure sequencer and a record store.
//!
//! Every operation reads a snapshot of the group, plans against it, persists
//! any renumbering as one batch and finishes with a single compare-and-swap
//! write guarded by the neighbours the new ordinal was computed from. A write
//! that loses a race re-reads the group and runs again until the
//! [`RetryPolicy`] is used up, then fails with [`OrderingError::Contended`].
//!
//! The `*_from` variants run exactly one attempt against a snapshot the caller
//! already holds and report a lost race as [`OrderingError::VersionConflict`].
mod error;
mod retry;

pub use error::{OrderingError, CONTENDED_MESSAGE};
pub use retry::RetryPolicy;

use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch};
use crate::sequencer::{Assignment, Direction, MoveOutcome, MovePlan, Sequencer};
use crate::store::{GroupSnapshot, OrdinalWrite, RecordStore, VersionGuard};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Moved {
        id: String,
        ordinal: i64,
        /// The group was renumbered before the move could be placed.
        renumbered: bool,
    },
    /// Boundary move; nothing was written.
    NoOp,
}

impl MoveResult {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, MoveResult::NoOp)
    }

    #[must_use]
    pub fn ordinal(&self) -> Option<i64> {
        match self {
            MoveResult::Moved { ordinal, .. } => Some(*ordinal),
            MoveResult::NoOp => None,
        }
    }
}

pub struct OrderingService<S> {
    store: Arc<S>,
    sequencer: Sequencer,
    retry: RetryPolicy,
}

impl<S> Clone for OrderingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sequencer: self.sequencer,
            retry: self.retry,
        }
    }
}

impl<S: RecordStore> OrderingService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sequencer: Sequencer::default(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_sequencer(mut self, sequencer: Sequencer) -> Self {
        self.sequencer = sequencer;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn sequencer(&self) -> Sequencer {
        self.sequencer
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fresh snapshot of `group`. A suspect group is renumbered before it is
    /// handed out.
    #[instrument(name = "ordering.snapshot", skip_all, fields(group = %group))]
    pub async fn snapshot(&self, group: &GroupKey) -> Result<GroupSnapshot, OrderingError> {
        let snapshot = self.store.fetch_group(group).await?;
        self.trusted(snapshot).await
    }

    /// Ordinal that places a new record last in `group`.
    #[instrument(name = "ordering.append", skip_all, fields(group = %group))]
    pub async fn append(&self, group: &GroupKey) -> Result<i64, OrderingError> {
        let snapshot = self.snapshot(group).await?;
        Ok(self.sequencer.append_ordinal(&snapshot.records))
    }

    /// Ordinal for a record about to be created at `index`. When the gap at
    /// that position is exhausted the renumbering is persisted first.
    #[instrument(name = "ordering.insert_at", skip_all, fields(group = %group, index = index))]
    pub async fn insert_at(&self, group: &GroupKey, index: usize) -> Result<i64, OrderingError> {
        self.run(group, move |snapshot| self.insert_once(snapshot, index))
            .await
    }

    /// Single attempt of [`Self::insert_at`] against `snapshot`.
    pub async fn insert_at_from(
        &self,
        snapshot: &GroupSnapshot,
        index: usize,
    ) -> Result<i64, OrderingError> {
        let snapshot = self.trusted(snapshot.clone()).await?;
        self.insert_once(snapshot, index).await
    }

    /// Create `record` as the last entry of its group.
    #[instrument(name = "ordering.create", skip_all, fields(group = %record.group, key = %record.key))]
    pub async fn create_last(&self, record: NewRecord) -> Result<OrderedRecord, OrderingError> {
        let group = record.group.clone();
        self.run(&group, move |snapshot| {
            self.create_once(snapshot, record.clone(), None)
        })
        .await
    }

    /// Create `record` so that it lands at `index` of its group.
    #[instrument(name = "ordering.create", skip_all, fields(group = %record.group, key = %record.key, index = index))]
    pub async fn create_at(
        &self,
        record: NewRecord,
        index: usize,
    ) -> Result<OrderedRecord, OrderingError> {
        let group = record.group.clone();
        self.run(&group, move |snapshot| {
            self.create_once(snapshot, record.clone(), Some(index))
        })
        .await
    }

    pub async fn move_up(&self, group: &GroupKey, id: &str) -> Result<MoveResult, OrderingError> {
        self.step(group, id, Direction::Up).await
    }

    pub async fn move_down(&self, group: &GroupKey, id: &str) -> Result<MoveResult, OrderingError> {
        self.step(group, id, Direction::Down).await
    }

    /// Move `id` one position in `direction`.
    #[instrument(
        name = "ordering.move",
        skip_all,
        fields(group = %group, id = %id, direction = direction.label())
    )]
    pub async fn step(
        &self,
        group: &GroupKey,
        id: &str,
        direction: Direction,
    ) -> Result<MoveResult, OrderingError> {
        self.run(group, move |snapshot| self.step_once(snapshot, id, direction))
            .await
    }

    pub async fn move_up_from(
        &self,
        snapshot: &GroupSnapshot,
        id: &str,
    ) -> Result<MoveResult, OrderingError> {
        self.step_from(snapshot, id, Direction::Up).await
    }

    pub async fn move_down_from(
        &self,
        snapshot: &GroupSnapshot,
        id: &str,
    ) -> Result<MoveResult, OrderingError> {
        self.step_from(snapshot, id, Direction::Down).await
    }

    /// Single attempt of [`Self::step`] against `snapshot`.
    pub async fn step_from(
        &self,
        snapshot: &GroupSnapshot,
        id: &str,
        direction: Direction,
    ) -> Result<MoveResult, OrderingError> {
        let snapshot = self.trusted(snapshot.clone()).await?;
        self.step_once(snapshot, id, direction).await
    }

    /// Reposition `id` so it ends up at `index` (clamped to the group).
    #[instrument(name = "ordering.move_to", skip_all, fields(group = %group, id = %id, index = index))]
    pub async fn move_to(
        &self,
        group: &GroupKey,
        id: &str,
        index: usize,
    ) -> Result<MoveResult, OrderingError> {
        self.run(group, move |snapshot| self.move_to_once(snapshot, id, index))
            .await
    }

    /// Single attempt of [`Self::move_to`] against `snapshot`.
    pub async fn move_to_from(
        &self,
        snapshot: &GroupSnapshot,
        id: &str,
        index: usize,
    ) -> Result<MoveResult, OrderingError> {
        let snapshot = self.trusted(snapshot.clone()).await?;
        self.move_to_once(snapshot, id, index).await
    }

    /// Reassign `gap, 2*gap, ...` to the whole group in its current order.
    #[instrument(name = "ordering.renumber", skip_all, fields(group = %group))]
    pub async fn renumber_group(&self, group: &GroupKey) -> Result<GroupSnapshot, OrderingError> {
        self.run(group, move |snapshot| async move {
            let assignments = self.sequencer.renumber(&snapshot.records);
            self.persist_renumber(&snapshot, &assignments).await
        })
        .await
    }

    /// Edit non-ordering fields of `id`.
    #[instrument(name = "ordering.edit", skip_all, fields(group = %group, id = %id))]
    pub async fn edit(
        &self,
        group: &GroupKey,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<OrderedRecord, OrderingError> {
        self.run(group, move |snapshot| async move {
            let current = snapshot
                .get(id)
                .ok_or_else(|| OrderingError::NotFound(id.to_string()))?;
            let updated = self
                .store
                .update_fields(group, id, patch, current.version)
                .await
                .map_err(OrderingError::from_write)?;
            Ok(updated)
        })
        .await
    }

    /// Edit `id` with a patch derived from the state read in the same
    /// attempt. `None` leaves the record as it is.
    #[instrument(name = "ordering.edit_with", skip_all, fields(group = %group, id = %id))]
    pub async fn edit_with<F>(
        &self,
        group: &GroupKey,
        id: &str,
        derive: F,
    ) -> Result<OrderedRecord, OrderingError>
    where
        F: Fn(&OrderedRecord) -> Option<RecordPatch>,
    {
        let derive = &derive;
        self.run(group, move |snapshot| async move {
            let current = snapshot
                .get(id)
                .ok_or_else(|| OrderingError::NotFound(id.to_string()))?;
            let Some(patch) = derive(current) else {
                return Ok(current.clone());
            };
            self.store
                .update_fields(group, id, &patch, current.version)
                .await
                .map_err(OrderingError::from_write)
        })
        .await
    }

    /// Remove `id`. Siblings keep their ordinals.
    #[instrument(name = "ordering.delete", skip_all, fields(group = %group, id = %id))]
    pub async fn delete(&self, group: &GroupKey, id: &str) -> Result<(), OrderingError> {
        self.run(group, move |snapshot| async move {
            let current = snapshot
                .get(id)
                .ok_or_else(|| OrderingError::NotFound(id.to_string()))?;
            self.store
                .delete(group, id, Some(current.version))
                .await
                .map_err(OrderingError::from_write)?;
            debug!("Record deleted");
            Ok(())
        })
        .await
    }

    /// Run `attempt` against fresh snapshots until it succeeds, fails with a
    /// non-retryable error, or the retry policy is used up.
    async fn run<T, F, Fut>(&self, group: &GroupKey, mut attempt: F) -> Result<T, OrderingError>
    where
        F: FnMut(GroupSnapshot) -> Fut,
        Fut: Future<Output = Result<T, OrderingError>>,
    {
        let mut number = 1_u32;
        loop {
            let result = match self.snapshot(group).await {
                Ok(snapshot) => attempt(snapshot).await,
                Err(err) => Err(err),
            };
            match result {
                Err(err) if err.is_retryable() => {
                    if !self.retry.allows_another(number) {
                        warn!(group = %group, attempts = number, error = %err, "Giving up on contended group");
                        return Err(OrderingError::Contended { attempts: number });
                    }
                    warn!(group = %group, attempt = number, error = %err, "Lost a write race, retrying from a fresh snapshot");
                    number = number.saturating_add(1);
                }
                other => return other,
            }
        }
    }

    async fn trusted(&self, snapshot: GroupSnapshot) -> Result<GroupSnapshot, OrderingError> {
        if !snapshot.suspect {
            return Ok(snapshot);
        }
        warn!(group = %snapshot.group, size = snapshot.len(), "Repairing group left mid-renumber");
        let assignments = self.sequencer.renumber(&snapshot.records);
        self.persist_renumber(&snapshot, &assignments).await
    }

    /// Write `assignments` as one batch with the versions read in `snapshot`
    /// and return the snapshot as it now stands.
    async fn persist_renumber(
        &self,
        snapshot: &GroupSnapshot,
        assignments: &[Assignment],
    ) -> Result<GroupSnapshot, OrderingError> {
        let writes: Vec<OrdinalWrite> = assignments
            .iter()
            .filter_map(|a| {
                snapshot.get(&a.id).map(|record| OrdinalWrite {
                    id: a.id.clone(),
                    ordinal: a.ordinal,
                    expected_version: record.version,
                })
            })
            .collect();
        let written = self
            .store
            .write_ordinals_batch(&snapshot.group, &writes)
            .await
            .map_err(OrderingError::from_write)?;
        info!(
            group = %snapshot.group,
            count = written.len(),
            gap = self.sequencer.gap(),
            "Group renumbered"
        );
        let records = snapshot
            .records
            .iter()
            .map(|record| {
                written
                    .iter()
                    .find(|w| w.id == record.id)
                    .unwrap_or(record)
                    .clone()
            })
            .collect();
        Ok(GroupSnapshot::new(snapshot.group.clone(), records, false))
    }

    async fn insert_once(&self, snapshot: GroupSnapshot, index: usize) -> Result<i64, OrderingError> {
        let plan = self.sequencer.plan_insert(&snapshot.records, index)?;
        if plan.renumbers() {
            self.persist_renumber(&snapshot, &plan.renumber).await?;
        }
        Ok(plan.ordinal)
    }

    async fn create_once(
        &self,
        snapshot: GroupSnapshot,
        record: NewRecord,
        index: Option<usize>,
    ) -> Result<OrderedRecord, OrderingError> {
        let (ordinal, snapshot) = match index {
            None => (self.sequencer.append_ordinal(&snapshot.records), snapshot),
            Some(index) => {
                let plan = self.sequencer.plan_insert(&snapshot.records, index)?;
                let snapshot = if plan.renumbers() {
                    self.persist_renumber(&snapshot, &plan.renumber).await?
                } else {
                    snapshot
                };
                (plan.ordinal, snapshot)
            }
        };
        let guards = bracketing_guards(&snapshot.records, None, ordinal);
        let created = self
            .store
            .create(record, ordinal, &guards)
            .await
            .map_err(OrderingError::from_write)?;
        debug!(id = %created.id, ordinal, "Record created");
        Ok(created)
    }

    async fn step_once(
        &self,
        snapshot: GroupSnapshot,
        id: &str,
        direction: Direction,
    ) -> Result<MoveResult, OrderingError> {
        let plan = self.sequencer.plan_move(&snapshot.records, id, direction)?;
        self.apply_move(snapshot, plan).await
    }

    async fn move_to_once(
        &self,
        snapshot: GroupSnapshot,
        id: &str,
        index: usize,
    ) -> Result<MoveResult, OrderingError> {
        let plan = self.sequencer.plan_move_to(&snapshot.records, id, index)?;
        self.apply_move(snapshot, plan).await
    }

    async fn apply_move(
        &self,
        snapshot: GroupSnapshot,
        plan: MovePlan,
    ) -> Result<MoveResult, OrderingError> {
        let renumbered = plan.renumbers();
        let snapshot = if renumbered {
            self.persist_renumber(&snapshot, &plan.renumber).await?
        } else {
            snapshot
        };
        let MoveOutcome::Moved { id, ordinal } = plan.outcome else {
            debug!("Boundary move, nothing to write");
            return Ok(MoveResult::NoOp);
        };
        let target = snapshot
            .get(&id)
            .ok_or_else(|| OrderingError::NotFound(id.clone()))?;
        let write = OrdinalWrite {
            id: id.clone(),
            ordinal,
            expected_version: target.version,
        };
        let guards = bracketing_guards(&snapshot.records, Some(&id), ordinal);
        let updated = self
            .store
            .write_ordinal(&snapshot.group, &write, &guards)
            .await
            .map_err(OrderingError::from_write)?;
        debug!(id = %updated.id, ordinal, renumbered, "Ordinal written");
        Ok(MoveResult::Moved {
            id,
            ordinal: updated.ordinal,
            renumbered,
        })
    }
}

/// Guards for the nearest records below and above `ordinal`, ignoring
/// `exclude`. These are the neighbours a midpoint or end placement was
/// computed from.
fn bracketing_guards(
    records: &[OrderedRecord],
    exclude: Option<&str>,
    ordinal: i64,
) -> Vec<VersionGuard> {
    let keep = |r: &&OrderedRecord| exclude.is_none_or(|id| r.id != id);
    let lower = records
        .iter()
        .filter(keep)
        .filter(|r| r.ordinal < ordinal)
        .max_by_key(|r| r.ordinal);
    let upper = records
        .iter()
        .filter(keep)
        .filter(|r| r.ordinal > ordinal)
        .min_by_key(|r| r.ordinal);
    lower
        .into_iter()
        .chain(upper)
        .map(VersionGuard::from)
        .collect()
}
