use crate::sequencer::SequenceError;
use crate::store::StoreError;
use thiserror::Error;
use tracing::debug;

/// Message shown once automatic retries are used up.
pub const CONTENDED_MESSAGE: &str = "Someone else changed this list, please retry";

#[derive(Error, Debug)]
pub enum OrderingError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record {id} was changed by someone else")]
    VersionConflict { id: String },

    #[error("Someone else changed this list, please retry (gave up after {attempts} attempts)")]
    Contended { attempts: u32 },

    #[error("An entry with key '{0}' already exists")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    StoreError(#[source] StoreError),

    #[error("Sequencing failed: {0}")]
    Internal(String),
}

impl OrderingError {
    /// Whether a fresh snapshot may let the operation succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderingError::VersionConflict { .. })
    }

    /// Store errors raised while writing. A record that vanished after the
    /// snapshot was read is a lost race, not a bad request.
    pub(super) fn from_write(err: StoreError) -> Self {
        if err.is_conflict() {
            debug!(error = %err, "Store rejected a stale write");
        }
        match err {
            StoreError::NotFound(id) => OrderingError::VersionConflict { id },
            other => other.into(),
        }
    }
}

impl From<StoreError> for OrderingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => OrderingError::NotFound(id),
            StoreError::VersionConflict { id, .. } => OrderingError::VersionConflict { id },
            StoreError::OrdinalTaken(ordinal) => OrderingError::VersionConflict {
                id: format!("ordinal {ordinal}"),
            },
            StoreError::AlreadyExists(key) => OrderingError::AlreadyExists(key),
            StoreError::ValidationError(msg) => OrderingError::ValidationError(msg),
            other => OrderingError::StoreError(other),
        }
    }
}

impl From<SequenceError> for OrderingError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::NotFound(id) => OrderingError::NotFound(id),
            exhausted @ SequenceError::GapExhausted { .. } => {
                OrderingError::Internal(exhausted.to_string())
            }
        }
    }
}
