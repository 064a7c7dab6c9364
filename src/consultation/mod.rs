//! Visitor consultations: submitted through the public help form, then read,
//! answered and cleared by the admin.
//!
//! Consultations live in their own group of the record store and are appended
//! in order of arrival. The inbox lists them newest first. Status changes are
//! compare-and-swap edits decided against the state read in the same attempt:
//! opening only promotes a consultation that is still pending.
mod model;

pub use model::{Consultation, ConsultationDraft, ConsultationFilter, ConsultationStatus, StatusCounts};

use crate::auth::AdminSession;
use crate::ordering::{OrderingError, OrderingService};
use crate::record::GroupKey;
use crate::store::RecordStore;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ConsultationError {
    #[error("Name, email and message are all required")]
    MissingField,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Unknown consultation status '{0}': use pending, read or replied")]
    UnknownStatus(String),

    #[error("Consultation not found: {0}")]
    NotFound(String),

    #[error("Stored consultation {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Admin session expired, log in again")]
    SessionExpired,

    #[error(transparent)]
    Ordering(OrderingError),
}

impl From<OrderingError> for ConsultationError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::NotFound(id) => ConsultationError::NotFound(id),
            other => ConsultationError::Ordering(other),
        }
    }
}

pub struct Inbox<S> {
    service: OrderingService<S>,
    group: GroupKey,
}

impl<S: RecordStore> Inbox<S> {
    #[must_use]
    pub fn new(service: OrderingService<S>) -> Self {
        Self {
            service,
            group: GroupKey::consultations(),
        }
    }

    /// Record a visitor's consultation as pending. Needs no session.
    #[instrument(name = "inbox.submit", skip_all)]
    pub async fn submit(&self, draft: ConsultationDraft) -> Result<Consultation, ConsultationError> {
        let record = draft.into_new_record()?;
        let created = self.service.create_last(record).await?;
        info!(id = %created.id, "Consultation received");
        Consultation::from_record(&created)
    }

    /// Consultations matching `filter`, newest first.
    pub async fn list(
        &self,
        session: &AdminSession,
        filter: &ConsultationFilter,
    ) -> Result<Vec<Consultation>, ConsultationError> {
        let mut all = self.all(session).await?;
        all.retain(|c| filter.matches(c));
        Ok(all)
    }

    pub async fn counts(&self, session: &AdminSession) -> Result<StatusCounts, ConsultationError> {
        let mut counts = StatusCounts::default();
        for consultation in self.all(session).await? {
            counts.add(consultation.status);
        }
        Ok(counts)
    }

    /// Show one consultation. A pending one is marked read on the way.
    #[instrument(name = "inbox.open", skip_all, fields(id = %id))]
    pub async fn open(
        &self,
        session: &AdminSession,
        id: &str,
    ) -> Result<Consultation, ConsultationError> {
        authorize(session)?;
        let record = self
            .service
            .edit_with(&self.group, id, |current| {
                (ConsultationStatus::of(current) == Some(ConsultationStatus::Pending))
                    .then(|| ConsultationStatus::Read.patch())
            })
            .await?;
        Consultation::from_record(&record)
    }

    /// Move a consultation to any status. Setting the current status again
    /// writes nothing.
    #[instrument(name = "inbox.set_status", skip_all, fields(id = %id, status = %status))]
    pub async fn set_status(
        &self,
        session: &AdminSession,
        id: &str,
        status: ConsultationStatus,
    ) -> Result<Consultation, ConsultationError> {
        authorize(session)?;
        let record = self
            .service
            .edit_with(&self.group, id, |current| {
                (ConsultationStatus::of(current) != Some(status)).then(|| status.patch())
            })
            .await?;
        info!("Consultation marked as {status}");
        Consultation::from_record(&record)
    }

    #[instrument(name = "inbox.delete", skip_all, fields(id = %id))]
    pub async fn delete(&self, session: &AdminSession, id: &str) -> Result<(), ConsultationError> {
        authorize(session)?;
        self.service.delete(&self.group, id).await?;
        info!("Consultation deleted");
        Ok(())
    }

    async fn all(&self, session: &AdminSession) -> Result<Vec<Consultation>, ConsultationError> {
        authorize(session)?;
        let snapshot = self.service.snapshot(&self.group).await?;
        let mut all = snapshot
            .records
            .iter()
            .map(Consultation::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}

fn authorize(session: &AdminSession) -> Result<(), ConsultationError> {
    if session.is_valid_at(Utc::now()) {
        Ok(())
    } else {
        Err(ConsultationError::SessionExpired)
    }
}
