use super::ConsultationError;
use crate::catalog::is_valid_email;
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const EMAIL: &str = "email";
const MESSAGE: &str = "message";
const STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Pending,
    Read,
    Replied,
}

impl ConsultationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Read => "read",
            ConsultationStatus::Replied => "replied",
        }
    }

    /// Status stored on `record`, if it carries a recognised one.
    pub(super) fn of(record: &OrderedRecord) -> Option<Self> {
        record.field_str(STATUS)?.parse().ok()
    }

    pub(super) fn patch(self) -> RecordPatch {
        let mut patch = RecordPatch::default();
        patch
            .fields
            .insert(STATUS.to_string(), self.as_str().into());
        patch
    }
}

impl FromStr for ConsultationStatus {
    type Err = ConsultationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ConsultationStatus::Pending),
            "read" => Ok(ConsultationStatus::Read),
            "replied" => Ok(ConsultationStatus::Replied),
            other => Err(ConsultationError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a visitor sends through the help form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ConsultationDraft {
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// Pending record with trimmed text and a lowercased email. Every
    /// submission is its own entry, so the key is a fresh id rather than
    /// the sender.
    pub fn into_new_record(self) -> Result<NewRecord, ConsultationError> {
        let name = self.name.trim();
        let email = self.email.trim().to_lowercase();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ConsultationError::MissingField);
        }
        if !is_valid_email(&email) {
            return Err(ConsultationError::InvalidEmail(email));
        }
        Ok(NewRecord::new(GroupKey::consultations(), name)
            .with_key(&uuid::Uuid::new_v4().to_string())
            .with_field(EMAIL, email)
            .with_field(MESSAGE, message)
            .with_field(STATUS, ConsultationStatus::Pending.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Consultation {
    pub fn from_record(record: &OrderedRecord) -> Result<Self, ConsultationError> {
        if record.group != GroupKey::consultations() {
            return Err(ConsultationError::Malformed {
                id: record.id.clone(),
                reason: format!("stored in group '{}'", record.group),
            });
        }
        let text = |field: &'static str| {
            record
                .field_str(field)
                .map(str::to_string)
                .ok_or_else(|| ConsultationError::Malformed {
                    id: record.id.clone(),
                    reason: format!("missing '{field}'"),
                })
        };
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            email: text(EMAIL)?,
            message: text(MESSAGE)?,
            status: text(STATUS)?.parse()?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Case-insensitive match on name, email or message.
    #[must_use]
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.email, &self.message]
            .iter()
            .any(|text| text.to_lowercase().contains(&term))
    }
}

/// Narrowing for the inbox listing. The default shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationFilter {
    pub status: Option<ConsultationStatus>,
    pub search: Option<String>,
}

impl ConsultationFilter {
    #[must_use]
    pub fn with_status(status: ConsultationStatus) -> Self {
        Self {
            status: Some(status),
            search: None,
        }
    }

    #[must_use]
    pub fn matches(&self, consultation: &Consultation) -> bool {
        let status_ok = self.status.is_none() || self.status == Some(consultation.status);
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => consultation.mentions(term),
            _ => true,
        };
        status_ok && search_ok
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub read: usize,
    pub replied: usize,
}

impl StatusCounts {
    pub(super) fn add(&mut self, status: ConsultationStatus) {
        let slot = match status {
            ConsultationStatus::Pending => &mut self.pending,
            ConsultationStatus::Read => &mut self.read,
            ConsultationStatus::Replied => &mut self.replied,
        };
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.pending
            .saturating_add(self.read)
            .saturating_add(self.replied)
    }
}
