//! Admin list controller: runs one user action against a group, turns the
//! outcome into a notice and re-fetches the list for display.
mod view;

pub use view::{ListRow, ListView};

use crate::auth::AdminSession;
use crate::catalog::entity_label;
use crate::ordering::{MoveResult, OrderingError, OrderingService, CONTENDED_MESSAGE};
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch};
use crate::sequencer::Direction;
use crate::store::RecordStore;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Admin session expired, log in again")]
    SessionExpired,

    #[error("Failed to load the list: {0}")]
    RefreshFailed(#[source] OrderingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// What the admin sees after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub notice: Notice,
    pub view: ListView,
}

pub struct ListController<S> {
    service: OrderingService<S>,
    group: GroupKey,
    session: AdminSession,
}

impl<S: RecordStore> ListController<S> {
    #[must_use]
    pub fn new(service: OrderingService<S>, group: GroupKey, session: AdminSession) -> Self {
        Self {
            service,
            group,
            session,
        }
    }

    #[must_use]
    pub fn group(&self) -> &GroupKey {
        &self.group
    }

    pub async fn refresh(&self) -> Result<ListView, AdminError> {
        self.authorize()?;
        let snapshot = self
            .service
            .snapshot(&self.group)
            .await
            .map_err(AdminError::RefreshFailed)?;
        Ok(ListView::from_snapshot(&snapshot))
    }

    /// Current state of one entry, or `None` when it is gone.
    pub async fn entry(&self, id: &str) -> Result<Option<OrderedRecord>, AdminError> {
        self.authorize()?;
        let snapshot = self
            .service
            .snapshot(&self.group)
            .await
            .map_err(AdminError::RefreshFailed)?;
        Ok(snapshot.get(id).cloned())
    }

    /// Add `record` at the end of the list.
    pub async fn create(&self, record: NewRecord) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .create_last(record)
            .await
            .map(|created| format!("{} '{}' created", self.label(), created.name));
        self.report("create", outcome).await
    }

    /// Add `record` at a 1-based `position`; positions past the end append.
    pub async fn create_at(
        &self,
        record: NewRecord,
        position: usize,
    ) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .create_at(record, position.saturating_sub(1))
            .await
            .map(|created| {
                format!("{} '{}' created at position {position}", self.label(), created.name)
            });
        self.report("create", outcome).await
    }

    pub async fn edit(&self, id: &str, patch: &RecordPatch) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .edit(&self.group, id, patch)
            .await
            .map(|updated| format!("{} '{}' updated", self.label(), updated.name));
        self.report("edit", outcome).await
    }

    pub async fn toggle_active(&self, id: &str) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = match self.service.snapshot(&self.group).await {
            Ok(snapshot) => match snapshot.get(id) {
                Some(current) => {
                    let patch = RecordPatch::activation(!current.active);
                    self.service
                        .edit(&self.group, id, &patch)
                        .await
                        .map(|updated| {
                            let state = if updated.active { "activated" } else { "deactivated" };
                            format!("{} '{}' {state}", self.label(), updated.name)
                        })
                }
                None => Err(OrderingError::NotFound(id.to_string())),
            },
            Err(e) => Err(e),
        };
        self.report("toggle", outcome).await
    }

    pub async fn delete(&self, id: &str) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .delete(&self.group, id)
            .await
            .map(|()| format!("{} deleted", self.label()));
        self.report("delete", outcome).await
    }

    pub async fn move_up(&self, id: &str) -> Result<ActionReport, AdminError> {
        self.step(id, Direction::Up).await
    }

    pub async fn move_down(&self, id: &str) -> Result<ActionReport, AdminError> {
        self.step(id, Direction::Down).await
    }

    async fn step(&self, id: &str, direction: Direction) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .step(&self.group, id, direction)
            .await
            .map(|result| match (result, direction) {
                (MoveResult::NoOp, Direction::Up) => format!("{} is already first", self.label()),
                (MoveResult::NoOp, Direction::Down) => format!("{} is already last", self.label()),
                (MoveResult::Moved { .. }, _) => {
                    format!("{} moved {}", self.label(), direction.label())
                }
            });
        self.report("move", outcome).await
    }

    /// Drag-to-position; `position` is 1-based like [`ListRow::position`].
    pub async fn move_to(&self, id: &str, position: usize) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let index = position.saturating_sub(1);
        let outcome = self
            .service
            .move_to(&self.group, id, index)
            .await
            .map(|result| match result {
                MoveResult::NoOp => format!("{} is already at position {position}", self.label()),
                MoveResult::Moved { .. } => {
                    format!("{} moved to position {position}", self.label())
                }
            });
        self.report("move_to", outcome).await
    }

    /// Respace the whole list evenly.
    pub async fn renumber(&self) -> Result<ActionReport, AdminError> {
        self.authorize()?;
        let outcome = self
            .service
            .renumber_group(&self.group)
            .await
            .map(|snapshot| format!("Renumbered {} entries", snapshot.len()));
        self.report("renumber", outcome).await
    }

    fn authorize(&self) -> Result<(), AdminError> {
        if self.session.is_valid_at(Utc::now()) {
            Ok(())
        } else {
            Err(AdminError::SessionExpired)
        }
    }

    fn label(&self) -> &'static str {
        entity_label(&self.group)
    }

    async fn report(
        &self,
        action: &'static str,
        outcome: Result<String, OrderingError>,
    ) -> Result<ActionReport, AdminError> {
        let notice = match outcome {
            Ok(message) => {
                info!(group = %self.group, action, "{message}");
                Notice::success(message)
            }
            Err(err) => self.failure_notice(action, &err),
        };
        let view = self.refresh().await?;
        Ok(ActionReport { notice, view })
    }

    fn failure_notice(&self, action: &'static str, err: &OrderingError) -> Notice {
        match err {
            OrderingError::AlreadyExists(_) if self.group == GroupKey::contacts() => {
                Notice::error("A contact with that email already exists")
            }
            OrderingError::AlreadyExists(_) => {
                Notice::error("An entry with that name already exists")
            }
            OrderingError::Contended { .. } | OrderingError::VersionConflict { .. } => {
                Notice::error(CONTENDED_MESSAGE)
            }
            OrderingError::NotFound(_) => Notice::error(format!(
                "{} no longer exists; the list was refreshed",
                self.label()
            )),
            OrderingError::ValidationError(msg) => Notice::error(msg.clone()),
            OrderingError::StoreError(_) | OrderingError::Internal(_) => {
                error!(group = %self.group, action, error = %err, "Admin action failed");
                Notice::error("Could not save the changes, please try again")
            }
        }
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod admin_tests;
