//! Command-line surface over the admin controller.
mod args;
mod error_mapping;
mod handlers;
mod output;
mod structured_error;

pub use args::{
    Args, Command, ConsultationAction, ContactArgs, EditArgs, MaintenanceAction, MaintenanceFieldArg,
    StatusArg,
};
pub use error_mapping::ToStructuredError;
pub use handlers::run;
pub use structured_error::{to_error_json, ErrorMessage, StructuredError};

use crate::admin::AdminError;
use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::consultation::ConsultationError;
use crate::ordering::OrderingError;
use crate::record::RecordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error(transparent)]
    Consultation(#[from] ConsultationError),

    /// The action ran but the controller reported a failure notice.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    JsonError(#[from] serde_json::Error),
}
