use super::CliError;
use crate::admin::AdminError;
use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::consultation::ConsultationError;
use crate::ordering::OrderingError;
use crate::record::RecordError;
use crate::store::StoreError;

const LOGIN_TIP: &str = "Run 'ordo login' to start an admin session";

/// Trait for mapping domain errors to structured error codes and optional tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);
}

impl ToStructuredError for RecordError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            RecordError::InvalidGroup(_) => (
                "INVALID_GROUP",
                Some("Known groups are category, document_type, contacts, articles, special_articles and consultations"),
            ),
        }
    }
}

impl ToStructuredError for StoreError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            StoreError::IoError(_) => ("IO_ERROR", None),
            StoreError::JsonError(_) => ("JSON_ERROR", None),
            StoreError::NotFound(_) => ("NOT_FOUND", None),
            StoreError::VersionConflict { .. } => ("VERSION_CONFLICT", None),
            StoreError::OrdinalTaken(_) => ("ORDINAL_TAKEN", None),
            StoreError::AlreadyExists(_) => ("ALREADY_EXISTS", None),
            StoreError::ValidationError(_) => ("VALIDATION_ERROR", None),
        }
    }
}

impl ToStructuredError for OrderingError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            OrderingError::NotFound(_) => ("NOT_FOUND", Some("Run 'ordo list <group>' to see current ids")),
            OrderingError::VersionConflict { .. } => ("VERSION_CONFLICT", None),
            OrderingError::Contended { .. } => ("CONTENDED", Some("Run the command again")),
            OrderingError::AlreadyExists(_) => ("ALREADY_EXISTS", None),
            OrderingError::ValidationError(_) => ("VALIDATION_ERROR", None),
            OrderingError::StoreError(e) => e.error_code_and_tip(),
            OrderingError::Internal(_) => ("INTERNAL_ERROR", None),
        }
    }
}

impl ToStructuredError for CatalogError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            CatalogError::NameRequired => ("NAME_REQUIRED", Some("Provide a non-empty name")),
            CatalogError::EmailRequired => ("EMAIL_REQUIRED", Some("Provide a non-empty email")),
            CatalogError::InvalidEmail(_) => ("INVALID_EMAIL", None),
            CatalogError::WrongGroup { .. } => ("WRONG_GROUP", None),
            CatalogError::TitleRequired => ("TITLE_REQUIRED", None),
            CatalogError::ContentRequired => ("CONTENT_REQUIRED", None),
            CatalogError::AuthorRequired => ("AUTHOR_REQUIRED", None),
            CatalogError::CategoryRequired => ("CATEGORY_REQUIRED", None),
            CatalogError::UnknownCategory(_) => ("UNKNOWN_CATEGORY", Some("Run 'ordo list category' to see active categories")),
            CatalogError::DocumentTypeRequired => ("DOCUMENT_TYPE_REQUIRED", None),
            CatalogError::UnknownDocumentType(_) => ("UNKNOWN_DOCUMENT_TYPE", Some("Run 'ordo list document_type' to see active document types")),
            CatalogError::UnknownContact(_) => ("UNKNOWN_CONTACT", None),
            CatalogError::InvalidField { .. } => ("INVALID_RECORD", None),
        }
    }
}

impl ToStructuredError for ConfigError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            ConfigError::IoError(_) => ("IO_ERROR", None),
            ConfigError::TomlError(_) => ("CONFIG_PARSE_ERROR", Some("Fix or remove config.toml in the data directory")),
            ConfigError::TomlSerError(_) => ("CONFIG_WRITE_ERROR", None),
            ConfigError::InvalidDuration { .. } => (
                "INVALID_DURATION",
                Some("Use a duration such as '24h' or '90m' for auth.session_ttl"),
            ),
        }
    }
}

impl ToStructuredError for AuthError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            AuthError::EmptyPassword => ("EMPTY_PASSWORD", None),
            AuthError::InvalidPassword => ("INVALID_PASSWORD", None),
            AuthError::PasswordNotConfigured => (
                "PASSWORD_NOT_CONFIGURED",
                Some("Run 'ordo set-password' to choose an admin password"),
            ),
            AuthError::NotAuthenticated => ("NOT_AUTHENTICATED", Some(LOGIN_TIP)),
            AuthError::IoError(_) => ("IO_ERROR", None),
            AuthError::JsonError(_) => ("JSON_ERROR", None),
            AuthError::ConfigError(e) => e.error_code_and_tip(),
        }
    }
}

impl ToStructuredError for AdminError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            AdminError::SessionExpired => ("SESSION_EXPIRED", Some(LOGIN_TIP)),
            AdminError::RefreshFailed(e) => e.error_code_and_tip(),
        }
    }
}

impl ToStructuredError for ConsultationError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            ConsultationError::MissingField => ("MISSING_FIELD", Some("Name, email and message are required")),
            ConsultationError::InvalidEmail(_) => ("INVALID_EMAIL", None),
            ConsultationError::UnknownStatus(_) => ("UNKNOWN_STATUS", Some("Use pending, read or replied")),
            ConsultationError::NotFound(_) => ("NOT_FOUND", Some("Run 'ordo consultations list' to see current ids")),
            ConsultationError::Malformed { .. } => ("INVALID_RECORD", None),
            ConsultationError::SessionExpired => ("SESSION_EXPIRED", Some(LOGIN_TIP)),
            ConsultationError::Ordering(e) => e.error_code_and_tip(),
        }
    }
}

impl ToStructuredError for CliError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            CliError::Record(e) => e.error_code_and_tip(),
            CliError::Catalog(e) => e.error_code_and_tip(),
            CliError::Auth(e) => e.error_code_and_tip(),
            CliError::Admin(e) => e.error_code_and_tip(),
            CliError::Config(e) => e.error_code_and_tip(),
            CliError::Ordering(e) => e.error_code_and_tip(),
            CliError::Consultation(e) => e.error_code_and_tip(),
            CliError::Rejected(_) => ("ACTION_REJECTED", None),
            CliError::OutputError(_) => ("IO_ERROR", None),
            CliError::JsonError(_) => ("JSON_ERROR", None),
        }
    }
}
