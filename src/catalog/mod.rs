//! Typed entities kept in ordered groups: categories, document types, team
//! contacts and the articles filed under them. Drafts validate and normalize
//! form input into [`NewRecord`]s; views read records back into typed shapes.
mod article;
mod category;
mod contact;

pub use article::{Article, ArticleDraft, ArticleKind, ArticleRefs};
pub use category::{Category, CategoryDraft, CategoryKind};
pub use contact::{Contact, ContactDraft, DEFAULT_JOB_TITLE};
pub(crate) use contact::is_valid_email;

use crate::record::{GroupKey, ARTICLES, CATEGORY, CONTACTS, DOCUMENT_TYPE, SPECIAL_ARTICLES};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Record belongs to group '{actual}', expected '{expected}'")]
    WrongGroup { expected: String, actual: String },

    #[error("Title is required")]
    TitleRequired,

    #[error("Content is required")]
    ContentRequired,

    #[error("Author is required")]
    AuthorRequired,

    #[error("Select at least one category")]
    CategoryRequired,

    #[error("Unknown or inactive category: {0}")]
    UnknownCategory(String),

    #[error("Document type is required")]
    DocumentTypeRequired,

    #[error("Unknown or inactive document type: {0}")]
    UnknownDocumentType(String),

    #[error("Unknown contact: {0}")]
    UnknownContact(String),

    #[error("Record {id} has an unreadable '{field}' field")]
    InvalidField { id: String, field: String },
}

/// Human name for the entries of `group`, used in notices.
#[must_use]
pub fn entity_label(group: &GroupKey) -> &'static str {
    match group.as_str() {
        CATEGORY => "Category",
        DOCUMENT_TYPE => "Document type",
        CONTACTS => "Contact",
        ARTICLES => "Article",
        SPECIAL_ARTICLES => "Special article",
        _ => "Entry",
    }
}

/// Trimmed value, or `None` when blank.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
