// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod consultation;
pub mod logging;
pub mod ordering;
pub mod record;
pub mod sequencer;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use admin::{ActionReport, AdminError, ListController, ListRow, ListView, Notice, NoticeKind};
pub use auth::{AdminGate, AdminSession, AuthError};
pub use catalog::{
    Article, ArticleDraft, ArticleKind, Category, CategoryDraft, CategoryKind, CatalogError, Contact,
    ContactDraft,
};
pub use config::{load_config, save_config, ConfigError, OrdoConfig};
pub use consultation::{Consultation, ConsultationDraft, ConsultationError, ConsultationStatus, Inbox};
pub use ordering::{MoveResult, OrderingError, OrderingService, RetryPolicy, CONTENDED_MESSAGE};
pub use record::{GroupKey, NewRecord, OrderedRecord, RecordError, RecordPatch, Version};
pub use sequencer::{Direction, MoveOutcome, SequenceError, Sequencer, DEFAULT_GAP};
pub use store::{FileStore, GroupSnapshot, MemoryStore, RecordStore, StoreError};
