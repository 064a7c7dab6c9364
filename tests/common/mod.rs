//! Common test utilities

use ordo::{FileStore, GroupKey, NewRecord, OrderedRecord, OrderingService};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Ordering service over a file store rooted at `dir`
pub fn file_service(dir: &TempDir) -> OrderingService<FileStore> {
    OrderingService::new(Arc::new(FileStore::new(dir.path())))
}

/// Create one record per name, in order, at the end of `group`
pub async fn seed_group(
    service: &OrderingService<FileStore>,
    group: &GroupKey,
    names: &[&str],
) -> Vec<OrderedRecord> {
    let mut created = Vec::new();
    for name in names {
        let record = service
            .create_last(NewRecord::new(group.clone(), *name))
            .await
            .expect("Failed to seed record");
        created.push(record);
    }
    created
}

/// Names of `group` in display order
pub async fn names_in_order(service: &OrderingService<FileStore>, group: &GroupKey) -> Vec<String> {
    service
        .snapshot(group)
        .await
        .expect("Failed to read group")
        .records
        .iter()
        .map(|r| r.name.clone())
        .collect()
}
