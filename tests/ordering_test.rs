#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{create_test_dir, file_service, names_in_order, seed_group};
use ordo::store::RENUMBER_MARKER;
use ordo::{
    FileStore, GroupKey, MoveResult, OrderingError, OrderingService, RecordStore, RetryPolicy,
    Sequencer,
};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_order_survives_reopening_the_store() {
    let temp_dir = create_test_dir();
    let group = GroupKey::category();
    {
        let service = file_service(&temp_dir);
        let records = seed_group(&service, &group, &["Civil", "Penal", "Laboral"]).await;
        service.move_up(&group, &records[2].id).await.unwrap();
    }

    let reopened = file_service(&temp_dir);
    assert_eq!(
        names_in_order(&reopened, &group).await,
        ["Civil", "Laboral", "Penal"]
    );
}

#[tokio::test]
async fn test_small_gap_renumbers_on_disk() {
    let temp_dir = create_test_dir();
    let group = GroupKey::document_type();
    let service = file_service(&temp_dir).with_sequencer(Sequencer::new(2));
    let records = seed_group(&service, &group, &["A", "B", "C"]).await;

    // 2, 4, 6: there is no integer between 2 and 4 after the first move
    service.move_up(&group, &records[2].id).await.unwrap();
    let result = service.move_up(&group, &records[1].id).await.unwrap();
    assert!(matches!(result, MoveResult::Moved { .. }));

    assert_eq!(names_in_order(&service, &group).await, ["A", "B", "C"]);
    let marker = FileStore::new(temp_dir.path())
        .group_dir(&group)
        .join(RENUMBER_MARKER);
    assert!(!marker.exists(), "Completed batch leaves no marker");
}

#[tokio::test]
async fn test_interrupted_renumber_is_repaired_on_next_read() {
    let temp_dir = create_test_dir();
    let group = GroupKey::category();
    let service = file_service(&temp_dir);
    seed_group(&service, &group, &["A", "B"]).await;

    let store = FileStore::new(temp_dir.path());
    tokio::fs::write(store.group_dir(&group).join(RENUMBER_MARKER), "")
        .await
        .unwrap();
    assert!(store.fetch_group(&group).await.unwrap().suspect);

    let snapshot = service.snapshot(&group).await.unwrap();
    assert!(!snapshot.suspect);
    let ordinals: Vec<i64> = snapshot.records.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals, [1000, 2000]);
}

#[tokio::test]
async fn test_concurrent_moves_keep_ordinals_unique() {
    let temp_dir = create_test_dir();
    let group = GroupKey::contacts();
    let store = Arc::new(FileStore::new(temp_dir.path()));
    let service = OrderingService::new(Arc::clone(&store)).with_retry(RetryPolicy::new(5));
    let records = seed_group(&service, &group, &["A", "B", "C", "D", "E"]).await;

    let mut handles = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let service = service.clone();
        let group = group.clone();
        let id = record.id.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service.move_down(&group, &id).await
            } else {
                service.move_up(&group, &id).await
            }
        }));
    }
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) | Err(OrderingError::Contended { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let snapshot = service.snapshot(&group).await.unwrap();
    assert_eq!(snapshot.len(), 5);
    let ordinals: HashSet<i64> = snapshot.records.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals.len(), 5, "No two records share an ordinal");
}

#[tokio::test]
async fn test_concurrent_appends_never_collide() {
    let temp_dir = create_test_dir();
    let group = GroupKey::category();
    let service = file_service(&temp_dir).with_retry(RetryPolicy::new(10));

    let mut handles = Vec::new();
    for i in 0..6 {
        let service = service.clone();
        let group = group.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_last(ordo::NewRecord::new(group, format!("Entry {i}")))
                .await
        }));
    }
    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }

    let snapshot = service.snapshot(&group).await.unwrap();
    assert_eq!(snapshot.len(), created);
    let ordinals: HashSet<i64> = snapshot.records.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals.len(), created);
}

#[tokio::test]
async fn test_stale_snapshot_move_reports_conflict() {
    let temp_dir = create_test_dir();
    let group = GroupKey::category();
    let service = file_service(&temp_dir);
    let records = seed_group(&service, &group, &["A", "B", "C"]).await;

    let stale = service.snapshot(&group).await.unwrap();
    service.move_up(&group, &records[1].id).await.unwrap();

    let result = service.move_up_from(&stale, &records[2].id).await;
    assert!(matches!(result, Err(OrderingError::VersionConflict { .. })));
    assert_eq!(names_in_order(&service, &group).await, ["B", "A", "C"]);
}
