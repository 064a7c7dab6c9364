use super::*;
use tempfile::TempDir;

fn contact(name: &str) -> NewRecord {
    NewRecord::new(GroupKey::contacts(), name)
}

#[tokio::test]
async fn test_create_writes_one_file_per_record() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let record = store.create(contact("Ana"), 1000, &[]).await.unwrap();

    let path = temp
        .path()
        .join(GROUPS_DIR)
        .join("contacts")
        .join(format!("{}.json", record.id));
    assert!(path.exists());
    let on_disk: OrderedRecord =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(on_disk, record);
}

#[tokio::test]
async fn test_fetch_missing_group_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let snapshot = store.fetch_group(&GroupKey::category()).await.unwrap();
    assert!(snapshot.is_empty());
    assert!(!snapshot.suspect);
}

#[tokio::test]
async fn test_state_survives_reopening() {
    let temp = TempDir::new().unwrap();
    {
        let store = FileStore::new(temp.path());
        store.create(contact("Ana"), 2000, &[]).await.unwrap();
        store.create(contact("Bruno"), 1000, &[]).await.unwrap();
    }
    let store = FileStore::new(temp.path());
    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    let names: Vec<&str> = snapshot.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bruno", "Ana"]);
}

#[tokio::test]
async fn test_stale_write_is_rejected_and_not_persisted() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let record = store.create(contact("Ana"), 1000, &[]).await.unwrap();
    let stale = OrdinalWrite {
        id: record.id.clone(),
        ordinal: 1,
        expected_version: record.version.next(),
    };
    let err = store
        .write_ordinal(&GroupKey::contacts(), &stale, &[])
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    let reread = store.get(&GroupKey::contacts(), &record.id).await.unwrap();
    assert_eq!(reread.ordinal, 1000);
}

#[tokio::test]
async fn test_batch_removes_marker() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let a = store.create(contact("Ana"), 5, &[]).await.unwrap();
    let b = store.create(contact("Bruno"), 6, &[]).await.unwrap();
    let writes = vec![
        OrdinalWrite {
            id: a.id.clone(),
            ordinal: 1000,
            expected_version: a.version,
        },
        OrdinalWrite {
            id: b.id.clone(),
            ordinal: 2000,
            expected_version: b.version,
        },
    ];
    store
        .write_ordinals_batch(&GroupKey::contacts(), &writes)
        .await
        .unwrap();

    let dir = store.group_dir(&GroupKey::contacts());
    assert!(!dir.join(RENUMBER_MARKER).exists());
    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    assert_eq!(snapshot.ordinals(), vec![1000, 2000]);
    assert!(!snapshot.suspect);
}

#[tokio::test]
async fn test_leftover_marker_makes_group_suspect() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    store.create(contact("Ana"), 1000, &[]).await.unwrap();
    let dir = store.group_dir(&GroupKey::contacts());
    std::fs::write(dir.join(RENUMBER_MARKER), "interrupted").unwrap();

    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    assert!(snapshot.suspect);
    assert_eq!(snapshot.len(), 1, "Marker must not be read as a record");
}

#[tokio::test]
async fn test_unreadable_file_is_skipped() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    store.create(contact("Ana"), 1000, &[]).await.unwrap();
    let dir = store.group_dir(&GroupKey::contacts());
    std::fs::write(dir.join("garbage.json"), "{not json").unwrap();

    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_path_like_ids_are_not_found() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let err = store
        .get(&GroupKey::contacts(), "../../etc/passwd")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_file_only_for_target() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let a = store.create(contact("Ana"), 1000, &[]).await.unwrap();
    let b = store.create(contact("Bruno"), 2000, &[]).await.unwrap();

    store.delete(&GroupKey::contacts(), &a.id, None).await.unwrap();

    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    assert_eq!(snapshot.ids(), vec![b.id.as_str()]);
    assert_eq!(snapshot.get(&b.id).unwrap().version, b.version);
}

#[tokio::test]
async fn test_duplicate_key_rejected_across_reopen() {
    let temp = TempDir::new().unwrap();
    FileStore::new(temp.path())
        .create(contact("Ana"), 1000, &[])
        .await
        .unwrap();
    let err = FileStore::new(temp.path())
        .create(contact("ANA"), 2000, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_partial_batch_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path());
    let a = store.create(contact("Ana"), 5, &[]).await.unwrap();
    store.create(contact("Bruno"), 6, &[]).await.unwrap();
    let writes = vec![OrdinalWrite {
        id: a.id.clone(),
        ordinal: 1000,
        expected_version: a.version,
    }];
    let err = store
        .write_ordinals_batch(&GroupKey::contacts(), &writes)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let dir = store.group_dir(&GroupKey::contacts());
    assert!(!dir.join(RENUMBER_MARKER).exists());
    let snapshot = store.fetch_group(&GroupKey::contacts()).await.unwrap();
    assert_eq!(snapshot.ordinals(), vec![5, 6]);
}
