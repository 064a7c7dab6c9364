use super::*;
use crate::auth::SessionToken;
use crate::catalog::{CategoryDraft, CategoryKind, ContactDraft};
use crate::ordering::RetryPolicy;
use crate::store::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

fn session() -> AdminSession {
    AdminSession::from_token(&SessionToken::issue(Utc::now()), Duration::from_secs(3600))
}

fn controller(group: GroupKey) -> ListController<MemoryStore> {
    let service = OrderingService::new(Arc::new(MemoryStore::new()));
    ListController::new(service, group, session())
}

fn category(name: &str) -> NewRecord {
    CategoryDraft::new(name)
        .into_new_record(CategoryKind::Category)
        .unwrap()
}

async fn seeded(names: &[&str]) -> ListController<MemoryStore> {
    let controller = controller(GroupKey::category());
    for name in names {
        let report = controller.create(category(name)).await.unwrap();
        assert!(!report.notice.is_error(), "{}", report.notice.message);
    }
    controller
}

#[tokio::test]
async fn test_create_reports_and_refreshes() {
    let controller = controller(GroupKey::category());
    let report = controller.create(category("Civil")).await.unwrap();
    assert_eq!(report.notice.kind, NoticeKind::Success);
    assert_eq!(report.notice.message, "Category 'Civil' created");
    assert_eq!(report.view.names(), vec!["Civil"]);
    let row = &report.view.rows[0];
    assert_eq!(row.position, 1);
    assert!(!row.can_move_up);
    assert!(!row.can_move_down);
}

#[tokio::test]
async fn test_rows_flag_movable_directions() {
    let controller = seeded(&["A", "B", "C"]).await;
    let view = controller.refresh().await.unwrap();
    let flags: Vec<(bool, bool)> = view
        .rows
        .iter()
        .map(|r| (r.can_move_up, r.can_move_down))
        .collect();
    assert_eq!(flags, vec![(false, true), (true, true), (true, false)]);
    assert_eq!(view.rows[2].position, 3);
}

#[tokio::test]
async fn test_duplicate_name_is_a_notice_not_an_error() {
    let controller = seeded(&["Civil"]).await;
    let report = controller.create(category("civil")).await.unwrap();
    assert!(report.notice.is_error());
    assert_eq!(report.notice.message, "An entry with that name already exists");
    assert_eq!(report.view.rows.len(), 1);
}

#[tokio::test]
async fn test_duplicate_contact_email() {
    let controller = controller(GroupKey::contacts());
    let ana = ContactDraft::new("Ana", "ana@example.com");
    controller
        .create(ana.clone().into_new_record().unwrap())
        .await
        .unwrap();
    let again = ContactDraft::new("Ana R.", "ANA@example.com");
    let report = controller
        .create(again.into_new_record().unwrap())
        .await
        .unwrap();
    assert_eq!(report.notice.message, "A contact with that email already exists");
}

#[tokio::test]
async fn test_move_actions() {
    let controller = seeded(&["A", "B", "C"]).await;
    let view = controller.refresh().await.unwrap();
    let c = view.rows[2].id.clone();

    let report = controller.move_up(&c).await.unwrap();
    assert_eq!(report.notice.message, "Category moved up");
    assert_eq!(report.view.names(), vec!["A", "C", "B"]);

    let report = controller.move_to(&c, 1).await.unwrap();
    assert_eq!(report.view.names(), vec!["C", "A", "B"]);

    let report = controller.move_up(&c).await.unwrap();
    assert!(!report.notice.is_error());
    assert_eq!(report.notice.message, "Category is already first");
}

#[tokio::test]
async fn test_toggle_and_edit() {
    let controller = seeded(&["Civil"]).await;
    let id = controller.refresh().await.unwrap().rows[0].id.clone();

    let report = controller.toggle_active(&id).await.unwrap();
    assert_eq!(report.notice.message, "Category 'Civil' deactivated");
    assert!(!report.view.rows[0].active);

    let patch = CategoryDraft::new("Civil Law").to_patch().unwrap();
    let report = controller.edit(&id, &patch).await.unwrap();
    assert_eq!(report.view.rows[0].name, "Civil Law");
    assert!(report.view.rows[0].active);
}

#[tokio::test]
async fn test_delete_and_missing_record() {
    let controller = seeded(&["A", "B"]).await;
    let id = controller.refresh().await.unwrap().rows[0].id.clone();

    let report = controller.delete(&id).await.unwrap();
    assert_eq!(report.view.names(), vec!["B"]);

    let report = controller.delete(&id).await.unwrap();
    assert!(report.notice.is_error());
    assert!(report.notice.message.contains("no longer exists"));
}

#[tokio::test]
async fn test_renumber_action() {
    let controller = seeded(&["A", "B"]).await;
    let report = controller.renumber().await.unwrap();
    assert_eq!(report.notice.message, "Renumbered 2 entries");
    let ordinals: Vec<i64> = report.view.rows.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals, vec![1000, 2000]);
}

#[tokio::test]
async fn test_expired_session_blocks_actions() {
    let issued = Utc::now() - chrono::Duration::hours(2);
    let expired = AdminSession::from_token(&SessionToken::issue(issued), Duration::from_secs(3600));
    let service = OrderingService::new(Arc::new(MemoryStore::new()))
        .with_retry(RetryPolicy::default());
    let controller = ListController::new(service, GroupKey::category(), expired);

    assert!(matches!(
        controller.refresh().await,
        Err(AdminError::SessionExpired)
    ));
    assert!(matches!(
        controller.create(category("Civil")).await,
        Err(AdminError::SessionExpired)
    ));
}

#[tokio::test]
async fn test_create_at_position() {
    let controller = seeded(&["A", "C"]).await;
    let report = controller.create_at(category("B"), 2).await.unwrap();
    assert_eq!(report.notice.message, "Category 'B' created at position 2");
    assert_eq!(report.view.names(), vec!["A", "B", "C"]);

    let report = controller.create_at(category("Z"), 99).await.unwrap();
    assert_eq!(report.view.names(), vec!["A", "B", "C", "Z"]);
}

#[tokio::test]
async fn test_entry_reads_current_state() {
    let controller = seeded(&["Civil"]).await;
    let id = controller.refresh().await.unwrap().rows[0].id.clone();
    let entry = controller.entry(&id).await.unwrap().unwrap();
    assert_eq!(entry.name, "Civil");
    assert!(controller.entry("gone").await.unwrap().is_none());
}
