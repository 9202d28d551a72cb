use database::{error::ServiceError, services::identity::IdentityService};

use crate::common::{SYSTEM_USERNAME, TestDb};

#[tokio::test]
async fn usernames_are_case_insensitive() {
    let app = TestDb::spawn().await;
    let alice = app.register("Alice").await;

    let id = IdentityService::resolve_owner_id(&app.db, "  ALICE ")
        .await
        .unwrap();
    assert_eq!(id, alice.acting_owner);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestDb::spawn().await;
    app.register("alice").await;

    let err = IdentityService::register_owner(&app.db, "ALICE")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UsernameTaken(ref name) if name == "alice"));
}

#[tokio::test]
async fn blank_username_is_rejected() {
    let app = TestDb::spawn().await;

    let err = IdentityService::register_owner(&app.db, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestDb::spawn().await;

    let err = IdentityService::resolve_viewer(&app.db, "nobody", SYSTEM_USERNAME)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::OwnerNotFound(_)));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn missing_system_owner_is_fatal() {
    let app = TestDb::spawn().await;
    app.register("alice").await;

    let err = IdentityService::resolve_viewer(&app.db, "alice", "not-provisioned")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::SystemOwnerMissing(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn provisioning_is_idempotent() {
    let app = TestDb::spawn().await;

    let again = IdentityService::provision_system_owner(&app.db, SYSTEM_USERNAME)
        .await
        .unwrap();
    assert_eq!(again, app.system.acting_owner);
}

#[tokio::test]
async fn viewer_pairs_user_with_system_owner() {
    let app = TestDb::spawn().await;
    let alice = app.register("alice").await;

    assert_ne!(alice.acting_owner, alice.system_owner);
    assert_eq!(alice.system_owner, app.system.acting_owner);
    assert!(!alice.is_system());
    assert!(app.system.is_system());
}
