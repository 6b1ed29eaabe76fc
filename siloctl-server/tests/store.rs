//! Repository and batch engine against a live PostgreSQL
//!
//! Run with `DATABASE_URL=... cargo test -p siloctl-server -- --ignored`.

mod common;

use serde_json::json;
use siloctl_server::db::{DbError, SilobagRepo, UserRepo};
use siloctl_server::ingest::{IngestEngine, IngestError};
use siloctl_server::models::{Email, NewSilobag, ValidationError};

fn bag(name: Option<&str>) -> NewSilobag {
    let mut data = json!({
        "weight": 750.5,
        "size": "large",
        "species": "corn",
        "bagging_date": "2024-03-15"
    });
    if let Some(name) = name {
        data["name"] = json!(name);
    }
    NewSilobag::from_json(data.as_object().unwrap()).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_is_unique_violation() {
    let pool = common::pool().await;
    let email = Email::from_json(Some(&json!(common::unique_email("dup")))).unwrap();
    let repo = UserRepo::new(&pool);

    repo.create(&email).await.unwrap();
    let err = repo.create(&email).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }), "{err:?}");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn users_listed_by_id_descending() {
    let pool = common::pool().await;
    let first = common::user(&pool, "order").await;
    let second = common::user(&pool, "order").await;

    let ids: Vec<i64> = UserRepo::new(&pool)
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();

    let pos_first = ids.iter().position(|&id| id == first.id).unwrap();
    let pos_second = ids.iter().position(|&id| id == second.id).unwrap();
    assert!(pos_second < pos_first);
}

#[tokio::test]
#[ignore = "requires database"]
async fn silobag_for_missing_user_is_fk_violation() {
    let pool = common::pool().await;
    let missing = common::missing_user_id(&pool).await;
    let owner = siloctl_server::models::UserId::parse(&missing.to_string()).unwrap();

    let err = SilobagRepo::new(&pool)
        .create(owner, &bag(None))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn silobag_ids_grow_and_list_is_newest_first() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "bags").await;
    let repo = SilobagRepo::new(&pool);

    let a = repo.create(common::user_id(&owner), &bag(Some("north"))).await.unwrap();
    let b = repo.create(common::user_id(&owner), &bag(None)).await.unwrap();

    assert!(b.id > a.id);
    assert_eq!(a.user_id, owner.id);
    assert_eq!(a.name.as_deref(), Some("north"));
    assert_eq!(b.name, None);
    assert_eq!(a.bagging_date.to_string(), "2024-03-15");
    assert!(a.created_at <= b.created_at);

    let listed = repo.list_for_user(common::user_id(&owner)).await.unwrap();
    assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b.id, a.id]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_user_lists_nothing() {
    let pool = common::pool().await;
    let missing = common::missing_user_id(&pool).await;
    let owner = siloctl_server::models::UserId::parse(&missing.to_string()).unwrap();

    let listed = SilobagRepo::new(&pool).list_for_user(owner).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn insert_then_update_across_batches() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "batch").await;
    let engine = IngestEngine::new(&pool);

    let txid = engine
        .ingest(&json!({"mutations": [common::insert_op(owner.id, "first")]}))
        .await
        .unwrap();
    assert!(txid.0 > 0);

    let created = SilobagRepo::new(&pool)
        .list_for_user(common::user_id(&owner))
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    let id = created[0].id;

    engine
        .ingest(&json!({"mutations": [{
            "op": "update",
            "table": "silobags",
            "key": id,
            "data": {"weight": 900, "name": null, "user_id": 1, "id": 0}
        }]}))
        .await
        .unwrap();

    let updated = SilobagRepo::new(&pool)
        .list_for_user(common::user_id(&owner))
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].id, id);
    assert_eq!(updated[0].user_id, owner.id);
    assert_eq!(updated[0].weight, 900.0);
    assert_eq!(updated[0].name, None);
    assert_eq!(updated[0].species, "soy");
}

#[tokio::test]
#[ignore = "requires database"]
async fn txids_increase_across_batches() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "txid").await;
    let engine = IngestEngine::new(&pool);

    let first = engine
        .ingest(&json!({"mutations": [common::insert_op(owner.id, "a")]}))
        .await
        .unwrap();
    let second = engine
        .ingest(&json!({"mutations": [common::insert_op(owner.id, "b")]}))
        .await
        .unwrap();

    assert!(second > first);
}

#[tokio::test]
#[ignore = "requires database"]
async fn invalid_op_leaves_no_rows() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "reject").await;

    let err = IngestEngine::new(&pool)
        .ingest(&json!({"mutations": [
            common::insert_op(owner.id, "a"),
            common::insert_op(owner.id, "b"),
            {"op": "frobnicate", "table": "silobags"}
        ]}))
        .await
        .unwrap_err();

    assert_eq!(err.validation(), Some(ValidationError::UnsupportedOp));
    assert_eq!(common::count_silobags(&pool, owner.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn store_failure_rolls_back_earlier_mutations() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "rollback").await;
    let missing = common::missing_user_id(&pool).await;

    let err = IngestEngine::new(&pool)
        .ingest(&json!({"mutations": [
            common::insert_op(owner.id, "kept?"),
            common::insert_op(missing, "orphan")
        ]}))
        .await
        .unwrap_err();

    match err {
        IngestError::Store { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(source, DbError::ForeignKeyViolation { .. }));
        }
        other => panic!("expected store failure, got {other:?}"),
    }
    assert_eq!(common::count_silobags(&pool, owner.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_keys_still_commit() {
    let pool = common::pool().await;
    let missing = common::missing_user_id(&pool).await;

    let txid = IngestEngine::new(&pool)
        .ingest(&json!({"mutations": [
            {"op": "update", "table": "silobags", "key": missing, "data": {"size": "medium"}},
            {"op": "delete", "table": "silobags", "key": missing}
        ]}))
        .await;

    assert!(txid.is_ok(), "{txid:?}");
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_removes_row() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "delete").await;
    let created = SilobagRepo::new(&pool)
        .create(common::user_id(&owner), &bag(None))
        .await
        .unwrap();

    IngestEngine::new(&pool)
        .ingest(&json!({"mutations": [
            {"op": "delete", "table": "silobags", "key": created.id}
        ]}))
        .await
        .unwrap();

    assert_eq!(common::count_silobags(&pool, owner.id).await, 0);
}
