//! End-to-end HTTP flows through the router with a live PostgreSQL

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use siloctl_server::http::{build_router, AppState};
use sqlx::PgPool;
use tower::ServiceExt;

async fn call(pool: &PgPool, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let app = build_router(AppState { pool: pool.clone() });
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_user_then_conflict() {
    let pool = common::pool().await;
    let email = common::unique_email("http");

    let (status, created) = call(&pool, "POST", "/users", Some(json!({"email": email}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], email.as_str());
    assert!(created["id"].as_i64().is_some());
    assert!(created["created_at"].is_string());

    let (status, body) = call(&pool, "POST", "/users", Some(json!({"email": email}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "email_already_exists"}));

    let (status, listed) = call(&pool, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let matches = listed
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["email"] == email.as_str())
        .count();
    assert_eq!(matches, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn silobag_lifecycle() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "life").await;
    let uri = format!("/users/{}/silobags", owner.id);

    let (status, created) = call(
        &pool,
        "POST",
        &uri,
        Some(json!({
            "weight": 500,
            "size": "small",
            "species": "soy",
            "bagging_date": "2024-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], owner.id);
    assert_eq!(created["bagging_date"], "2024-01-01");
    assert_eq!(created["name"], Value::Null);

    let (status, body) = call(
        &pool,
        "POST",
        "/ingest",
        Some(json!({"mutations": [{
            "op": "update",
            "table": "silobags",
            "key": created["id"],
            "data": {"name": "renamed", "species": "wheat"}
        }]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["txid"].as_i64().is_some());

    let (status, listed) = call(&pool, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["name"], "renamed");
    assert_eq!(listed[0]["species"], "wheat");
    assert_eq!(listed[0]["weight"], 500.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn silobag_for_unknown_user_is_404() {
    let pool = common::pool().await;
    let missing = common::missing_user_id(&pool).await;

    let (status, body) = call(
        &pool,
        "POST",
        &format!("/users/{missing}/silobags"),
        Some(json!({
            "weight": 1,
            "size": "small",
            "species": "soy",
            "bagging_date": "2024-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "user_not_found"}));
}

#[tokio::test]
#[ignore = "requires database"]
async fn failed_batch_is_500_and_rolled_back() {
    let pool = common::pool().await;
    let owner = common::user(&pool, "batch500").await;
    let missing = common::missing_user_id(&pool).await;

    let (status, body) = call(
        &pool,
        "POST",
        "/ingest",
        Some(json!({"mutations": [
            common::insert_op(owner.id, "first"),
            common::insert_op(missing, "orphan")
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "db_error");
    assert!(body["detail"].is_string());

    assert_eq!(common::count_silobags(&pool, owner.id).await, 0);
}
