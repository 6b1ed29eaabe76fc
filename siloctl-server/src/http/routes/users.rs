//! User endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::db::repos::{User, UserRepo};
use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::Email;

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: super::timestamp(&u.created_at),
        }
    }
}

/// GET /users - all users, newest id first
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users - create a user from `{email}`
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = Email::from_json(body.get("email"))?;

    let user = UserRepo::new(&state.pool)
        .create(&email)
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => ApiError::Conflict {
                code: "email_already_exists",
            },
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
