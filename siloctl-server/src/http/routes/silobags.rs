//! Silobag endpoints nested under their owner

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::repos::{Silobag, SilobagRepo};
use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidUserId};
use crate::http::server::AppState;
use crate::models::NewSilobag;

/// Silobag response
#[derive(Serialize)]
pub struct SilobagResponse {
    pub id: i64,
    pub user_id: i64,
    pub weight: f64,
    pub size: String,
    pub species: String,
    pub bagging_date: String,
    pub created_at: String,
    pub name: Option<String>,
}

impl From<Silobag> for SilobagResponse {
    fn from(b: Silobag) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            weight: b.weight,
            size: b.size,
            species: b.species,
            bagging_date: b.bagging_date.format("%Y-%m-%d").to_string(),
            created_at: super::timestamp(&b.created_at),
            name: b.name,
        }
    }
}

/// GET /users/{user_id}/silobags - a user's silobags, newest first
async fn list_silobags(
    State(state): State<Arc<AppState>>,
    ValidUserId(user_id): ValidUserId,
) -> Result<Json<Vec<SilobagResponse>>, ApiError> {
    let bags = SilobagRepo::new(&state.pool).list_for_user(user_id).await?;
    Ok(Json(bags.into_iter().map(SilobagResponse::from).collect()))
}

/// POST /users/{user_id}/silobags - create a silobag for a user
async fn create_silobag(
    State(state): State<Arc<AppState>>,
    ValidUserId(user_id): ValidUserId,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<SilobagResponse>), ApiError> {
    let empty = Map::new();
    let bag = NewSilobag::from_json(body.as_object().unwrap_or(&empty))?;

    let created = SilobagRepo::new(&state.pool)
        .create(user_id, &bag)
        .await
        .map_err(|e| match e {
            DbError::ForeignKeyViolation { .. } => ApiError::NotFound {
                code: "user_not_found",
            },
            other => other.into(),
        })?;

    tracing::info!(id = created.id, user_id = created.user_id, "silobag created");
    Ok((StatusCode::CREATED, Json(SilobagResponse::from(created))))
}

/// Silobag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/{user_id}/silobags",
        get(list_silobags).post(create_silobag),
    )
}
