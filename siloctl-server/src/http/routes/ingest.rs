//! Batch ingest endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::ingest::{IngestEngine, TxId};

/// Ingest response
#[derive(Serialize)]
pub struct IngestResponse {
    pub txid: TxId,
}

/// POST /ingest - apply `{mutations: [...]}` in one transaction
async fn ingest(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<IngestResponse>, ApiError> {
    let txid = IngestEngine::new(&state.pool).ingest(&body).await?;
    Ok(Json(IngestResponse { txid }))
}

/// Ingest routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ingest", post(ingest))
}
