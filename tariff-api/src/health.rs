use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if let Some(db) = &state.db {
        if let Err(e) = db.ping().await {
            tracing::error!("Health check failed: {}", e);
            return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" })));
        }
    }
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
