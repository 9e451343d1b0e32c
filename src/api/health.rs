//! Liveness and readiness endpoints

use axum::extract::State;
use axum::{Json, Router, http::StatusCode, routing::get};
use serde::Serialize;

use crate::app::AppState;
use crate::db::ShelfCounts;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Ready once both tables answer a count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf: Option<ShelfCounts>,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    match state.db.users().counts().await {
        Ok(counts) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                shelf: Some(counts),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = ?e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    shelf: None,
                }),
            )
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
