//! Liveness and configuration handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tandem_core::EngineConfig;

use crate::{AppError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: String,
}

/// GET /api/health - Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: state.service.source_name().to_string(),
    })
}

/// GET /api/config - Active engine configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<EngineConfig> {
    Json(state.service.engine().config().clone())
}

/// Unknown API routes
pub async fn api_not_found() -> AppError {
    AppError::not_found("Not found")
}
