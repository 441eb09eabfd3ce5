//! Portfolio handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tandem_core::models::{parse_date, Goal};
use tandem_core::portfolio::TimelineConflict;
use tandem_core::{FetchPolicy, PortfolioAnalysis};

use crate::{AppError, AppState};

/// Query parameters for analyzing the server's goals
#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    /// Monthly savings capacity (required)
    pub capacity: Option<f64>,
    /// Analysis date, YYYY-MM-DD (defaults to today)
    pub now: Option<String>,
    /// Reload goals from the source instead of reusing the last fetch
    #[serde(default)]
    pub refresh: bool,
}

/// Request body for analyzing an ad-hoc goal list
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub goals: Vec<Goal>,
    pub capacity: f64,
    pub now: Option<String>,
}

fn resolve_now(now: Option<&str>) -> Result<NaiveDate, AppError> {
    match now {
        Some(s) => parse_date(s)
            .ok_or_else(|| AppError::bad_request("Invalid 'now' date. Use YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

async fn analyze_source(
    state: &AppState,
    params: &PortfolioQuery,
) -> Result<PortfolioAnalysis, AppError> {
    let capacity = params
        .capacity
        .ok_or_else(|| AppError::bad_request("Missing 'capacity' query parameter"))?;
    let now = resolve_now(params.now.as_deref())?;

    state
        .service
        .analyze(capacity, now, FetchPolicy::from_refresh(params.refresh))
        .await
        .map_err(AppError::from_core)
}

/// GET /api/portfolio - Analyze the server's goal source
///
/// Reuses the last fetched goals unless `refresh=true`.
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PortfolioQuery>,
) -> Result<Json<PortfolioAnalysis>, AppError> {
    let analysis = analyze_source(&state, &params).await?;
    Ok(Json(analysis))
}

/// GET /api/portfolio/conflicts - Conflict timeline of the server's goals
pub async fn get_conflicts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PortfolioQuery>,
) -> Result<Json<Vec<TimelineConflict>>, AppError> {
    let analysis = analyze_source(&state, &params).await?;
    Ok(Json(analysis.conflicts))
}

/// POST /api/portfolio/analyze - Analyze goals sent in the request body
pub async fn analyze_portfolio(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<PortfolioAnalysis>, AppError> {
    let now = resolve_now(body.now.as_deref())?;

    let analysis = state
        .service
        .engine()
        .analyze(&body.goals, body.capacity, now)
        .map_err(AppError::from_core)?;

    Ok(Json(analysis))
}
