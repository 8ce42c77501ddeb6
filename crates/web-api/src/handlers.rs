use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use playwatch_data::{Account, Snapshot};
use playwatch_growth::{AccountDetail, DashboardStats, HistoryPoint, StatsQueries};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

const DEFAULT_LIST_LIMIT: usize = 100;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub time: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct TriggerResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct DirectoryResponse {
    pub accounts: Vec<Account>,
}

#[derive(Serialize)]
pub struct DirectoryUpdateResponse {
    pub status: &'static str,
    pub accounts: Vec<Account>,
}

/// Runs a store query off the async runtime; every query reads from disk.
async fn blocking<T, F>(queries: &Arc<StatsQueries>, query: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce(&StatsQueries) -> T + Send + 'static,
{
    let queries = queries.clone();
    tokio::task::spawn_blocking(move || query(&queries))
        .await
        .map_err(|e| {
            error!(error = %e, "Query task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Liveness probe.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        time: Utc::now(),
    })
}

/// Lists raw snapshots (default 100).
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the query task fails.
pub async fn list_snapshots(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Snapshot>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let snapshots = blocking(&state.queries, move |q| q.list_all_snapshots(limit)).await?;
    Ok(Json(snapshots))
}

/// Global and per-account growth figures.
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the query task fails.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, StatusCode> {
    let stats = blocking(&state.queries, StatsQueries::dashboard_stats).await?;
    Ok(Json(stats))
}

/// Per-video growth for one account.
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the query task fails.
pub async fn account_detail(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountDetail>, StatusCode> {
    let detail = blocking(&state.queries, move |q| q.account_detail(&account_id)).await?;
    Ok(Json(detail))
}

/// Play-count history of one video, by id or title.
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the query task fails.
pub async fn video_history(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<HistoryPoint>>, StatusCode> {
    let history = blocking(&state.queries, move |q| q.video_history(&key)).await?;
    Ok(Json(history))
}

/// Starts an ingestion cycle in the background.
pub async fn trigger_ingestion(State(state): State<AppState>) -> (StatusCode, Json<TriggerResponse>) {
    info!("Manual ingestion cycle requested");
    playwatch_collector::trigger_cycle(state.ingestion.clone());
    (
        StatusCode::ACCEPTED,
        Json(TriggerResponse {
            message: "Ingestion cycle started in background",
        }),
    )
}

/// Current account directory.
///
/// # Errors
/// Returns `StatusCode::INTERNAL_SERVER_ERROR` if the query task fails.
pub async fn get_directory(State(state): State<AppState>) -> Result<Json<DirectoryResponse>, StatusCode> {
    let accounts = blocking(&state.queries, StatsQueries::account_directory).await?;
    Ok(Json(DirectoryResponse { accounts }))
}

/// Replaces the account directory.
///
/// # Errors
/// Returns `StatusCode::BAD_REQUEST` if an account has an empty id, or
/// `StatusCode::INTERNAL_SERVER_ERROR` if the directory cannot be written.
pub async fn replace_directory(
    State(state): State<AppState>,
    Json(accounts): Json<Vec<Account>>,
) -> Result<Json<DirectoryUpdateResponse>, StatusCode> {
    if accounts.iter().any(|a| a.id.trim().is_empty()) {
        warn!("Rejected directory update with an empty account id");
        return Err(StatusCode::BAD_REQUEST);
    }

    let written = accounts.clone();
    blocking(&state.queries, move |q| q.replace_account_directory(&written))
        .await?
        .map_err(|e| {
            error!(error = %e, "Failed to replace account directory");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(DirectoryUpdateResponse {
        status: "updated",
        accounts,
    }))
}
