//! Dataset handlers: load statistics and reload from disk

use axum::{extract::State, Json};
use serde::Serialize;
use shared::NormalizeStats;

use crate::error::AppResult;
use crate::services::DatasetService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub path: String,
    pub stats: NormalizeStats,
}

/// Statistics of the currently loaded dataset
pub async fn get_dataset(State(state): State<AppState>) -> Json<DatasetInfo> {
    let stats = *state.dataset.read().await.stats();

    Json(DatasetInfo {
        path: state.config.dataset.path.clone(),
        stats,
    })
}

/// Re-read the CSV source and swap the repository in one step
pub async fn reload_dataset(State(state): State<AppState>) -> AppResult<Json<DatasetInfo>> {
    let service = DatasetService::new(state.config.dataset.clone());
    let repo = service.load().await?;
    let stats = *repo.stats();

    *state.dataset.write().await = repo;
    tracing::info!(records = stats.records, "Dataset reloaded");

    Ok(Json(DatasetInfo {
        path: service.path().to_string(),
        stats,
    }))
}
