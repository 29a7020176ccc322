//! Overview handlers: cascading filter options and the market overview

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{FilterOptions, Overview, RecordFilters};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::companies::parse_role;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OverviewRequest {
    #[serde(flatten)]
    pub filters: RecordFilters,
    pub role: Option<String>,
}

/// Options still available under the active filters
pub async fn filter_options(
    State(state): State<AppState>,
    ApiJson(filters): ApiJson<RecordFilters>,
) -> Json<FilterOptions> {
    let dataset = state.dataset.read().await;
    Json(dataset.cascading_options(&filters))
}

/// Monthly series and top companies over the filtered records
pub async fn get_overview(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OverviewRequest>,
) -> AppResult<Json<Overview>> {
    let role = parse_role(request.role.as_deref())?;
    let dataset = state.dataset.read().await;
    let overview = dataset.overview(&request.filters, role);

    tracing::debug!(
        months = overview.monthly.len(),
        entities = overview.top_entities.len(),
        "Overview computed"
    );

    Ok(Json(overview))
}
