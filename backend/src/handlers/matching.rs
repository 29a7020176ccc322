//! Profile export and similarity matching handlers

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{MatchCriteria, MatchOutcome, Role};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub role: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Company profiles for a role, as JSON or a CSV download
pub async fn list_profiles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProfileQuery>,
) -> AppResult<impl IntoResponse> {
    let role = match query.role.as_deref() {
        Some(role) => role.parse()?,
        None => Role::Supplier,
    };
    let profiles = state.dataset.read().await.profiles(role);

    match query.format.as_deref() {
        None | Some("json") => Ok(Json(profiles).into_response()),
        Some("csv") => {
            let csv = ReportingService::export_to_csv(&ReportingService::profile_rows(&profiles))?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"company_profiles.csv\"",
                    ),
                ],
                csv,
            )
                .into_response())
        }
        Some(other) => Err(AppError::ValidationError(format!(
            "Unsupported format '{}', expected json or csv",
            other
        ))),
    }
}

/// Rank supplier profiles against the submitted criteria
pub async fn find_matches(
    State(state): State<AppState>,
    ApiJson(criteria): ApiJson<MatchCriteria>,
) -> AppResult<Json<MatchOutcome>> {
    let dataset = state.dataset.read().await;
    let outcome = dataset.find_matches(&state.matcher, &criteria)?;

    tracing::info!(
        location = %criteria.location,
        matches = outcome.matches.len(),
        best = ?outcome.best.as_ref().map(|m| m.profile.name.as_str()),
        "Matching completed"
    );

    Ok(Json(outcome))
}
