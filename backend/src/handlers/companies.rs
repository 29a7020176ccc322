//! Company chart handlers
//!
//! Each handler runs one aggregation query against the loaded dataset for
//! the company named in the path.

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{
    ChartSeries, CompanyDirectoryEntry, CompanySummary, RankedSeries, RecordField, Role,
    TimeSeries, ALL_FILTER, GENERAL_FILTER,
};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ApiQuery};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// Parse an optional role parameter, defaulting to `Buyer`
pub(crate) fn parse_role(role: Option<&str>) -> AppResult<Role> {
    match role {
        Some(role) if !role.trim().is_empty() => Ok(role.parse()?),
        _ => Ok(Role::default()),
    }
}

#[derive(Debug, Deserialize)]
pub struct DistributionQuery {
    pub field: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CounterpartQuery {
    pub filter_field: Option<String>,
    pub filter_value: Option<String>,
}

impl CounterpartQuery {
    fn filter(&self) -> AppResult<(RecordField, &str)> {
        let field = match self.filter_field.as_deref() {
            Some(field) => field.parse()?,
            None => RecordField::HsDescription,
        };
        Ok((field, self.filter_value.as_deref().unwrap_or(ALL_FILTER)))
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Sorted legitimate company names for a role
pub async fn list_companies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RoleQuery>,
) -> AppResult<Json<Vec<String>>> {
    let role = parse_role(query.role.as_deref())?;
    let dataset = state.dataset.read().await;
    Ok(Json(dataset.company_list(role)))
}

/// Distinct name/location pairs over buyers and suppliers
pub async fn company_directory(State(state): State<AppState>) -> Json<Vec<CompanyDirectoryEntry>> {
    let dataset = state.dataset.read().await;
    Json(dataset.company_directory())
}

/// Headline numbers for one company
pub async fn get_company_summary(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<RoleQuery>,
) -> AppResult<Json<CompanySummary>> {
    let role = parse_role(query.role.as_deref())?;
    let dataset = state.dataset.read().await;

    dataset
        .company_summary(Some(&name), role)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", role, name)))
}

/// Month-of-year revenue and transaction counts
pub async fn get_time_series(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<RoleQuery>,
) -> AppResult<Json<Option<TimeSeries>>> {
    let role = parse_role(query.role.as_deref())?;
    let dataset = state.dataset.read().await;
    Ok(Json(dataset.time_series(Some(&name), role)))
}

/// Revenue by category, product or any other record field
pub async fn get_distribution(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<DistributionQuery>,
) -> AppResult<Json<Option<ChartSeries>>> {
    let role = parse_role(query.role.as_deref())?;
    let field = match query.field.as_deref() {
        Some(field) => field.parse()?,
        None => RecordField::Category,
    };

    let dataset = state.dataset.read().await;
    Ok(Json(dataset.category_distribution(Some(&name), field, role)))
}

/// Top buyers of a supplier
pub async fn get_top_buyers(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<CounterpartQuery>,
) -> AppResult<Json<Option<RankedSeries>>> {
    let (field, value) = query.filter()?;
    let dataset = state.dataset.read().await;
    Ok(Json(dataset.top_buyers(Some(&name), field, value)))
}

/// Top suppliers of a buyer
pub async fn get_top_suppliers(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<CounterpartQuery>,
) -> AppResult<Json<Option<RankedSeries>>> {
    let (field, value) = query.filter()?;
    let dataset = state.dataset.read().await;
    Ok(Json(dataset.top_suppliers(Some(&name), field, value)))
}

/// A buyer's top products within one category or HS description
pub async fn get_top_products(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<Json<Option<RankedSeries>>> {
    let category = query
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation {
            field: "category".to_string(),
            message: "category is required".to_string(),
        })?;

    let dataset = state.dataset.read().await;
    Ok(Json(dataset.top_products_by_category(Some(&name), &category)))
}

/// The three suppliers a buyer spends most with
pub async fn get_mimicry_suppliers(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<Json<Option<RankedSeries>>> {
    let category = query.category.as_deref().unwrap_or(GENERAL_FILTER);
    let dataset = state.dataset.read().await;
    Ok(Json(dataset.top_suppliers_for_mimicry(Some(&name), category)))
}
