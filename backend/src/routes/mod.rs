//! Route definitions for the Trade Analytics dataset server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Dataset statistics and reload
        .nest("/dataset", dataset_routes())
        // Per-company charts
        .nest("/companies", company_routes())
        // Market overview and cascading filters
        .nest("/overview", overview_routes())
        // Profiles and similarity matching
        .route("/profiles", get(handlers::list_profiles))
        .route("/matches", post(handlers::find_matches))
}

fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dataset))
        .route("/reload", post(handlers::reload_dataset))
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_companies))
        .route("/directory", get(handlers::company_directory))
        .route("/:name/summary", get(handlers::get_company_summary))
        .route("/:name/time-series", get(handlers::get_time_series))
        .route("/:name/distribution", get(handlers::get_distribution))
        .route("/:name/top-buyers", get(handlers::get_top_buyers))
        .route("/:name/top-suppliers", get(handlers::get_top_suppliers))
        .route("/:name/top-products", get(handlers::get_top_products))
        .route("/:name/mimicry-suppliers", get(handlers::get_mimicry_suppliers))
}

fn overview_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::get_overview))
        .route("/filters", post(handlers::filter_options))
}
