use axum::{
    routing::{get, post},
    Router,
};
use crate::controllers::analysis_controller::{
    // Feasibility
    analyze_full, calculate_roi,
    // Reference tables
    list_districts, get_tariffs,
    // Service
    health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/analyze/full", post(analyze_full))
        .route("/roi",          post(calculate_roi))
        .route("/districts",    get(list_districts))
        .route("/tariffs",      get(get_tariffs))
        .route("/health",       get(health))
        .with_state(state)
}
