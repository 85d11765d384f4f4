use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::{ensure_loan_terms, ensure_non_negative, ApiError};
use crate::models::feasibility::{
    AnalysisResponse, AnalyzeRequest, Coordinates, FinancialProjection, HealthStatus,
    RoiRequest, RoofAnalysis, RoofMeasurement,
};
use crate::services::roi::{self, RoiInputs};
use crate::services::tariff::{self, DistrictSunHours, TariffScheduleView};
use crate::shared_state::AppState;

/// Loan rate and term from the request, falling back to configured defaults.
fn loan_terms(state: &AppState, rate: Option<f64>, years: Option<u32>) -> Result<(f64, u32), ApiError> {
    ensure_loan_terms(
        rate.unwrap_or(state.config.financing.loan_rate_percent),
        years.unwrap_or(state.config.financing.loan_years),
    )
}

/// POST /api/analyze/full
/// Full rooftop feasibility analysis
///
/// Sums the detector's roof areas (substituting the default roof when nothing
/// was found), resolves irradiance for the site and returns the sized system
/// with its financial projection.
#[utoipa::path(
    post,
    path = "/api/analyze/full",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Feasibility report", body = AnalysisResponse),
        (status = 400, description = "Invalid coordinates, numeric input or phase")
    )
)]
pub async fn analyze_full(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload?;
    let coordinates = Coordinates::new(req.lat, req.lon)?;
    let bill = ensure_non_negative("bill", req.bill)?;
    let (loan_rate, loan_years) = loan_terms(&state, req.loan_rate, req.loan_years)?;
    for area in &req.detected_areas_m2 {
        ensure_non_negative("detected_areas_m2", *area)?;
    }
    ensure_non_negative("detected_areas_m2", req.detected_areas_m2.iter().sum())?;

    let roof = RoofMeasurement::from_detection(
        &req.detected_areas_m2,
        req.quality_warning.as_deref(),
        state.config.roof.default_area_m2,
    );
    let irradiance = state.irradiance.resolve(coordinates, &req.district).await;

    let financial_report = roi::compose(&RoiInputs {
        roof_area_m2: roof.total_area_m2,
        irradiance_kwh_m2_day: irradiance.kwh_m2_day(),
        monthly_bill_lkr: bill,
        phase: req.phase,
        loan_rate_percent: loan_rate,
        loan_years,
    });

    let report_id = Uuid::new_v4();
    tracing::info!(
        %report_id,
        district = %req.district,
        roof_m2 = roof.total_area_m2,
        roof_estimated = roof.is_estimated,
        irradiance = irradiance.kwh_m2_day(),
        irradiance_fallback = irradiance.is_fallback(),
        recommended_kw = financial_report.recommended_system_kw,
        "feasibility analysis complete"
    );

    Ok(Json(AnalysisResponse {
        status: "success".to_string(),
        report_id,
        generated_at: chrono::Utc::now(),
        roof_analysis: RoofAnalysis {
            district: req.district,
            coordinates,
            roof,
        },
        irradiance,
        financial_report,
    }))
}

/// POST /api/roi
/// ROI for a known roof and irradiance
///
/// Pure calculation, no irradiance lookup. Useful for what-if comparisons
/// of bill, phase and loan terms.
#[utoipa::path(
    post,
    path = "/api/roi",
    request_body = RoiRequest,
    responses(
        (status = 200, description = "Financial projection", body = FinancialProjection),
        (status = 400, description = "Invalid numeric input or phase")
    )
)]
pub async fn calculate_roi(
    State(state): State<AppState>,
    payload: Result<Json<RoiRequest>, JsonRejection>,
) -> Result<Json<FinancialProjection>, ApiError> {
    let Json(req) = payload?;
    let roof_area_m2 = ensure_non_negative("roof_area_m2", req.roof_area_m2)?;
    let irradiance = ensure_non_negative("irradiance_kwh_m2_day", req.irradiance_kwh_m2_day)?;
    let bill = ensure_non_negative("bill", req.bill)?;
    let (loan_rate, loan_years) = loan_terms(&state, req.loan_rate, req.loan_years)?;

    let projection = roi::compose(&RoiInputs {
        roof_area_m2,
        irradiance_kwh_m2_day: irradiance,
        monthly_bill_lkr: bill,
        phase: req.phase,
        loan_rate_percent: loan_rate,
        loan_years,
    });
    tracing::debug!(recommended_kw = projection.recommended_system_kw, "roi calculated");
    Ok(Json(projection))
}

/// GET /api/districts
/// Fallback sun hours per district
#[utoipa::path(
    get,
    path = "/api/districts",
    responses(
        (status = 200, description = "District sun-hours table", body = Vec<DistrictSunHours>)
    )
)]
pub async fn list_districts() -> impl IntoResponse {
    Json(tariff::district_table())
}

/// GET /api/tariffs
/// Buy-back tariff brackets and night export rate
#[utoipa::path(
    get,
    path = "/api/tariffs",
    responses(
        (status = 200, description = "Tariff schedule", body = TariffScheduleView)
    )
)]
pub async fn get_tariffs() -> impl IntoResponse {
    Json(tariff::tariff_schedule())
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let irradiance_source = if state.irradiance.is_offline() {
        "district table".to_string()
    } else {
        state.irradiance.base_url().to_string()
    };
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        offline_mode: state.irradiance.is_offline(),
        irradiance_source,
    })
}
