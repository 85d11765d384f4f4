use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Request rejections raised at the HTTP boundary. The engine itself never
/// fails; everything here is caught before it is invoked.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid GPS Coordinates ({lat}, {lon}). Please select a location on the map.")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unknown connection phase {value:?}, expected Single or Three")]
    UnknownPhase { value: String },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Longest loan term accepted from a request (years).
pub const MAX_LOAN_YEARS: u32 = 50;
/// Highest annual loan rate accepted from a request (%).
pub const MAX_LOAN_RATE_PERCENT: f64 = 100.0;

impl ApiError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "rejected request");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Finite and not negative.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() {
        return Err(ApiError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ApiError::invalid(field, format!("must not be negative, got {value}")));
    }
    Ok(value)
}

/// Annual rate and term a loan can be amortized over.
pub fn ensure_loan_terms(rate_percent: f64, years: u32) -> Result<(f64, u32), ApiError> {
    let rate = ensure_non_negative("loan_rate", rate_percent)?;
    if rate > MAX_LOAN_RATE_PERCENT {
        return Err(ApiError::invalid(
            "loan_rate",
            format!("must be at most {MAX_LOAN_RATE_PERCENT}, got {rate}"),
        ));
    }
    if years > MAX_LOAN_YEARS {
        return Err(ApiError::invalid(
            "loan_years",
            format!("must be at most {MAX_LOAN_YEARS}, got {years}"),
        ));
    }
    Ok((rate, years))
}
