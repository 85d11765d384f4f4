use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Location ────────────────────────────────────────────────────────────────

/// Validated geographic position. `0.0` on either axis is the "unset"
/// sentinel coming from the map picker and is never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ApiError> {
        if lat == 0.0 || lon == 0.0 || !lat.is_finite() || !lon.is_finite() {
            return Err(ApiError::InvalidCoordinates { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

// ─── Roof ────────────────────────────────────────────────────────────────────

pub const MEASURED_ROOF_REASON: &str = "Based on precise satellite analysis.";
pub const UNDETECTED_ROOF_REASON: &str =
    "Could not detect roof (Obstacles/Unclear). Used default average.";

/// Usable roof area handed to the capacity planner.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoofMeasurement {
    pub total_area_m2: f64,
    pub is_estimated: bool,
    pub estimation_reason: String,
}

impl RoofMeasurement {
    /// Sums the detector's per-object areas. An empty or zero sum is replaced
    /// by `default_area_m2`, carrying the detector's quality warning as the
    /// reason when there is one.
    pub fn from_detection(
        detected_areas_m2: &[f64],
        quality_warning: Option<&str>,
        default_area_m2: f64,
    ) -> Self {
        let detected: f64 = detected_areas_m2.iter().sum();
        if detected > 0.0 {
            return Self {
                total_area_m2: detected,
                is_estimated: false,
                estimation_reason: MEASURED_ROOF_REASON.to_string(),
            };
        }

        let reason = quality_warning
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .unwrap_or(UNDETECTED_ROOF_REASON);
        Self {
            total_area_m2: default_area_m2,
            is_estimated: true,
            estimation_reason: reason.to_string(),
        }
    }
}

// ─── Connection & financing ──────────────────────────────────────────────────

/// Accepted as `"Single"` or `"Three"` in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
pub enum ConnectionPhase {
    #[default]
    Single,
    Three,
}

impl TryFrom<String> for ConnectionPhase {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ConnectionPhase::Single),
            "three" => Ok(ConnectionPhase::Three),
            _ => Err(ApiError::UnknownPhase { value }),
        }
    }
}

impl ConnectionPhase {
    /// Maximum capacity the utility allows on this connection (kW).
    pub fn limit_kw(self) -> f64 {
        match self {
            ConnectionPhase::Single => 5.0,
            ConnectionPhase::Three => 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal_lkr: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

// ─── Irradiance ──────────────────────────────────────────────────────────────

/// Outcome of an irradiance lookup. The fallback path is part of the type so
/// callers can report where the number came from.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum IrradianceReading {
    Measured { kwh_m2_day: f64 },
    Fallback { kwh_m2_day: f64, reason: String },
}

impl IrradianceReading {
    pub fn kwh_m2_day(&self) -> f64 {
        match self {
            IrradianceReading::Measured { kwh_m2_day }
            | IrradianceReading::Fallback { kwh_m2_day, .. } => *kwh_m2_day,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, IrradianceReading::Fallback { .. })
    }
}

// ─── Engine output ───────────────────────────────────────────────────────────

/// Sized recommendation and monthly financial outlook. Field names are read
/// by the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialProjection {
    pub recommended_system_kw: f64,
    /// Same value as `recommended_system_kw`, kept for older report templates
    pub system_capacity_kw: f64,
    pub max_roof_capacity_kw: f64,
    pub effective_max_kw: f64,
    pub monthly_generation_kwh: f64,
    /// Buy-back rate for the recommended size (LKR/unit)
    pub tariff_rate: f64,
    pub normal_monthly_income: f64,
    /// Same value as `normal_monthly_income`, kept for older report templates
    pub monthly_earning_lkr: f64,
    pub battery_monthly_earning: f64,
    pub battery_extra_profit: f64,
    pub total_investment_lkr: f64,
    pub loan_installment: f64,
    pub net_monthly_result: f64,
    /// Years; `0` means income is zero and there is no payback
    pub payback_period: f64,
    pub note: String,
}

// ─── NASA POWER wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClimatologyResponse {
    pub properties: ClimatologyProperties,
}

#[derive(Debug, Deserialize)]
pub struct ClimatologyProperties {
    pub parameter: ClimatologyParameters,
}

#[derive(Debug, Deserialize)]
pub struct ClimatologyParameters {
    /// Monthly keys `JAN`..`DEC` plus the annual average under `ANN`
    #[serde(rename = "ALLSKY_SFC_SW_DWN")]
    pub allsky_sfc_sw_dwn: HashMap<String, f64>,
}

// ─── REST API request / response types ───────────────────────────────────────

/// Full analysis request. Roof areas come from the upstream detector.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub district: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub bill: f64,
    pub loan_rate: Option<f64>,
    pub loan_years: Option<u32>,
    #[serde(default)]
    pub phase: ConnectionPhase,
    /// Per-object roof area estimates from the detector (m²)
    #[serde(default)]
    pub detected_areas_m2: Vec<f64>,
    /// Image quality rejection reported by the detector, e.g. "too cloudy"
    pub quality_warning: Option<String>,
}

/// What-if request: ROI for a known roof area and irradiance, no lookups.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoiRequest {
    pub roof_area_m2: f64,
    pub irradiance_kwh_m2_day: f64,
    #[serde(default)]
    pub bill: f64,
    pub loan_rate: Option<f64>,
    pub loan_years: Option<u32>,
    #[serde(default)]
    pub phase: ConnectionPhase,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoofAnalysis {
    pub district: String,
    pub coordinates: Coordinates,
    #[serde(flatten)]
    pub roof: RoofMeasurement,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub status: String,
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub roof_analysis: RoofAnalysis,
    pub irradiance: IrradianceReading,
    pub financial_report: FinancialProjection,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub offline_mode: bool,
    pub irradiance_source: String,
}
