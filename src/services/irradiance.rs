use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::IrradianceConfig;
use crate::models::feasibility::{ClimatologyResponse, Coordinates, IrradianceReading};
use crate::services::tariff::{district_sun_hours, DEFAULT_SUN_HOURS};

/// NASA POWER parameter: all-sky surface shortwave downward irradiance.
const PARAMETER: &str = "ALLSKY_SFC_SW_DWN";
const ANNUAL_KEY: &str = "ANN";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("offline mode")]
    Offline,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("irradiance service answered {0}")]
    Status(StatusCode),

    #[error("response has no annual ALLSKY_SFC_SW_DWN value")]
    MissingAnnual,

    #[error("irradiance service returned unusable value {0}")]
    InvalidValue(f64),
}

/// Annual irradiance for a site: live NASA POWER climatology first, the
/// district table when that fails for any reason.
#[derive(Debug, Clone)]
pub struct IrradianceResolver {
    client: Client,
    base_url: String,
    offline: bool,
}

impl IrradianceResolver {
    pub fn new(config: &IrradianceConfig, offline: bool) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            offline,
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Duration, offline: bool) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            offline,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Never fails: lookup errors are folded into a fallback reading.
    pub async fn resolve(&self, coordinates: Coordinates, district: &str) -> IrradianceReading {
        match self.fetch_annual(coordinates).await {
            Ok(kwh_m2_day) => {
                tracing::debug!(
                    lat = coordinates.lat,
                    lon = coordinates.lon,
                    kwh_m2_day,
                    "irradiance from climatology service"
                );
                IrradianceReading::Measured { kwh_m2_day }
            }
            Err(e) => {
                let kwh_m2_day = fallback_irradiance(district);
                if !matches!(e, LookupError::Offline) {
                    tracing::warn!(
                        district,
                        kwh_m2_day,
                        error = %e,
                        "irradiance lookup failed, using district table"
                    );
                }
                IrradianceReading::Fallback {
                    kwh_m2_day,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_annual(&self, coordinates: Coordinates) -> Result<f64, LookupError> {
        if self.offline {
            return Err(LookupError::Offline);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("parameters", PARAMETER.to_string()),
                ("community", "RE".to_string()),
                ("longitude", coordinates.lon.to_string()),
                ("latitude", coordinates.lat.to_string()),
                ("format", "JSON".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body = response.json::<ClimatologyResponse>().await?;
        let annual = body
            .properties
            .parameter
            .allsky_sfc_sw_dwn
            .get(ANNUAL_KEY)
            .copied()
            .ok_or(LookupError::MissingAnnual)?;

        // NASA POWER marks missing data with -999
        if !annual.is_finite() || annual <= 0.0 {
            return Err(LookupError::InvalidValue(annual));
        }
        Ok(annual)
    }
}

/// District table value, or [`DEFAULT_SUN_HOURS`] for an unknown district.
pub fn fallback_irradiance(district: &str) -> f64 {
    district_sun_hours(district).unwrap_or(DEFAULT_SUN_HOURS)
}
