use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{MAX_LOAN_RATE_PERCENT, MAX_LOAN_YEARS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn default_offline_mode() -> bool { false }

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_offline_mode")]
    pub offline_mode: bool,
    #[serde(default)]
    pub irradiance: IrradianceConfig,
    #[serde(default)]
    pub financing: FinancingConfig,
    #[serde(default)]
    pub roof: RoofConfig,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct IrradianceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for IrradianceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://power.larc.nasa.gov/api/temporal/climatology/point".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Loan terms applied when a request leaves them out.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct FinancingConfig {
    pub loan_rate_percent: f64,
    pub loan_years: u32,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            loan_rate_percent: 11.5,
            loan_years: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct RoofConfig {
    /// Substituted when the detector finds no roof (m²)
    pub default_area_m2: f64,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self { default_area_m2: 60.0 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.irradiance.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "irradiance.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.irradiance.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "irradiance.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.roof.default_area_m2.is_finite() && self.roof.default_area_m2 > 0.0) {
            return Err(ConfigError::Invalid {
                field: "roof.default_area_m2",
                reason: format!("must be positive, got {}", self.roof.default_area_m2),
            });
        }
        let rate = self.financing.loan_rate_percent;
        if !(rate.is_finite() && (0.0..=MAX_LOAN_RATE_PERCENT).contains(&rate)) {
            return Err(ConfigError::Invalid {
                field: "financing.loan_rate_percent",
                reason: format!("must be between 0 and {MAX_LOAN_RATE_PERCENT}, got {rate}"),
            });
        }
        if self.financing.loan_years > MAX_LOAN_YEARS {
            return Err(ConfigError::Invalid {
                field: "financing.loan_years",
                reason: format!("must be at most {MAX_LOAN_YEARS}, got {}", self.financing.loan_years),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let c = Config::from_json_str("{}").unwrap();
        assert_eq!(c.server.port, 8000);
        assert!(!c.offline_mode);
        assert_eq!(c.irradiance.timeout_secs, 5);
        assert!(c.irradiance.base_url.contains("power.larc.nasa.gov"));
        assert_eq!(c.financing.loan_rate_percent, 11.5);
        assert_eq!(c.financing.loan_years, 5);
        assert_eq!(c.roof.default_area_m2, 60.0);
        assert_eq!(c.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let c = Config::from_json_str(
            r#"{"server":{"port":9100},"offline_mode":true,"irradiance":{"timeout_secs":2},"log_format":"json"}"#,
        )
        .unwrap();
        assert_eq!(c.server.port, 9100);
        assert!(c.offline_mode);
        assert_eq!(c.irradiance.timeout_secs, 2);
        assert!(c.irradiance.base_url.starts_with("https://"));
        assert_eq!(c.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_json_str(r#"{"irradiance":{"timeout_secs":0}}"#),
            Err(ConfigError::Invalid { field: "irradiance.timeout_secs", .. })
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"roof":{"default_area_m2":0}}"#),
            Err(ConfigError::Invalid { field: "roof.default_area_m2", .. })
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"financing":{"loan_rate_percent":-1}}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"financing":{"loan_years":100000}}"#),
            Err(ConfigError::Invalid { field: "financing.loan_years", .. })
        ));
        assert!(matches!(Config::from_json_str("{not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/definitely/not/here/config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
