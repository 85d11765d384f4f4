use std::sync::Arc;

use crate::config::Config;
use crate::services::irradiance::IrradianceResolver;

/// Services built once at startup and handed to every request. Nothing in
/// here is mutated after construction.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub irradiance: Arc<IrradianceResolver>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let irradiance = IrradianceResolver::new(&config.irradiance, config.offline_mode)?;
        Ok(Self::with_resolver(config, irradiance))
    }

    pub fn with_resolver(config: Config, irradiance: IrradianceResolver) -> Self {
        Self {
            config: Arc::new(config),
            irradiance: Arc::new(irradiance),
        }
    }
}
