use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

#[cfg(feature = "verbose_log")]
const DEFAULT_FILTER: &str = "rooftop_solar=debug,tower_http=debug,info";
#[cfg(not(feature = "verbose_log"))]
const DEFAULT_FILTER: &str = "rooftop_solar=info,tower_http=info,warn";

/// `RUST_LOG` wins over the built-in filter.
pub fn init_logger(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init(),
    }
}
