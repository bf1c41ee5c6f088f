use std::env::var;

use ::tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer, chosen with `RUST_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Reads `RUST_LOG_FORMAT`; anything other than `json` is compact.
    pub fn from_env() -> Self {
        match var("RUST_LOG_FORMAT").as_deref().map(str::trim) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

pub fn init_tracing() {
    init(LevelFilter::INFO, LogFormat::from_env());
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Calling this twice is harmless: the second install is ignored, which
/// keeps tests that share a process from panicking.
pub fn init(level: LevelFilter, format: LogFormat) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
    };

    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}
