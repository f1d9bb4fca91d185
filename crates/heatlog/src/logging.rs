//! Logging setup, powered by tracing-subscriber.
//!
//! Library code logs through the `log` facade. A `tracing_log::LogTracer`
//! bridge routes those records into the tracing subscriber so they carry
//! the span context of `log_pass` and the export writer.

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::HeatlogError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `timestamp LEVEL target: message`
    #[default]
    Compact,
    /// JSON lines with span fields.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Builds the filter from the configured level with dependency noise
/// dampened. `RUST_LOG`, when set, wins.
fn build_env_filter(level: &str) -> Result<EnvFilter, HeatlogError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    for (target, lvl) in [("rusqlite", "warn"), ("jsonschema", "warn")] {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| HeatlogError::Logging(format!("Invalid filter '{}': {}", filter_str, e)))
}

/// Installs the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, so hosts
/// and tests can call this more than once.
pub fn init_logging(config: &LogConfig) -> Result<bool, HeatlogError> {
    let filter = build_env_filter(&config.level)?;

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_span_list(true)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer.with_filter(filter));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return Ok(false);
    }

    // ok() in case a logger was installed by the host
    tracing_log::LogTracer::init().ok();

    tracing::debug!(
        "Logging initialized: level={}, format={:?}",
        config.level,
        config.format
    );
    Ok(true)
}
