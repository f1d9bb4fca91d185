//! Reading `heatlog.json`.
//!
//! A file is checked against the bundled JSON schema before it is
//! deserialized, then a few rules the schema cannot express are applied.

use std::path::Path;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::schema::AppConfig;
use crate::error::ConfigError;

static CONFIG_SCHEMA: &str = include_str!("../../../../schema/config-v1.json");

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn validator() -> Result<&'static Validator, ConfigError> {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    if let Some(v) = VALIDATOR.get() {
        return Ok(v);
    }
    let schema: Value = serde_json::from_str(CONFIG_SCHEMA)?;
    let compiled = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("bundled schema does not compile: {}", e),
    })?;
    Ok(VALIDATOR.get_or_init(|| compiled))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => load_config_from_str(&text),
        Err(source) => Err(ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads `path` if it exists, otherwise returns the defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    load_config(path)
}

pub fn load_config_from_str(text: &str) -> Result<AppConfig, ConfigError> {
    let raw: Value = serde_json::from_str(text)?;

    let violations: Vec<String> = validator()?
        .iter_errors(&raw)
        .map(|err| match err.instance_path().to_string() {
            at if at.is_empty() => err.to_string(),
            at => format!("{} ({})", err, at),
        })
        .collect();
    if !violations.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: violations.join("; "),
        });
    }

    let config: AppConfig = serde_json::from_value(raw)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &AppConfig) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::Validation { message });

    if config.version != "1.0" {
        return invalid(format!("config version {} is not supported", config.version));
    }
    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        return invalid(format!("log level '{}' is not one of {:?}", config.log.level, LOG_LEVELS));
    }
    for (name, path) in [
        ("database_path", config.database_path.as_deref()),
        ("export_directory", config.export_directory.as_deref()),
    ] {
        if path.is_some_and(|p| p.as_os_str().is_empty()) {
            return invalid(format!("{} is empty", name));
        }
    }
    Ok(())
}
