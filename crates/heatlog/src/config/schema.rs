use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db::default_database_path;
use crate::logging::LogConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub export_directory: Option<PathBuf>,
    #[serde(default)]
    pub decimal_separator: DecimalSeparator,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            export_directory: None,
            decimal_separator: DecimalSeparator::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Configured database file, or `~/.heatlog/data/heatlog.db`.
    ///
    /// Falls back to the working directory when there is no home directory.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .or_else(default_database_path)
            .unwrap_or_else(|| PathBuf::from("heatlog.db"))
    }

    /// Where CSV exports go. Defaults to the system temp directory.
    pub fn export_directory(&self) -> PathBuf {
        self.export_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Decimal separator used in exported numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// Follow the app language.
    #[default]
    Auto,
    Point,
    Comma,
}

/// Languages that write decimals with a comma.
const COMMA_LANGUAGES: &[&str] = &[
    "nb", "nn", "no", "da", "sv", "fi", "de", "fr", "nl", "es", "it", "pt", "pl", "ru",
];

impl DecimalSeparator {
    /// The separator character for `language` (e.g. `nb`, `en-GB`).
    pub fn resolve(self, language: &str) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
            DecimalSeparator::Auto => {
                let primary = language
                    .split(['-', '_'])
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if COMMA_LANGUAGES.contains(&primary.as_str()) {
                    ','
                } else {
                    '.'
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_separator() {
        assert_eq!(DecimalSeparator::Auto.resolve("nb"), ',');
        assert_eq!(DecimalSeparator::Auto.resolve("de-AT"), ',');
        assert_eq!(DecimalSeparator::Auto.resolve("en"), '.');
        assert_eq!(DecimalSeparator::Auto.resolve(""), '.');
        assert_eq!(DecimalSeparator::Point.resolve("nb"), '.');
        assert_eq!(DecimalSeparator::Comma.resolve("en"), ',');
    }

    #[test]
    fn test_default_paths() {
        let config = AppConfig::default();
        assert_eq!(config.export_directory(), std::env::temp_dir());
        assert!(config.database_path().ends_with("heatlog.db"));
    }
}
