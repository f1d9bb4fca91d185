//! User preferences and the key-value port they are persisted through.
//!
//! Reads never fail from the caller's point of view: a missing or
//! unparsable value falls back to its default.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::db::{preference_repo, Database, DatabaseError};
use crate::process::{ExtendedField, FieldVisibility};

/// Key-value persistence for scalar preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&self, key: &str) -> Result<(), DatabaseError>;
}

/// Preferences stored in the SQLite `preferences` table.
#[derive(Clone)]
pub struct SqlitePreferences {
    db: Database,
}

impl SqlitePreferences {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        preference_repo::get(&self.db, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        preference_repo::set(&self.db, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        preference_repo::remove(&self.db, key)
    }
}

/// Process-local preferences, lost on exit.
#[derive(Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let values = self.values.read().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut values = self.values.write().map_err(|_| DatabaseError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        let mut values = self.values.write().map_err(|_| DatabaseError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Reads a string preference, logging and defaulting on failure.
pub fn read_string(store: &dyn PreferenceStore, key: &str, default: &str) -> String {
    match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => default.to_string(),
        Err(e) => {
            log::warn!("Failed to read preference '{}': {}", key, e);
            default.to_string()
        }
    }
}

/// Reads and parses a preference, logging and defaulting on failure.
pub fn read_parsed<T: FromStr>(store: &dyn PreferenceStore, key: &str, default: T) -> T {
    match store.get(key) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable preference '{}' = '{}'", key, value);
            default
        }),
        Ok(None) => default,
        Err(e) => {
            log::warn!("Failed to read preference '{}': {}", key, e);
            default
        }
    }
}

/// Removes a preference. Failures are logged and dropped.
pub fn clear(store: &dyn PreferenceStore, key: &str) {
    if let Err(e) = store.remove(key) {
        log::error!("Failed to clear preference '{}': {}", key, e);
    }
}

/// Writes a preference. Failures are logged and dropped.
pub fn write(store: &dyn PreferenceStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::error!("Failed to save preference '{}': {}", key, e);
    }
}

pub(crate) mod keys {
    pub const LANGUAGE: &str = "app_language";
    pub const HAPTICS: &str = "enable_haptics";
    pub const HIDDEN_PROCESS_CODES: &str = "hidden_process_codes";
    pub const EXTENDED_DATA_ENABLED: &str = "extended_data_enabled";
    pub const FIELD_VISIBILITY: &str = "field_visibility_mode";
    pub const CUSTOM_FIELDS: &str = "custom_visible_fields";
}

/// Settings-screen preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Language code, e.g. `nb` or `en`. Drives the CSV number format.
    pub language: String,
    pub haptics_enabled: bool,
    /// Comma-joined ISO codes of processes hidden from the picker.
    pub hidden_process_codes: String,
    pub extended_data_enabled: bool,
    pub field_visibility: FieldVisibility,
    pub custom_fields: Vec<ExtendedField>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "nb".to_string(),
            haptics_enabled: true,
            hidden_process_codes: String::new(),
            extended_data_enabled: false,
            field_visibility: FieldVisibility::Smart,
            custom_fields: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        let custom = read_string(store, keys::CUSTOM_FIELDS, "");
        Self {
            language: read_string(store, keys::LANGUAGE, &defaults.language),
            haptics_enabled: read_parsed(store, keys::HAPTICS, defaults.haptics_enabled),
            hidden_process_codes: read_string(store, keys::HIDDEN_PROCESS_CODES, ""),
            extended_data_enabled: read_parsed(
                store,
                keys::EXTENDED_DATA_ENABLED,
                defaults.extended_data_enabled,
            ),
            field_visibility: FieldVisibility::parse(&read_string(
                store,
                keys::FIELD_VISIBILITY,
                defaults.field_visibility.as_str(),
            )),
            custom_fields: custom
                .split(',')
                .filter_map(ExtendedField::from_key)
                .collect(),
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) {
        let custom: Vec<&str> = self.custom_fields.iter().map(|f| f.key()).collect();
        write(store, keys::LANGUAGE, &self.language);
        write(store, keys::HAPTICS, &self.haptics_enabled.to_string());
        write(store, keys::HIDDEN_PROCESS_CODES, &self.hidden_process_codes);
        write(
            store,
            keys::EXTENDED_DATA_ENABLED,
            &self.extended_data_enabled.to_string(),
        );
        write(store, keys::FIELD_VISIBILITY, self.field_visibility.as_str());
        write(store, keys::CUSTOM_FIELDS, &custom.join(","));
    }

    /// Adds or removes a field from the custom set.
    pub fn toggle_custom_field(&mut self, field: ExtendedField) {
        if let Some(pos) = self.custom_fields.iter().position(|f| *f == field) {
            self.custom_fields.remove(pos);
        } else {
            self.custom_fields.push(field);
        }
    }
}
