//! Crate-level errors. Storage errors live in [`crate::db::error`].

use std::path::PathBuf;
use thiserror::Error;

pub use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum HeatlogError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("job store: {0}")]
    Database(#[from] DatabaseError),

    #[error("export: {0}")]
    Export(#[from] ExportError),

    #[error("cannot install log subscriber: {0}")]
    Logging(String),

    #[error("rejected command: {0}")]
    Command(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    Validation { message: String },

    /// One or more schema violations, joined with `; `.
    #[error("config does not match schema: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot create export directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HeatlogError>;
