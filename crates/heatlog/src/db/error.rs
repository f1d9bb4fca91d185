use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The directory holding the database file could not be created.
    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// An update matched no row.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("job store connection poisoned by a panicked thread")]
    LockPoisoned,
}
