//! SQLite storage for jobs, passes and preferences.
//!
//! One connection behind a mutex, shared by cloning [`Database`]. The
//! repositories are plain functions taking `&Database`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub mod error;
pub mod job_repo;
pub mod migrations;
pub mod pass_repo;
pub mod preference_repo;

pub use error::DatabaseError;

/// Shared handle to the job store database.
///
/// Foreign keys are on, so deleting a job removes its passes.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens the database file, creating it and its directory if needed,
    /// and migrates it to the current schema.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| DatabaseError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        let db = Self::prepare(Connection::open(path)?, "journal_mode=WAL")?;
        log::info!("Job store opened at {}", path.display());
        Ok(db)
    }

    /// A throwaway database, used by tests and previews.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::prepare(Connection::open_in_memory()?, "temp_store=MEMORY")
    }

    fn prepare(mut conn: Connection, pragma: &str) -> Result<Self, DatabaseError> {
        conn.execute_batch(&format!("PRAGMA {}; PRAGMA foreign_keys=ON;", pragma))?;
        migrations::run_all(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with the connection locked.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let guard = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&guard)
    }
}

/// `~/.heatlog/data/heatlog.db`, or `None` without a home directory.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".heatlog").join("data").join("heatlog.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_count(db: &Database) -> u32 {
        db.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM jobs", [], |r| r.get(0))?))
            .unwrap()
    }

    fn insert_job(db: &Database, id: &str) {
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO jobs (id, name, date, created_at) VALUES (?1, 'Girder', 'd', 'd')",
                [id],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(job_count(&db), 0);
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site").join("heatlog.db");
        insert_job(&Database::open(&path).unwrap(), "j1");

        assert!(path.exists());
        assert_eq!(job_count(&Database::open(&path).unwrap()), 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let on: bool = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
            .unwrap();
        assert!(on);
    }

    #[test]
    fn test_clones_share_connection() {
        let db = Database::open_in_memory().unwrap();
        insert_job(&db.clone(), "j1");
        assert_eq!(job_count(&db), 1);
    }

    #[test]
    fn test_default_database_path() {
        let path = default_database_path().unwrap();
        assert!(path.ends_with(".heatlog/data/heatlog.db"));
    }
}
