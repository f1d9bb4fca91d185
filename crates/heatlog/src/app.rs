//! Application state held by the UI shell.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Database;
use crate::error::Result;
use crate::session::{Clock, PassLogger, SystemClock, UiEvent, UiMode};
use crate::settings::{PreferenceStore, SqlitePreferences};
use crate::store::JobStore;

/// Everything one screen session needs: the logger, the current UI mode
/// and the configuration it was opened with.
pub struct HeatInputApp {
    pub logger: PassLogger,
    pub mode: UiMode,
    pub config: AppConfig,
}

impl HeatInputApp {
    /// Opens the configured database and restores the last session.
    pub fn open(config: AppConfig) -> Result<Self> {
        let path = config.database_path();
        let db = Database::open(&path)?;
        log::info!("Starting heatlog v{}", env!("CARGO_PKG_VERSION"));
        Ok(Self::with_parts(
            config,
            db.clone(),
            Arc::new(SqlitePreferences::new(db)),
            Arc::new(SystemClock),
        ))
    }

    /// Builds the app from already-open parts.
    pub fn with_parts(
        config: AppConfig,
        db: Database,
        prefs: Arc<dyn PreferenceStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            logger: PassLogger::new(JobStore::new(db), prefs, clock),
            mode: UiMode::Idle,
            config,
        }
    }

    /// Decimal separator for exports under the current language.
    pub fn decimal_separator(&self) -> char {
        self.config
            .decimal_separator
            .resolve(&self.logger.settings().language)
    }

    /// Applies a UI event to the current mode.
    pub fn apply(&mut self, event: UiEvent) {
        let mode = std::mem::take(&mut self.mode);
        self.mode = mode.transition(event);
    }
}
