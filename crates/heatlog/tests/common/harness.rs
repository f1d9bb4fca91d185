//! Test harness for isolated test execution.
//!
//! The `TestHarness` owns a temporary directory holding a file-backed
//! database and an export directory, plus a `ManualClock` so stopwatch and
//! timestamps are deterministic. `restart()` drops the app and opens it
//! again from the same files, the way a relaunch would.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use heatlog::config::{AppConfig, DecimalSeparator};
use heatlog::session::{InputField, ManualClock};
use heatlog::settings::SqlitePreferences;
use heatlog::{dispatch, Action, ApiResponse, Database, HeatInputApp, Outcome, WeldPass};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 7, 30, 0).unwrap()
}

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub clock: Arc<ManualClock>,
    pub app: HeatInputApp,
    separator: DecimalSeparator,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_separator(DecimalSeparator::Point)
    }

    pub fn with_separator(separator: DecimalSeparator) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("data").join("heatlog.db");
        let export_dir = temp_dir.path().join("exports");
        let clock = Arc::new(ManualClock::new(start_time()));
        let app = Self::open(&db_path, &export_dir, separator, clock.clone());
        Self {
            temp_dir,
            db_path,
            export_dir,
            clock,
            app,
            separator,
        }
    }

    fn open(
        db_path: &PathBuf,
        export_dir: &PathBuf,
        separator: DecimalSeparator,
        clock: Arc<ManualClock>,
    ) -> HeatInputApp {
        let config = AppConfig {
            database_path: Some(db_path.clone()),
            export_directory: Some(export_dir.clone()),
            decimal_separator: separator,
            ..AppConfig::default()
        };
        let db = Database::open(db_path).expect("Failed to open database");
        HeatInputApp::with_parts(config, db.clone(), Arc::new(SqlitePreferences::new(db)), clock)
    }

    /// Reopens the app from the same database, keeping the clock.
    pub fn restart(&mut self) {
        self.app = Self::open(
            &self.db_path,
            &self.export_dir,
            self.separator,
            self.clock.clone(),
        );
    }

    pub fn dispatch(&mut self, action: Action) -> ApiResponse<Outcome> {
        dispatch(&mut self.app, action)
    }

    /// Types the four core inputs.
    pub fn enter(&mut self, voltage: &str, amperage: &str, time: &str, length: &str) {
        for (field, text) in [
            (InputField::Voltage, voltage),
            (InputField::Amperage, amperage),
            (InputField::Time, time),
            (InputField::Length, length),
        ] {
            let response = self.dispatch(Action::SetInputText {
                field,
                text: text.to_string(),
            });
            assert!(response.success, "set input failed: {:?}", response.error);
        }
    }

    /// Logs a pass through the command layer and returns it.
    pub fn log_pass(&mut self) -> WeldPass {
        match self.dispatch(Action::LogPass) {
            ApiResponse {
                data: Some(Outcome::PassLogged { pass, .. }),
                ..
            } => pass,
            other => panic!("log pass failed: {:?}", other),
        }
    }

    pub fn job_count(&self) -> usize {
        self.app
            .logger
            .store()
            .list_jobs(&Default::default())
            .expect("Failed to list jobs")
            .len()
    }
}
