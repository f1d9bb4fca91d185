pub mod app;
pub mod calc;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod process;
pub mod sanitize;
pub mod session;
pub mod settings;
pub mod store;

pub use app::HeatInputApp;
pub use calc::{heat_input, travel_speed, Calculation, Measurements};
pub use commands::{dispatch, Action, ApiResponse, Outcome};
pub use config::{load_config, AppConfig, DecimalSeparator};
pub use db::Database;
pub use error::{ConfigError, DatabaseError, ExportError, HeatlogError, Result};
pub use export::{generate_csv, write_export};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use model::{JobMetadata, JobSummary, PassDetails, WeldJob, WeldPass};
pub use process::{ExtendedField, FieldVisibility, WeldingProcess, PROCESSES};
pub use session::{Clock, PassLogger, SessionState, Stopwatch, UiMode};
pub use settings::{PreferenceStore, Settings};
pub use store::JobStore;
