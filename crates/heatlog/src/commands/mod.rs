//! Button actions of the calculator screen and the job history.
//!
//! Commands are organized by domain:
//! - `session`: inputs, stopwatch, pass logging and job naming
//! - `jobs`: history queries, editing, deletion and export
//!
//! The shell sends an [`Action`] and renders the [`Outcome`] it gets back.
//! Typed errors become messages here and nowhere else.

pub mod jobs;
pub mod session;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::HeatInputApp;
use crate::calc::Calculation;
use crate::model::{JobMetadata, JobSummary, WeldJob, WeldPass};
use crate::process::{ExtendedField, WeldingProcess};
use crate::session::{ExtendedInputs, InputField, JobPhase, RawInputs, UiEvent, UiMode};
use crate::settings::Settings;
use crate::store::JobListEntry;

/// Response wrapper for API calls.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SelectProcess { name: String },
    SetInput { field: InputField, value: f64 },
    SetInputText { field: InputField, text: String },
    UpdateExtended { inputs: ExtendedInputs },
    LogPass,
    /// NEW JOB button: asks for a name when a job is active, otherwise
    /// resets the session.
    NewJob,
    EditJobName { name: String },
    SaveJobName,
    CancelNaming,
    ToggleStopwatch,
    ResetStopwatch,
    Tick,
    SyncStopwatch { value: f64 },
    Ui { event: UiEvent },
    UpdateSettings { settings: Settings },
    ToggleProcessHidden { code: String },
    ToggleCustomField { field: ExtendedField },
    ListJobs {
        #[serde(default)]
        name_contains: Option<String>,
        #[serde(default)]
        limit: Option<u64>,
        #[serde(default)]
        offset: Option<u64>,
    },
    GetJob { job_id: String },
    UpdateJobMetadata { job_id: String, metadata: JobMetadata },
    DeletePass { pass_id: String },
    DeleteJob { job_id: String },
    ExportJob { job_id: String },
}

/// Input drawer setup for one core field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub field: InputField,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub precision: usize,
    pub unit: &'static str,
    pub text: String,
}

impl FieldSpec {
    fn of(field: InputField, inputs: &RawInputs) -> Self {
        let (min, max) = field.range();
        Self {
            field,
            min,
            max,
            step: field.step(),
            precision: field.precision(),
            unit: field.unit(),
            text: inputs.get(field).to_string(),
        }
    }
}

/// What the main screen shows after an action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: UiMode,
    pub phase: JobPhase,
    pub process: &'static WeldingProcess,
    pub process_detail: String,
    pub available_processes: Vec<&'static str>,
    pub preview: Calculation,
    /// k-factor in effect, 1.0 in arc-energy mode.
    pub efficiency: f64,
    pub arc_energy_mode: bool,
    pub inputs: RawInputs,
    pub fields: Vec<FieldSpec>,
    pub extended: ExtendedInputs,
    pub visible_fields: Vec<ExtendedField>,
    pub elapsed: f64,
    pub stopwatch_running: bool,
    pub pass_counter: u32,
    pub job_name_draft: String,
    pub can_log_pass: bool,
}

impl SessionSnapshot {
    pub fn of(app: &HeatInputApp) -> Self {
        let logger = &app.logger;
        let state = logger.state();
        let process = logger.current_process();
        let preview = logger.preview();
        Self {
            mode: app.mode.clone(),
            phase: logger.job_phase(),
            process,
            process_detail: process.detail_label(),
            available_processes: logger.available_processes().iter().map(|p| p.name).collect(),
            preview,
            efficiency: state.efficiency,
            arc_energy_mode: logger.is_arc_energy_mode(),
            inputs: state.inputs.clone(),
            fields: InputField::ALL
                .iter()
                .map(|f| FieldSpec::of(*f, &state.inputs))
                .collect(),
            extended: state.extended.clone(),
            visible_fields: logger.visible_fields(),
            elapsed: logger.elapsed(),
            stopwatch_running: state.stopwatch.running,
            pass_counter: state.pass_counter,
            job_name_draft: state.job_name_draft.clone(),
            can_log_pass: app.mode.allows_log_pass() && preview.heat_input > 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Session { snapshot: SessionSnapshot },
    PassLogged {
        pass: WeldPass,
        /// e.g. `0.77 kJ/mm (AE)`
        label: String,
        snapshot: SessionSnapshot,
    },
    Settings { settings: Settings, active_processes: usize },
    Jobs { jobs: Vec<JobListEntry> },
    JobDetail { job: WeldJob, passes: Vec<WeldPass>, summary: JobSummary },
    Deleted { removed: bool },
    Exported { path: PathBuf },
}

/// Runs one action against the app.
pub fn dispatch(app: &mut HeatInputApp, action: Action) -> ApiResponse<Outcome> {
    match action {
        Action::ListJobs { .. }
        | Action::GetJob { .. }
        | Action::UpdateJobMetadata { .. }
        | Action::DeletePass { .. }
        | Action::DeleteJob { .. }
        | Action::ExportJob { .. } => jobs::handle(app, action),
        _ => session::handle(app, action),
    }
}
