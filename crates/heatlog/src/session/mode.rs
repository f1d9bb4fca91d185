//! Screen modes and the job phase of the logging session.

use serde::{Deserialize, Serialize};

/// One of the four core measurement inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Voltage,
    Amperage,
    Time,
    Length,
}

impl InputField {
    pub const ALL: [InputField; 4] = [
        InputField::Voltage,
        InputField::Amperage,
        InputField::Time,
        InputField::Length,
    ];

    /// Inclusive range accepted by the input drawer.
    pub fn range(self) -> (f64, f64) {
        match self {
            InputField::Voltage => (0.0, 100.0),
            InputField::Amperage => (0.0, 1000.0),
            InputField::Time => (0.0, 3600.0),
            InputField::Length => (0.0, 10_000.0),
        }
    }

    pub fn step(self) -> f64 {
        match self {
            InputField::Voltage => 0.1,
            _ => 1.0,
        }
    }

    /// Decimals shown and stored.
    pub fn precision(self) -> usize {
        match self {
            InputField::Voltage => 1,
            _ => 0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            InputField::Voltage => "V",
            InputField::Amperage => "A",
            InputField::Time => "s",
            InputField::Length => "mm",
        }
    }

    /// Clamps to the range and formats with the field precision.
    pub fn format(self, value: f64) -> String {
        let (min, max) = self.range();
        let value = if value.is_finite() { value.clamp(min, max) } else { min };
        format!("{:.*}", self.precision(), value)
    }
}

/// What the single screen is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UiMode {
    #[default]
    Idle,
    EditingField { field: InputField },
    /// The finish-job prompt is open with an editable name.
    NamingJob { draft: String },
    ShowingSettings,
    ShowingExtendedData,
}

/// User gestures that move between modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    FocusField { field: InputField },
    DismissInput,
    BeginNaming { draft: String },
    EditName { name: String },
    /// Leaves the prompt. Saving the name is the caller's job.
    ConfirmName,
    CancelNaming,
    OpenSettings,
    CloseSettings,
    OpenExtendedData,
    CloseExtendedData,
}

impl UiMode {
    /// The next mode after `event`. Events that make no sense in the
    /// current mode leave it unchanged.
    pub fn transition(self, event: UiEvent) -> UiMode {
        match (self, event) {
            (UiMode::NamingJob { .. }, UiEvent::EditName { name }) => {
                UiMode::NamingJob { draft: name }
            }
            (UiMode::NamingJob { .. }, UiEvent::ConfirmName | UiEvent::CancelNaming) => {
                UiMode::Idle
            }
            (mode @ UiMode::NamingJob { .. }, _) => mode,

            (UiMode::ShowingSettings, UiEvent::CloseSettings) => UiMode::Idle,
            (mode @ UiMode::ShowingSettings, _) => mode,

            (UiMode::ShowingExtendedData, UiEvent::CloseExtendedData) => UiMode::Idle,
            (UiMode::ShowingExtendedData, UiEvent::FocusField { field }) => {
                UiMode::EditingField { field }
            }
            (mode @ UiMode::ShowingExtendedData, _) => mode,

            (UiMode::Idle | UiMode::EditingField { .. }, event) => match event {
                UiEvent::FocusField { field } => UiMode::EditingField { field },
                UiEvent::DismissInput => UiMode::Idle,
                UiEvent::BeginNaming { draft } => UiMode::NamingJob { draft },
                UiEvent::OpenSettings => UiMode::ShowingSettings,
                UiEvent::OpenExtendedData => UiMode::ShowingExtendedData,
                _ => UiMode::Idle,
            },
        }
    }

    /// Logging a pass is blocked while a prompt or settings is open.
    pub fn allows_log_pass(&self) -> bool {
        !matches!(self, UiMode::NamingJob { .. } | UiMode::ShowingSettings)
    }
}

/// Whether passes currently go into an existing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum JobPhase {
    NoActiveJob,
    ActiveJob { job_id: String, pass_counter: u32 },
}
