//! Domain records: jobs, passes and their enumerated metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a bead in the joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassType {
    Root,
    Fill,
    Cap,
}

impl PassType {
    pub fn as_str(self) -> &'static str {
        match self {
            PassType::Root => "Root",
            PassType::Fill => "Fill",
            PassType::Cap => "Cap",
        }
    }

    /// Parses a stored label. `-` and unknown labels mean "not specified".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Root" => Some(PassType::Root),
            "Fill" => Some(PassType::Fill),
            "Cap" => Some(PassType::Cap),
            _ => None,
        }
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current type and electrode polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    #[serde(rename = "DC+")]
    DcPositive,
    #[serde(rename = "DC-")]
    DcNegative,
    #[serde(rename = "AC")]
    Ac,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::DcPositive => "DC+",
            Polarity::DcNegative => "DC-",
            Polarity::Ac => "AC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "DC+" => Some(Polarity::DcPositive),
            "DC-" => Some(Polarity::DcNegative),
            "AC" => Some(Polarity::Ac),
            _ => None,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metal transfer mode for wire processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    ShortArc,
    Globular,
    Spray,
    Pulsed,
}

impl TransferMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::ShortArc => "Short arc",
            TransferMode::Globular => "Globular",
            TransferMode::Spray => "Spray",
            TransferMode::Pulsed => "Pulsed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Short arc" => Some(TransferMode::ShortArc),
            "Globular" => Some(TransferMode::Globular),
            "Spray" => Some(TransferMode::Spray),
            "Pulsed" => Some(TransferMode::Pulsed),
            _ => None,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A welding job: a named collection of passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeldJob {
    pub id: String,
    pub name: String,
    /// Created or last modified. History is sorted by this, newest first.
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub notes: String,
    pub wpqr_reference: String,
    pub base_material: String,
    /// Free text as typed, in °C.
    pub preheat_temperature: String,
    /// Free text as typed, in °C.
    pub max_interpass_temperature: String,
}

/// Editable job fields from the detail screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub name: String,
    pub notes: String,
    pub wpqr_reference: String,
    pub base_material: String,
    pub preheat_temperature: String,
    pub max_interpass_temperature: String,
}

impl WeldJob {
    /// A fresh job with a random id and empty metadata.
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            date: now,
            created_at: now,
            notes: String::new(),
            wpqr_reference: String::new(),
            base_material: String::new(),
            preheat_temperature: String::new(),
            max_interpass_temperature: String::new(),
        }
    }

    pub fn metadata(&self) -> JobMetadata {
        JobMetadata {
            name: self.name.clone(),
            notes: self.notes.clone(),
            wpqr_reference: self.wpqr_reference.clone(),
            base_material: self.base_material.clone(),
            preheat_temperature: self.preheat_temperature.clone(),
            max_interpass_temperature: self.max_interpass_temperature.clone(),
        }
    }

    pub fn apply_metadata(&mut self, metadata: JobMetadata) {
        self.name = metadata.name;
        self.notes = metadata.notes;
        self.wpqr_reference = metadata.wpqr_reference;
        self.base_material = metadata.base_material;
        self.preheat_temperature = metadata.preheat_temperature;
        self.max_interpass_temperature = metadata.max_interpass_temperature;
    }
}

/// Optional extended data recorded with a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassDetails {
    pub pass_type: Option<PassType>,
    pub transfer_mode: Option<TransferMode>,
    pub filler_material: Option<String>,
    /// mm
    pub filler_diameter: Option<f64>,
    pub polarity: Option<Polarity>,
    /// m/min
    pub wire_feed_speed: Option<f64>,
    pub gas_type: Option<String>,
    /// l/min
    pub gas_flow: Option<f64>,
    /// °C, measured before this pass.
    pub actual_interpass_temperature: Option<f64>,
}

impl PassDetails {
    pub fn is_empty(&self) -> bool {
        *self == PassDetails::default()
    }
}

/// One logged weld pass.
///
/// `heat_input_kj_per_mm` is computed once when the pass is logged and is
/// the value every view and export reads. Nothing recomputes it from the
/// stored measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeldPass {
    pub id: String,
    pub job_id: String,
    /// `Pass #N`
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub voltage: Option<f64>,
    pub amperage: Option<f64>,
    pub travel_time_seconds: Option<f64>,
    pub weld_length_millimeters: Option<f64>,
    pub heat_input_kj_per_mm: f64,
    pub efficiency_factor_used: f64,
    pub is_arc_energy_mode: bool,
    pub process_name: String,
    /// mm/min at logging time.
    pub saved_travel_speed: Option<f64>,
    pub details: PassDetails,
}

impl WeldPass {
    /// Result as shown in pass lists, e.g. `0.77 kJ/mm (AE)`.
    pub fn result_label(&self) -> String {
        let value = format!("{:.2} kJ/mm", self.heat_input_kj_per_mm);
        if self.is_arc_energy_mode {
            format!("{} (AE)", value)
        } else {
            value
        }
    }
}

/// Pass count and heat-input spread of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub pass_count: u64,
    pub average_heat_input: Option<f64>,
    pub min_heat_input: Option<f64>,
    pub max_heat_input: Option<f64>,
}
