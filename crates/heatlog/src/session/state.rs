//! Session state persisted through the preference port.
//!
//! Loaded once when the logger starts and written back after every
//! mutation. Each value lives under its own key so that a bad value only
//! resets itself.

use serde::{Deserialize, Serialize};

use crate::calc::Measurements;
use crate::model::{PassDetails, PassType, Polarity, TransferMode};
use crate::process::{self, ExtendedField};
use crate::settings::{clear, read_parsed, read_string, write, PreferenceStore};

use super::mode::InputField;
use super::stopwatch::Stopwatch;

pub(crate) mod keys {
    pub const PROCESS_NAME: &str = "heat_selected_process_name";
    pub const VOLTAGE: &str = "heat_voltage";
    pub const AMPERAGE: &str = "heat_amperage";
    pub const TIME: &str = "heat_time";
    pub const LENGTH: &str = "heat_length";
    pub const EFFICIENCY: &str = "heat_efficiency";
    pub const PASS_COUNTER: &str = "heat_pass_counter";
    pub const ACTIVE_JOB_ID: &str = "heat_active_job_id";

    pub const STOPWATCH_RUNNING: &str = "stopwatch_is_running";
    pub const STOPWATCH_START: &str = "stopwatch_start_timestamp";
    pub const STOPWATCH_ACCUMULATED: &str = "stopwatch_accumulated_time";

    pub const EXT_ARC_ENERGY: &str = "ext_arc_energy";
    pub const EXT_PASS_TYPE: &str = "ext_pass_type";
    pub const EXT_TRANSFER_MODE: &str = "ext_transfer_mode";
    pub const EXT_FILLER_MATERIAL: &str = "ext_filler_material";
    pub const EXT_FILLER_DIAMETER: &str = "ext_filler_diameter";
    pub const EXT_POLARITY: &str = "ext_polarity";
    pub const EXT_WIRE_FEED: &str = "ext_wirefeed";
    pub const EXT_GAS_TYPE: &str = "ext_gas_type";
    pub const EXT_GAS_FLOW: &str = "ext_gasflow";
    pub const EXT_INTERPASS: &str = "ext_interpass";
}

/// The four measurement inputs exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInputs {
    pub voltage: String,
    pub amperage: String,
    pub time: String,
    pub length: String,
}

impl RawInputs {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::Voltage => &self.voltage,
            InputField::Amperage => &self.amperage,
            InputField::Time => &self.time,
            InputField::Length => &self.length,
        }
    }

    pub fn set(&mut self, field: InputField, text: String) {
        match field {
            InputField::Voltage => self.voltage = text,
            InputField::Amperage => self.amperage = text,
            InputField::Time => self.time = text,
            InputField::Length => self.length = text,
        }
    }

    pub fn measurements(&self) -> Measurements {
        Measurements::parse(&self.voltage, &self.amperage, &self.time, &self.length)
    }
}

/// Extended-data inputs as typed. Empty text means "not provided".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedInputs {
    /// Forces k = 1.0 whatever the selected process.
    pub arc_energy_override: bool,
    pub pass_type: String,
    pub transfer_mode: String,
    pub filler_material: String,
    pub filler_diameter: String,
    pub polarity: String,
    pub wire_feed_speed: String,
    pub gas_type: String,
    pub gas_flow: String,
    pub interpass_temperature: String,
}

impl Default for ExtendedInputs {
    fn default() -> Self {
        Self {
            arc_energy_override: false,
            pass_type: String::new(),
            transfer_mode: String::new(),
            filler_material: String::new(),
            filler_diameter: String::new(),
            polarity: Polarity::default().as_str().to_string(),
            wire_feed_speed: String::new(),
            gas_type: String::new(),
            gas_flow: String::new(),
            interpass_temperature: String::new(),
        }
    }
}

/// Strict numeric parse: empty or malformed text is "not provided".
fn provided_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn provided_positive(text: &str) -> Option<f64> {
    provided_number(text).filter(|v| *v > 0.0)
}

fn provided_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ExtendedInputs {
    /// Details to record with a pass, keeping only `visible` fields.
    ///
    /// Diameter, wire feed and gas flow must be positive. An interpass
    /// temperature of 0 °C is a real reading and is kept.
    pub fn redact(&self, visible: &[ExtendedField]) -> PassDetails {
        let shown = |field: ExtendedField| visible.contains(&field);
        PassDetails {
            pass_type: shown(ExtendedField::PassType)
                .then(|| PassType::parse(&self.pass_type))
                .flatten(),
            transfer_mode: shown(ExtendedField::TransferMode)
                .then(|| TransferMode::parse(&self.transfer_mode))
                .flatten(),
            filler_material: shown(ExtendedField::FillerMaterial)
                .then(|| provided_text(&self.filler_material))
                .flatten(),
            filler_diameter: shown(ExtendedField::FillerDiameter)
                .then(|| provided_positive(&self.filler_diameter))
                .flatten(),
            polarity: shown(ExtendedField::Polarity)
                .then(|| Polarity::parse(&self.polarity))
                .flatten(),
            wire_feed_speed: shown(ExtendedField::WireFeedSpeed)
                .then(|| provided_positive(&self.wire_feed_speed))
                .flatten(),
            gas_type: shown(ExtendedField::GasType)
                .then(|| provided_text(&self.gas_type))
                .flatten(),
            gas_flow: shown(ExtendedField::GasFlow)
                .then(|| provided_positive(&self.gas_flow))
                .flatten(),
            actual_interpass_temperature: shown(ExtendedField::InterpassTemperature)
                .then(|| provided_number(&self.interpass_temperature))
                .flatten(),
        }
    }

    /// Clears the per-session fields. Gas type, transfer mode and filler
    /// material carry over to the next job.
    pub fn clear_transient(&mut self) {
        let sticky = ExtendedInputs {
            gas_type: std::mem::take(&mut self.gas_type),
            transfer_mode: std::mem::take(&mut self.transfer_mode),
            filler_material: std::mem::take(&mut self.filler_material),
            ..ExtendedInputs::default()
        };
        *self = sticky;
    }
}

/// Everything the main screen needs to survive a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub process_name: String,
    pub inputs: RawInputs,
    /// k-factor shown for the selected process.
    pub efficiency: f64,
    /// Number the next logged pass gets.
    pub pass_counter: u32,
    pub active_job_id: Option<String>,
    pub stopwatch: Stopwatch,
    pub extended: ExtendedInputs,
    /// Name for the next job, edited in the naming prompt. Not persisted.
    #[serde(default)]
    pub job_name_draft: String,
}

impl Default for SessionState {
    fn default() -> Self {
        let arc = process::arc_energy();
        Self {
            process_name: arc.name.to_string(),
            inputs: RawInputs::default(),
            efficiency: arc.efficiency_factor,
            pass_counter: 1,
            active_job_id: None,
            stopwatch: Stopwatch::default(),
            extended: ExtendedInputs::default(),
            job_name_draft: String::new(),
        }
    }
}

impl SessionState {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        let process_name = read_string(store, keys::PROCESS_NAME, &defaults.process_name);
        let selected = process::resolve(&process_name);
        let active_job_id = read_string(store, keys::ACTIVE_JOB_ID, "");
        let ext = ExtendedInputs::default();

        Self {
            process_name: selected.name.to_string(),
            inputs: RawInputs {
                voltage: read_string(store, keys::VOLTAGE, ""),
                amperage: read_string(store, keys::AMPERAGE, ""),
                time: read_string(store, keys::TIME, ""),
                length: read_string(store, keys::LENGTH, ""),
            },
            efficiency: read_parsed(store, keys::EFFICIENCY, selected.efficiency_factor),
            pass_counter: read_parsed(store, keys::PASS_COUNTER, 1u32).max(1),
            active_job_id: (!active_job_id.is_empty()).then_some(active_job_id),
            stopwatch: Stopwatch {
                running: read_parsed(store, keys::STOPWATCH_RUNNING, false),
                start_timestamp: read_parsed(store, keys::STOPWATCH_START, 0.0),
                accumulated: read_parsed(store, keys::STOPWATCH_ACCUMULATED, 0.0),
            },
            extended: ExtendedInputs {
                arc_energy_override: read_parsed(store, keys::EXT_ARC_ENERGY, false),
                pass_type: read_string(store, keys::EXT_PASS_TYPE, ""),
                transfer_mode: read_string(store, keys::EXT_TRANSFER_MODE, ""),
                filler_material: read_string(store, keys::EXT_FILLER_MATERIAL, ""),
                filler_diameter: read_string(store, keys::EXT_FILLER_DIAMETER, ""),
                polarity: read_string(store, keys::EXT_POLARITY, &ext.polarity),
                wire_feed_speed: read_string(store, keys::EXT_WIRE_FEED, ""),
                gas_type: read_string(store, keys::EXT_GAS_TYPE, ""),
                gas_flow: read_string(store, keys::EXT_GAS_FLOW, ""),
                interpass_temperature: read_string(store, keys::EXT_INTERPASS, ""),
            },
            job_name_draft: String::new(),
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) {
        write(store, keys::PROCESS_NAME, &self.process_name);
        write(store, keys::VOLTAGE, &self.inputs.voltage);
        write(store, keys::AMPERAGE, &self.inputs.amperage);
        write(store, keys::TIME, &self.inputs.time);
        write(store, keys::LENGTH, &self.inputs.length);
        write(store, keys::EFFICIENCY, &self.efficiency.to_string());
        write(store, keys::PASS_COUNTER, &self.pass_counter.to_string());
        match &self.active_job_id {
            Some(id) => write(store, keys::ACTIVE_JOB_ID, id),
            None => clear(store, keys::ACTIVE_JOB_ID),
        }
        self.save_stopwatch(store);

        let ext = &self.extended;
        write(store, keys::EXT_ARC_ENERGY, &ext.arc_energy_override.to_string());
        write(store, keys::EXT_PASS_TYPE, &ext.pass_type);
        write(store, keys::EXT_TRANSFER_MODE, &ext.transfer_mode);
        write(store, keys::EXT_FILLER_MATERIAL, &ext.filler_material);
        write(store, keys::EXT_FILLER_DIAMETER, &ext.filler_diameter);
        write(store, keys::EXT_POLARITY, &ext.polarity);
        write(store, keys::EXT_WIRE_FEED, &ext.wire_feed_speed);
        write(store, keys::EXT_GAS_TYPE, &ext.gas_type);
        write(store, keys::EXT_GAS_FLOW, &ext.gas_flow);
        write(store, keys::EXT_INTERPASS, &ext.interpass_temperature);
    }

    fn save_stopwatch(&self, store: &dyn PreferenceStore) {
        write(store, keys::STOPWATCH_RUNNING, &self.stopwatch.running.to_string());
        write(store, keys::STOPWATCH_START, &self.stopwatch.start_timestamp.to_string());
        write(
            store,
            keys::STOPWATCH_ACCUMULATED,
            &self.stopwatch.accumulated.to_string(),
        );
    }
}
