//! Welding process catalogue.
//!
//! Static reference data: ISO 4063 / AWS codes, thermal efficiency factors
//! (ISO 17671 / EN 1011-1) and the seed values applied when a process is
//! selected. The list is built once and never mutated.

pub mod visibility;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use visibility::{
    active_count, available_processes, parse_hidden_codes, toggle_hidden, visible_fields,
    FieldVisibility,
};

/// ISO code of the arc-energy pseudo-process.
pub const ARC_ENERGY_CODE: &str = "Arc";

/// Optional per-pass metadata a process may consider meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendedField {
    PassType,
    TransferMode,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    WireFeedSpeed,
    GasType,
    GasFlow,
    InterpassTemperature,
}

impl ExtendedField {
    pub const ALL: [ExtendedField; 9] = [
        ExtendedField::PassType,
        ExtendedField::TransferMode,
        ExtendedField::FillerMaterial,
        ExtendedField::FillerDiameter,
        ExtendedField::Polarity,
        ExtendedField::WireFeedSpeed,
        ExtendedField::GasType,
        ExtendedField::GasFlow,
        ExtendedField::InterpassTemperature,
    ];

    /// Stable key used in the preference store.
    pub fn key(self) -> &'static str {
        match self {
            ExtendedField::PassType => "pass_type",
            ExtendedField::TransferMode => "transfer_mode",
            ExtendedField::FillerMaterial => "filler_material",
            ExtendedField::FillerDiameter => "filler_diameter",
            ExtendedField::Polarity => "polarity",
            ExtendedField::WireFeedSpeed => "wire_feed_speed",
            ExtendedField::GasType => "gas_type",
            ExtendedField::GasFlow => "gas_flow",
            ExtendedField::InterpassTemperature => "interpass_temperature",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key.trim())
    }
}

impl fmt::Display for ExtendedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedField::PassType => write!(f, "Pass type"),
            ExtendedField::TransferMode => write!(f, "Transfer mode"),
            ExtendedField::FillerMaterial => write!(f, "Filler material"),
            ExtendedField::FillerDiameter => write!(f, "Filler diameter"),
            ExtendedField::Polarity => write!(f, "Polarity"),
            ExtendedField::WireFeedSpeed => write!(f, "Wire feed speed"),
            ExtendedField::GasType => write!(f, "Gas type"),
            ExtendedField::GasFlow => write!(f, "Gas flow"),
            ExtendedField::InterpassTemperature => write!(f, "Interpass temperature"),
        }
    }
}

use ExtendedField::*;

const ALL_FIELDS: &[ExtendedField] = &ExtendedField::ALL;

const SAW_FIELDS: &[ExtendedField] = &[
    PassType,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    WireFeedSpeed,
    InterpassTemperature,
];

const MMA_FIELDS: &[ExtendedField] = &[
    PassType,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    InterpassTemperature,
];

const SELF_SHIELDED_FIELDS: &[ExtendedField] = &[
    PassType,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    WireFeedSpeed,
    InterpassTemperature,
];

const GAS_SHIELDED_WIRE_FIELDS: &[ExtendedField] = &[
    PassType,
    TransferMode,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    WireFeedSpeed,
    GasType,
    GasFlow,
    InterpassTemperature,
];

const TIG_FIELDS: &[ExtendedField] = &[
    PassType,
    FillerMaterial,
    FillerDiameter,
    Polarity,
    GasType,
    GasFlow,
    InterpassTemperature,
];

/// A welding process and its calculation parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeldingProcess {
    pub name: &'static str,
    /// ISO 4063 reference number (`Arc` for the arc-energy mode).
    pub iso_code: &'static str,
    /// AWS abbreviation.
    pub aws_code: &'static str,
    pub efficiency_factor: f64,
    pub default_voltage: f64,
    pub default_amperage: f64,
    pub relevant_fields: &'static [ExtendedField],
}

impl WeldingProcess {
    /// True for the arc-energy pseudo-process (k forced to 1.0).
    pub fn is_arc_energy(&self) -> bool {
        self.iso_code == ARC_ENERGY_CODE
    }

    pub fn is_relevant(&self, field: ExtendedField) -> bool {
        self.relevant_fields.contains(&field)
    }

    /// Standard the process is referenced by, as shown next to its name.
    pub fn detail_label(&self) -> String {
        if self.is_arc_energy() {
            "ISO/TR 18491".to_string()
        } else {
            format!("ISO 4063: {}", self.iso_code)
        }
    }
}

/// The full process list, arc energy first.
pub static PROCESSES: &[WeldingProcess] = &[
    WeldingProcess {
        name: "Arc energy",
        iso_code: ARC_ENERGY_CODE,
        aws_code: "-",
        efficiency_factor: 1.0,
        default_voltage: 0.0,
        default_amperage: 0.0,
        relevant_fields: ALL_FIELDS,
    },
    WeldingProcess {
        name: "Submerged arc welding",
        iso_code: "121",
        aws_code: "SAW",
        efficiency_factor: 1.0,
        default_voltage: 30.0,
        default_amperage: 500.0,
        relevant_fields: SAW_FIELDS,
    },
    WeldingProcess {
        name: "MMA / Covered electrode",
        iso_code: "111",
        aws_code: "SMAW",
        efficiency_factor: 0.8,
        default_voltage: 23.0,
        default_amperage: 120.0,
        relevant_fields: MMA_FIELDS,
    },
    WeldingProcess {
        name: "MIG welding",
        iso_code: "131",
        aws_code: "GMAW",
        efficiency_factor: 0.8,
        default_voltage: 24.0,
        default_amperage: 200.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "MAG welding",
        iso_code: "135",
        aws_code: "GMAW",
        efficiency_factor: 0.8,
        default_voltage: 24.0,
        default_amperage: 200.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "FCAW No Gas",
        iso_code: "114",
        aws_code: "FCAW-S",
        efficiency_factor: 0.8,
        default_voltage: 24.0,
        default_amperage: 180.0,
        relevant_fields: SELF_SHIELDED_FIELDS,
    },
    WeldingProcess {
        name: "FCAW Active Gas",
        iso_code: "136",
        aws_code: "FCAW-G",
        efficiency_factor: 0.8,
        default_voltage: 25.0,
        default_amperage: 220.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "FCAW Inert Gas",
        iso_code: "137",
        aws_code: "FCAW-G",
        efficiency_factor: 0.8,
        default_voltage: 25.0,
        default_amperage: 220.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "MCAW Active Gas",
        iso_code: "138",
        aws_code: "GMAW-C",
        efficiency_factor: 0.8,
        default_voltage: 25.0,
        default_amperage: 240.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "MCAW Inert Gas",
        iso_code: "139",
        aws_code: "GMAW-C",
        efficiency_factor: 0.8,
        default_voltage: 25.0,
        default_amperage: 240.0,
        relevant_fields: GAS_SHIELDED_WIRE_FIELDS,
    },
    WeldingProcess {
        name: "TIG welding",
        iso_code: "141",
        aws_code: "GTAW",
        efficiency_factor: 0.6,
        default_voltage: 14.0,
        default_amperage: 110.0,
        relevant_fields: TIG_FIELDS,
    },
    WeldingProcess {
        name: "Plasma arc welding",
        iso_code: "15",
        aws_code: "PAW",
        efficiency_factor: 0.6,
        default_voltage: 25.0,
        default_amperage: 150.0,
        relevant_fields: TIG_FIELDS,
    },
];

/// The arc-energy process. Always present, never hidden.
pub fn arc_energy() -> &'static WeldingProcess {
    &PROCESSES[0]
}

pub fn find_by_name(name: &str) -> Option<&'static WeldingProcess> {
    PROCESSES.iter().find(|p| p.name == name)
}

pub fn find_by_code(code: &str) -> Option<&'static WeldingProcess> {
    PROCESSES.iter().find(|p| p.iso_code == code)
}

/// Resolves a stored process name, falling back to arc energy.
pub fn resolve(name: &str) -> &'static WeldingProcess {
    find_by_name(name).unwrap_or_else(arc_energy)
}
