//! Heat input and travel speed calculation.
//!
//! Heat input (kJ/mm) = U · I · t / (L · 1000) · k, following ISO/TR 18491
//! for arc energy (k = 1.0) and ISO 17671 for the process-corrected value.
//! Nothing in this module can fail: degenerate inputs yield `0.0`.

use serde::Serialize;

use crate::process::WeldingProcess;

/// Parses user-typed decimal text. Accepts `,` as decimal separator.
///
/// Anything unparsable, or non-finite, becomes `0.0`.
pub fn parse_decimal(text: &str) -> f64 {
    let cleaned = text.trim().replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Heat input in kJ/mm. Zero length yields `0.0`.
pub fn heat_input(voltage: f64, amperage: f64, travel_time: f64, weld_length: f64, k: f64) -> f64 {
    if weld_length == 0.0 {
        return 0.0;
    }
    ((voltage * amperage * travel_time) / (weld_length * 1000.0)) * k
}

/// Travel speed in mm/min. Zero time yields `0.0`.
pub fn travel_speed(weld_length: f64, travel_time: f64) -> f64 {
    if travel_time == 0.0 {
        return 0.0;
    }
    (weld_length / travel_time) * 60.0
}

/// Efficiency factor to apply for `process`.
///
/// The arc-energy override, or the arc-energy process itself, forces `1.0`.
pub fn efficiency_for(process: &WeldingProcess, arc_energy_override: bool) -> f64 {
    if arc_energy_override || process.is_arc_energy() {
        1.0
    } else {
        process.efficiency_factor
    }
}

/// The four core measurements of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub voltage: f64,
    pub amperage: f64,
    pub travel_time: f64,
    pub weld_length: f64,
}

impl Measurements {
    /// Builds measurements from raw input text.
    pub fn parse(voltage: &str, amperage: &str, travel_time: &str, weld_length: &str) -> Self {
        Self {
            voltage: parse_decimal(voltage),
            amperage: parse_decimal(amperage),
            travel_time: parse_decimal(travel_time),
            weld_length: parse_decimal(weld_length),
        }
    }

    pub fn calculate(&self, k: f64) -> Calculation {
        Calculation {
            heat_input: heat_input(
                self.voltage,
                self.amperage,
                self.travel_time,
                self.weld_length,
                k,
            ),
            travel_speed: travel_speed(self.weld_length, self.travel_time),
            efficiency_factor: k,
        }
    }
}

/// Derived values for one set of measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    /// kJ/mm
    pub heat_input: f64,
    /// mm/min
    pub travel_speed: f64,
    pub efficiency_factor: f64,
}
