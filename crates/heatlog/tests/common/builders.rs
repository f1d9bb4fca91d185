//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};

use heatlog::model::{PassDetails, WeldJob, WeldPass};

use super::harness::start_time;

/// Builder for `WeldPass` values with the 24 V / 200 A / 30 s / 150 mm
/// MAG pass as the default.
pub struct PassBuilder {
    pass: WeldPass,
}

impl PassBuilder {
    pub fn new(job_id: &str, number: u32) -> Self {
        Self {
            pass: WeldPass {
                id: format!("pass-{}", number),
                job_id: job_id.to_string(),
                name: format!("Pass #{}", number),
                timestamp: start_time() + Duration::minutes(i64::from(number)),
                voltage: Some(24.0),
                amperage: Some(200.0),
                travel_time_seconds: Some(30.0),
                weld_length_millimeters: Some(150.0),
                heat_input_kj_per_mm: 0.768,
                efficiency_factor_used: 0.8,
                is_arc_energy_mode: false,
                process_name: "MAG welding".to_string(),
                saved_travel_speed: Some(300.0),
                details: PassDetails::default(),
            },
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.pass.timestamp = timestamp;
        self
    }

    pub fn heat_input(mut self, value: f64) -> Self {
        self.pass.heat_input_kj_per_mm = value;
        self
    }

    pub fn without_measurements(mut self) -> Self {
        self.pass.voltage = None;
        self.pass.amperage = None;
        self.pass.travel_time_seconds = None;
        self.pass.weld_length_millimeters = None;
        self.pass.saved_travel_speed = None;
        self
    }

    pub fn details(mut self, details: PassDetails) -> Self {
        self.pass.details = details;
        self
    }

    pub fn build(self) -> WeldPass {
        self.pass
    }
}

/// Builder for `WeldJob` values.
pub struct JobBuilder {
    job: WeldJob,
}

impl JobBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            job: WeldJob::new(name, start_time()),
        }
    }

    pub fn wpqr(mut self, reference: &str) -> Self {
        self.job.wpqr_reference = reference.to_string();
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.job.notes = notes.to_string();
        self
    }

    pub fn build(self) -> WeldJob {
        self.job
    }
}

/// Builder for configuration JSON documents.
pub struct ConfigJsonBuilder {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl ConfigJsonBuilder {
    pub fn new() -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("version".to_string(), "1.0".into());
        Self { fields }
    }

    pub fn set(mut self, key: &str, value: serde_json::Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn build(self) -> String {
        serde_json::Value::Object(self.fields).to_string()
    }
}
