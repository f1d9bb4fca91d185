//! Job report as delimiter-separated text.
//!
//! Locales that write decimals with a comma get `;` between columns so
//! numbers never need quoting.

use crate::model::{WeldJob, WeldPass};

pub const REPORT_TITLE: &str = "JOB REPORT";

pub const COLUMNS: [&str; 19] = [
    "Pass",
    "Type",
    "Process",
    "Gas",
    "Voltage (V)",
    "Amperage (A)",
    "Time (s)",
    "Length (mm)",
    "Energy (kJ/mm)",
    "k-Factor",
    "Actual Interpass (°C)",
    "Diameter (mm)",
    "Polarity",
    "WFS (m/min)",
    "Transfer Mode",
    "Filler",
    "Gas Flow (l/min)",
    "Speed (mm/min)",
    "Timestamp",
];

/// `;` for decimal-comma locales, `,` otherwise.
pub fn column_separator(decimal: char) -> char {
    if decimal == ',' {
        ';'
    } else {
        ','
    }
}

/// Quotes a cell when it contains the separator, a quote or a line break.
fn escape(value: &str, sep: char) -> String {
    if value.contains(sep) || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Always-quoted metadata value.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn number(value: f64, decimal: char) -> String {
    let s = format!("{:.2}", value);
    if decimal == '.' {
        s
    } else {
        s.replace('.', &decimal.to_string())
    }
}

/// Absent and non-positive values are empty cells.
fn measured(value: Option<f64>, decimal: char) -> String {
    match value {
        Some(v) if v > 0.0 => number(v, decimal),
        _ => String::new(),
    }
}

fn temperature(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{} °C", value)
    }
}

fn pass_row(pass: &WeldPass, decimal: char, sep: char) -> String {
    let d = &pass.details;
    let k_factor = if pass.is_arc_energy_mode {
        format!("1{}0 (AE)", decimal)
    } else {
        number(pass.efficiency_factor_used, decimal)
    };
    // A measured 0 °C interpass is a reading, not a missing value.
    let interpass = d
        .actual_interpass_temperature
        .map(|t| number(t, decimal))
        .unwrap_or_default();

    let cells = [
        pass.name.clone(),
        d.pass_type.map(|p| p.as_str().to_string()).unwrap_or_else(|| "-".to_string()),
        pass.process_name.clone(),
        d.gas_type.clone().unwrap_or_else(|| "-".to_string()),
        measured(pass.voltage, decimal),
        measured(pass.amperage, decimal),
        measured(pass.travel_time_seconds, decimal),
        measured(pass.weld_length_millimeters, decimal),
        number(pass.heat_input_kj_per_mm, decimal),
        k_factor,
        interpass,
        measured(d.filler_diameter, decimal),
        d.polarity.map(|p| p.as_str().to_string()).unwrap_or_default(),
        measured(d.wire_feed_speed, decimal),
        d.transfer_mode.map(|t| t.as_str().to_string()).unwrap_or_default(),
        d.filler_material.clone().unwrap_or_default(),
        measured(d.gas_flow, decimal),
        measured(pass.saved_travel_speed, decimal),
        pass.timestamp.format("%H:%M").to_string(),
    ];

    cells
        .iter()
        .map(|c| escape(c, sep))
        .collect::<Vec<_>>()
        .join(&sep.to_string())
}

/// Renders the report for `job`. Passes are written oldest first whatever
/// order they are given in.
pub fn generate_csv(job: &WeldJob, passes: &[WeldPass], decimal: char) -> String {
    let sep = column_separator(decimal);
    let mut csv = String::new();

    let metadata = [
        ("Name", job.name.clone()),
        ("Date", job.date.format("%Y-%m-%d").to_string()),
        ("WPQR", job.wpqr_reference.clone()),
        ("Base Material", job.base_material.clone()),
        ("Preheat Temp", temperature(&job.preheat_temperature)),
        ("Max Interpass", temperature(&job.max_interpass_temperature)),
        ("Notes", job.notes.clone()),
    ];

    csv.push_str(&format!("{}{}{}\n", REPORT_TITLE, sep, "heatlog"));
    for (label, value) in metadata {
        csv.push_str(&format!("{}{}{}\n", label, sep, quoted(&value)));
    }
    csv.push('\n');

    csv.push_str(&COLUMNS.join(&sep.to_string()));
    csv.push('\n');

    let mut sorted: Vec<&WeldPass> = passes.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);
    for pass in sorted {
        csv.push_str(&pass_row(pass, decimal, sep));
        csv.push('\n');
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PassDetails, PassType, Polarity};
    use chrono::{TimeZone, Utc};

    fn job() -> WeldJob {
        let mut job = WeldJob::new("Flange A", Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap());
        job.wpqr_reference = "WPQR-12".to_string();
        job.preheat_temperature = "100".to_string();
        job.notes = "Said \"ok\"".to_string();
        job
    }

    fn pass(minute: u32, name: &str) -> WeldPass {
        WeldPass {
            id: format!("p{}", minute),
            job_id: "j".to_string(),
            name: name.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 17, 9, minute, 0).unwrap(),
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
        }
    }

    #[test]
    fn test_column_separator() {
        assert_eq!(column_separator(','), ';');
        assert_eq!(column_separator('.'), ',');
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain", ','), "plain");
        assert_eq!(escape("a,b", ','), "\"a,b\"");
        assert_eq!(escape("a,b", ';'), "a,b");
        assert_eq!(escape("say \"hi\"", ';'), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_metadata_rows() {
        let csv = generate_csv(&job(), &[], '.');
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "JOB REPORT,heatlog");
        assert_eq!(lines[1], "Name,\"Flange A\"");
        assert_eq!(lines[2], "Date,\"2026-10-17\"");
        assert_eq!(lines[5], "Preheat Temp,\"100 °C\"");
        assert_eq!(lines[6], "Max Interpass,\"\"");
        assert_eq!(lines[7], "Notes,\"Said \"\"ok\"\"\"");
        assert_eq!(lines[8], "");
        assert!(lines[9].starts_with("Pass,Type,Process"));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_point_locale_row() {
        let csv = generate_csv(&job(), &[pass(5, "Pass #1")], '.');
        let row = csv.lines().last().unwrap();
        assert_eq!(
            row,
            "Pass #1,-,MAG welding,-,24.00,200.00,30.00,150.00,0.77,0.80,,,,,,,,300.00,09:05"
        );
    }

    #[test]
    fn test_comma_locale_row() {
        let mut p = pass(5, "Pass #1");
        p.is_arc_energy_mode = true;
        p.efficiency_factor_used = 1.0;
        p.details.pass_type = Some(PassType::Root);
        p.details.polarity = Some(Polarity::DcNegative);
        p.details.actual_interpass_temperature = Some(0.0);
        let csv = generate_csv(&job(), &[p], ',');
        let row = csv.lines().last().unwrap();
        let cells: Vec<&str> = row.split(';').collect();
        assert_eq!(cells[1], "Root");
        assert_eq!(cells[4], "24,00");
        assert_eq!(cells[8], "0,77");
        assert_eq!(cells[9], "1,0 (AE)");
        assert_eq!(cells[10], "0,00");
        assert_eq!(cells[12], "DC-");
    }

    #[test]
    fn test_rows_sorted_by_timestamp() {
        let passes = [pass(30, "Pass #3"), pass(10, "Pass #1"), pass(20, "Pass #2")];
        let csv = generate_csv(&job(), &passes, '.');
        let names: Vec<&str> = csv
            .lines()
            .skip(10)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["Pass #1", "Pass #2", "Pass #3"]);
    }

    #[test]
    fn test_absent_numbers_are_empty() {
        let mut p = pass(1, "Pass #1");
        p.voltage = None;
        p.amperage = Some(0.0);
        p.saved_travel_speed = None;
        let csv = generate_csv(&job(), &[p], '.');
        let row = csv.lines().last().unwrap();
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells[4], "");
        assert_eq!(cells[5], "");
        assert_eq!(cells[17], "");
    }
}
