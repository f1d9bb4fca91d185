//! CSV export of logged jobs.

mod common;

use common::{JobBuilder, PassBuilder, TestHarness};

use chrono::Duration;
use heatlog::config::DecimalSeparator;
use heatlog::export::{generate_csv, COLUMNS};
use heatlog::model::{PassDetails, PassType, Polarity};
use heatlog::{Action, Outcome};

fn export(h: &mut TestHarness, job_id: String) -> std::path::PathBuf {
    match h.dispatch(Action::ExportJob { job_id }).data {
        Some(Outcome::Exported { path }) => path,
        other => panic!("export failed: {:?}", other),
    }
}

/// Pass rows of a report, after the metadata block and the header.
fn pass_rows(csv: &str) -> Vec<&str> {
    csv.lines().skip(10).collect()
}

#[test]
fn test_export_logged_job() {
    let mut h = TestHarness::new();
    h.dispatch(Action::SelectProcess {
        name: "MAG welding".to_string(),
    });

    let mut job_id = String::new();
    for _ in 0..3 {
        h.enter("24", "200", "30", "150");
        job_id = h.log_pass().job_id;
        h.clock.advance_secs(300.0);
    }

    let path = export(&mut h, job_id);
    assert!(path.starts_with(&h.export_dir));
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Job_17_Oct_0730_2026-10-17.csv"
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "JOB REPORT,heatlog");
    assert_eq!(lines[1], "Name,\"Job 17 Oct 07:30\"");
    assert_eq!(lines[8], "");
    assert_eq!(lines[9], COLUMNS.join(","));

    let rows = pass_rows(&content);
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert!(row.starts_with(&format!("Pass #{},-,MAG welding,-,24.00,200.00,30.00,150.00,0.77,0.80,", i + 1)));
    }
    assert!(rows[0].ends_with(",300.00,07:30"));
    assert!(rows[1].ends_with(",07:35"));
    assert!(rows[2].ends_with(",07:40"));
}

#[test]
fn test_absent_values_are_empty_cells() {
    let job = JobBuilder::new("Bracket").build();
    let pass = PassBuilder::new(&job.id, 1)
        .without_measurements()
        .heat_input(0.5)
        .build();

    let csv = generate_csv(&job, &[pass], '.');
    let expected: Vec<&str> = vec![
        "Pass #1", "-", "MAG welding", "-", "", "", "", "", "0.50", "0.80", "", "", "", "", "", "",
        "", "", "07:31",
    ];
    assert_eq!(expected.len(), COLUMNS.len());
    assert_eq!(pass_rows(&csv), vec![expected.join(",")]);
}

#[test]
fn test_extended_columns() {
    let job = JobBuilder::new("Bracket").build();
    let pass = PassBuilder::new(&job.id, 1)
        .details(PassDetails {
            pass_type: Some(PassType::Root),
            polarity: Some(Polarity::DcNegative),
            gas_type: Some("M21".to_string()),
            filler_diameter: Some(1.2),
            actual_interpass_temperature: Some(0.0),
            ..PassDetails::default()
        })
        .build();

    let csv = generate_csv(&job, &[pass], '.');
    let row = pass_rows(&csv)[0];
    assert!(row.starts_with("Pass #1,Root,MAG welding,M21,"));
    assert!(row.contains(",0.80,0.00,1.20,DC-,"));
}

#[test]
fn test_arc_energy_k_factor_label() {
    let job = JobBuilder::new("Bracket").build();
    let mut pass = PassBuilder::new(&job.id, 1).heat_input(0.96).build();
    pass.is_arc_energy_mode = true;
    pass.efficiency_factor_used = 1.0;

    let csv = generate_csv(&job, &[pass], ',');
    assert!(pass_rows(&csv)[0].contains(";0,96;1,0 (AE);"));
}

#[test]
fn test_comma_locale_export() {
    let mut h = TestHarness::with_separator(DecimalSeparator::Comma);
    h.dispatch(Action::SelectProcess {
        name: "MAG welding".to_string(),
    });
    h.enter("24,5", "200", "30", "150");
    let job_id = h.log_pass().job_id;

    let content = std::fs::read_to_string(export(&mut h, job_id)).unwrap();
    assert!(content.starts_with("JOB REPORT;heatlog\n"));
    assert!(content.contains(&COLUMNS.join(";")));
    let row = pass_rows(&content)[0];
    assert!(row.starts_with("Pass #1;-;MAG welding;-;24,50;200,00;30,00;150,00;0,78;0,80;"));
}

#[test]
fn test_rows_follow_timestamps() {
    let job = JobBuilder::new("Bracket").build();
    let late = PassBuilder::new(&job.id, 1)
        .at(job.date + Duration::hours(2))
        .build();
    let early = PassBuilder::new(&job.id, 2).build();

    let csv = generate_csv(&job, &[late, early], '.');
    let rows = pass_rows(&csv);
    assert!(rows[0].starts_with("Pass #2,"));
    assert!(rows[1].starts_with("Pass #1,"));
}

#[test]
fn test_metadata_block() {
    let mut job = JobBuilder::new("Flange; \"B\"")
        .wpqr("WPQR-7")
        .notes("line one\nline two")
        .build();
    job.preheat_temperature = "80".to_string();

    let csv = generate_csv(&job, &[], ',');
    assert!(csv.contains("Name;\"Flange; \"\"B\"\"\"\n"));
    assert!(csv.contains("WPQR;\"WPQR-7\"\n"));
    assert!(csv.contains("Preheat Temp;\"80 °C\"\n"));
    assert!(csv.contains("Max Interpass;\"\"\n"));
    assert!(csv.contains("Notes;\"line one\nline two\"\n"));
}

#[test]
fn test_export_unknown_job() {
    let mut h = TestHarness::new();
    let response = h.dispatch(Action::ExportJob {
        job_id: "missing".to_string(),
    });
    assert!(!response.success);
    assert!(!h.export_dir.exists());
}
