//! Job store: domain-level access to jobs and passes.
//!
//! Converts between the raw repository rows and `WeldJob` / `WeldPass`.
//! Every method returns the repository error; deciding whether a failure
//! is fatal is left to the caller.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::db::job_repo::{self, JobFilter, JobRow};
use crate::db::pass_repo::{self, PassRow};
use crate::db::{Database, DatabaseError};
use crate::model::{
    JobMetadata, JobSummary, PassDetails, PassType, Polarity, TransferMode, WeldJob, WeldPass,
};

// ─── Helpers ────────────────────────────────────────────────────────────────

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::warn!("parse_timestamp: failed to parse '{}': {}", s, e);
            DateTime::<Utc>::default()
        })
}

/// Fixed-width RFC 3339 so that text ordering equals time ordering.
pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_label<T>(value: Option<&str>, parse: fn(&str) -> Option<T>, what: &str, id: &str) -> Option<T> {
    let value = value?;
    let parsed = parse(value);
    if parsed.is_none() && value.trim() != "-" && !value.trim().is_empty() {
        log::warn!("Unknown {} '{}' on pass {}, ignoring", what, value, id);
    }
    parsed
}

fn job_from_row(row: JobRow) -> WeldJob {
    WeldJob {
        date: parse_timestamp(&row.date),
        created_at: parse_timestamp(&row.created_at),
        id: row.id,
        name: row.name,
        notes: row.notes,
        wpqr_reference: row.wpqr_reference,
        base_material: row.base_material,
        preheat_temperature: row.preheat_temperature,
        max_interpass_temperature: row.max_interpass_temperature,
    }
}

fn job_to_row(job: &WeldJob) -> JobRow {
    JobRow {
        id: job.id.clone(),
        name: job.name.clone(),
        date: format_timestamp(job.date),
        created_at: format_timestamp(job.created_at),
        notes: job.notes.clone(),
        wpqr_reference: job.wpqr_reference.clone(),
        base_material: job.base_material.clone(),
        preheat_temperature: job.preheat_temperature.clone(),
        max_interpass_temperature: job.max_interpass_temperature.clone(),
    }
}

fn pass_from_row(row: PassRow) -> WeldPass {
    let details = PassDetails {
        pass_type: parse_label(row.pass_type.as_deref(), PassType::parse, "pass type", &row.id),
        transfer_mode: parse_label(
            row.transfer_mode.as_deref(),
            TransferMode::parse,
            "transfer mode",
            &row.id,
        ),
        filler_material: row.filler_material,
        filler_diameter: row.filler_diameter,
        polarity: parse_label(row.polarity.as_deref(), Polarity::parse, "polarity", &row.id),
        wire_feed_speed: row.wire_feed_speed,
        gas_type: row.gas_type,
        gas_flow: row.gas_flow,
        actual_interpass_temperature: row.actual_interpass,
    };

    WeldPass {
        timestamp: parse_timestamp(&row.timestamp),
        id: row.id,
        job_id: row.job_id,
        name: row.name,
        voltage: row.voltage,
        amperage: row.amperage,
        travel_time_seconds: row.travel_time,
        weld_length_millimeters: row.weld_length,
        heat_input_kj_per_mm: row.heat_input,
        efficiency_factor_used: row.efficiency_factor,
        is_arc_energy_mode: row.is_arc_energy,
        process_name: row.process_name,
        saved_travel_speed: row.travel_speed,
        details,
    }
}

fn pass_to_row(pass: &WeldPass) -> PassRow {
    let d = &pass.details;
    PassRow {
        id: pass.id.clone(),
        job_id: pass.job_id.clone(),
        name: pass.name.clone(),
        timestamp: format_timestamp(pass.timestamp),
        voltage: pass.voltage,
        amperage: pass.amperage,
        travel_time: pass.travel_time_seconds,
        weld_length: pass.weld_length_millimeters,
        heat_input: pass.heat_input_kj_per_mm,
        efficiency_factor: pass.efficiency_factor_used,
        is_arc_energy: pass.is_arc_energy_mode,
        process_name: pass.process_name.clone(),
        pass_type: d.pass_type.map(|p| p.as_str().to_string()),
        transfer_mode: d.transfer_mode.map(|t| t.as_str().to_string()),
        filler_material: d.filler_material.clone(),
        filler_diameter: d.filler_diameter,
        polarity: d.polarity.map(|p| p.as_str().to_string()),
        wire_feed_speed: d.wire_feed_speed,
        gas_type: d.gas_type.clone(),
        gas_flow: d.gas_flow,
        actual_interpass: d.actual_interpass_temperature,
        travel_speed: pass.saved_travel_speed,
    }
}

// ─── Query types ────────────────────────────────────────────────────────────

/// A job as listed in the history, with its pass count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListEntry {
    pub job: WeldJob,
    pub pass_count: u64,
}

// ─── JobStore ───────────────────────────────────────────────────────────────

/// Persistent store for jobs and their passes.
#[derive(Clone)]
pub struct JobStore {
    db: Database,
}

impl JobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates and persists a new, empty job.
    pub fn create_job(&self, name: &str, now: DateTime<Utc>) -> Result<WeldJob, DatabaseError> {
        let job = WeldJob::new(name, now);
        self.insert_job(&job)?;
        Ok(job)
    }

    /// Persists an already-built job.
    pub fn insert_job(&self, job: &WeldJob) -> Result<(), DatabaseError> {
        job_repo::insert(&self.db, &job_to_row(job))?;
        log::info!("Created job {}", job.id);
        Ok(())
    }

    pub fn find_job(&self, id: &str) -> Result<Option<WeldJob>, DatabaseError> {
        Ok(job_repo::find_by_id(&self.db, id)?.map(job_from_row))
    }

    /// Job history, newest first.
    pub fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobListEntry>, DatabaseError> {
        let (rows, _total) = job_repo::query(&self.db, filter)?;
        rows.into_iter()
            .map(|row| {
                let pass_count = pass_repo::count_for_job(&self.db, &row.id)?;
                Ok(JobListEntry {
                    job: job_from_row(row),
                    pass_count,
                })
            })
            .collect()
    }

    pub fn rename_job(&self, id: &str, name: &str) -> Result<(), DatabaseError> {
        job_repo::rename(&self.db, id, name)
    }

    /// Writes edited metadata. The job date is left alone.
    pub fn update_metadata(&self, id: &str, metadata: JobMetadata) -> Result<WeldJob, DatabaseError> {
        let mut job = self.find_job(id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "Job",
            id: id.to_string(),
        })?;
        job.apply_metadata(metadata);
        job_repo::update(&self.db, &job_to_row(&job))?;
        Ok(job)
    }

    /// Marks a job as modified at `now`.
    pub fn touch_job(&self, id: &str, now: DateTime<Utc>) -> Result<(), DatabaseError> {
        job_repo::touch(&self.db, id, &format_timestamp(now))
    }

    /// Deletes a job and, by cascade, all of its passes.
    pub fn delete_job(&self, id: &str) -> Result<bool, DatabaseError> {
        let removed = job_repo::delete(&self.db, id)?;
        if removed {
            log::info!("Deleted job {}", id);
        }
        Ok(removed)
    }

    pub fn append_pass(&self, pass: &WeldPass) -> Result<(), DatabaseError> {
        pass_repo::insert(&self.db, &pass_to_row(pass))
    }

    pub fn find_pass(&self, id: &str) -> Result<Option<WeldPass>, DatabaseError> {
        Ok(pass_repo::find_by_id(&self.db, id)?.map(pass_from_row))
    }

    /// Passes of a job, oldest first.
    pub fn passes(&self, job_id: &str) -> Result<Vec<WeldPass>, DatabaseError> {
        Ok(pass_repo::list_for_job(&self.db, job_id)?
            .into_iter()
            .map(pass_from_row)
            .collect())
    }

    pub fn pass_count(&self, job_id: &str) -> Result<u64, DatabaseError> {
        pass_repo::count_for_job(&self.db, job_id)
    }

    pub fn delete_pass(&self, id: &str) -> Result<bool, DatabaseError> {
        pass_repo::delete(&self.db, id)
    }

    /// Aggregates over the stored heat-input values.
    pub fn summary(&self, job_id: &str) -> Result<JobSummary, DatabaseError> {
        let stats = pass_repo::stats_for_job(&self.db, job_id)?;
        Ok(JobSummary {
            pass_count: stats.count,
            average_heat_input: stats.average,
            min_heat_input: stats.min,
            max_heat_input: stats.max,
        })
    }
}
