//! Pass repository: operations on the `passes` table.
//!
//! Passes are append-only: there is no update function. A stored
//! `heat_input` is never rewritten.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A raw pass row from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRow {
    pub id: String,
    pub job_id: String,
    pub name: String,
    pub timestamp: String,
    pub voltage: Option<f64>,
    pub amperage: Option<f64>,
    pub travel_time: Option<f64>,
    pub weld_length: Option<f64>,
    pub heat_input: f64,
    pub efficiency_factor: f64,
    pub is_arc_energy: bool,
    pub process_name: String,
    pub pass_type: Option<String>,
    pub transfer_mode: Option<String>,
    pub filler_material: Option<String>,
    pub filler_diameter: Option<f64>,
    pub polarity: Option<String>,
    pub wire_feed_speed: Option<f64>,
    pub gas_type: Option<String>,
    pub gas_flow: Option<f64>,
    pub actual_interpass: Option<f64>,
    pub travel_speed: Option<f64>,
}

impl PassRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            name: row.get("name")?,
            timestamp: row.get("timestamp")?,
            voltage: row.get("voltage")?,
            amperage: row.get("amperage")?,
            travel_time: row.get("travel_time")?,
            weld_length: row.get("weld_length")?,
            heat_input: row.get("heat_input")?,
            efficiency_factor: row.get("efficiency_factor")?,
            is_arc_energy: row.get("is_arc_energy")?,
            process_name: row.get("process_name")?,
            pass_type: row.get("pass_type")?,
            transfer_mode: row.get("transfer_mode")?,
            filler_material: row.get("filler_material")?,
            filler_diameter: row.get("filler_diameter")?,
            polarity: row.get("polarity")?,
            wire_feed_speed: row.get("wire_feed_speed")?,
            gas_type: row.get("gas_type")?,
            gas_flow: row.get("gas_flow")?,
            actual_interpass: row.get("actual_interpass")?,
            travel_speed: row.get("travel_speed")?,
        })
    }
}

/// Aggregate heat-input figures for one job.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassStats {
    pub count: u64,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Inserts a new pass row. The owning job must exist.
pub fn insert(db: &Database, pass: &PassRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO passes (id, job_id, name, timestamp, voltage, amperage, travel_time,
             weld_length, heat_input, efficiency_factor, is_arc_energy, process_name, pass_type,
             transfer_mode, filler_material, filler_diameter, polarity, wire_feed_speed,
             gas_type, gas_flow, actual_interpass, travel_speed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
             ?17, ?18, ?19, ?20, ?21, ?22)",
            params![
                pass.id,
                pass.job_id,
                pass.name,
                pass.timestamp,
                pass.voltage,
                pass.amperage,
                pass.travel_time,
                pass.weld_length,
                pass.heat_input,
                pass.efficiency_factor,
                pass.is_arc_energy,
                pass.process_name,
                pass.pass_type,
                pass.transfer_mode,
                pass.filler_material,
                pass.filler_diameter,
                pass.polarity,
                pass.wire_feed_speed,
                pass.gas_type,
                pass.gas_flow,
                pass.actual_interpass,
                pass.travel_speed,
            ],
        )?;
        Ok(())
    })
}

/// Finds a pass by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<PassRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM passes WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], PassRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All passes of a job, oldest first. Insertion order breaks timestamp ties.
pub fn list_for_job(db: &Database, job_id: &str) -> Result<Vec<PassRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM passes WHERE job_id = ?1 ORDER BY timestamp ASC, rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![job_id], PassRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts the passes of a job.
pub fn count_for_job(db: &Database, job_id: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM passes WHERE job_id = ?1",
            params![job_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Heat-input statistics over the stored values of a job's passes.
pub fn stats_for_job(db: &Database, job_id: &str) -> Result<PassStats, DatabaseError> {
    db.with_conn(|conn| {
        let stats = conn.query_row(
            "SELECT COUNT(*), AVG(heat_input), MIN(heat_input), MAX(heat_input)
             FROM passes WHERE job_id = ?1",
            params![job_id],
            |r| {
                Ok(PassStats {
                    count: r.get(0)?,
                    average: r.get(1)?,
                    min: r.get(2)?,
                    max: r.get(3)?,
                })
            },
        )?;
        Ok(stats)
    })
}

/// Deletes a single pass. Returns whether a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM passes WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}
