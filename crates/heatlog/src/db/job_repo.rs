//! Rows of the `jobs` table.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};

const COLUMNS: &str = "id, name, date, created_at, notes, wpqr_reference, base_material, \
     preheat_temperature, max_interpass_temperature";

fn expect_one(changed: usize, id: &str) -> Result<(), DatabaseError> {
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Job",
            id: id.to_string(),
        });
    }
    Ok(())
}

/// One job as stored. Temperatures and references are free text.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub id: String,
    pub name: String,
    /// Last-modified date (RFC 3339). Job history is sorted by this.
    pub date: String,
    pub created_at: String,
    pub notes: String,
    pub wpqr_reference: String,
    pub base_material: String,
    pub preheat_temperature: String,
    pub max_interpass_temperature: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
            notes: row.get("notes")?,
            wpqr_reference: row.get("wpqr_reference")?,
            base_material: row.get("base_material")?,
            preheat_temperature: row.get("preheat_temperature")?,
            max_interpass_temperature: row.get("max_interpass_temperature")?,
        })
    }
}

/// Narrows the job history listing.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    /// Case-insensitive substring match on the job name.
    pub name_contains: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub fn insert(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO jobs (id, name, date, created_at, notes, wpqr_reference, base_material,
             preheat_temperature, max_interpass_temperature)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                job.id,
                job.name,
                job.date,
                job.created_at,
                job.notes,
                job.wpqr_reference,
                job.base_material,
                job.preheat_temperature,
                job.max_interpass_temperature,
            ],
        )?;
        Ok(())
    })
}

/// Overwrites everything but `id` and `created_at`.
pub fn update(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE jobs SET name=?2, date=?3, notes=?4, wpqr_reference=?5, base_material=?6,
             preheat_temperature=?7, max_interpass_temperature=?8
             WHERE id=?1",
            params![
                job.id,
                job.name,
                job.date,
                job.notes,
                job.wpqr_reference,
                job.base_material,
                job.preheat_temperature,
                job.max_interpass_temperature,
            ],
        )?;
        expect_one(changed, &job.id)
    })
}

/// Renames a job without touching its other fields.
pub fn rename(db: &Database, id: &str, name: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("UPDATE jobs SET name = ?2 WHERE id = ?1", params![id, name])?;
        expect_one(changed, id)
    })
}

/// Bumps the last-modified date. A missing job is ignored.
pub fn touch(db: &Database, id: &str, date: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute("UPDATE jobs SET date = ?2 WHERE id = ?1", params![id, date])?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM jobs WHERE id = ?1", COLUMNS),
                [id],
                JobRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Job history page, most recently modified first, plus the number of
/// jobs matching the filter before paging.
pub fn query(db: &Database, filter: &JobFilter) -> Result<(Vec<JobRow>, u64), DatabaseError> {
    let pattern = filter
        .name_contains
        .as_ref()
        .map(|needle| format!("%{}%", needle.to_lowercase()));
    let limit = filter.limit.map_or(-1, |l| l as i64);
    let offset = filter.offset.unwrap_or(0) as i64;

    db.with_conn(|conn| {
        let total: u64 = conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE ?1 IS NULL OR LOWER(name) LIKE ?1",
            [&pattern],
            |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM jobs
             WHERE ?1 IS NULL OR LOWER(name) LIKE ?1
             ORDER BY date DESC, created_at DESC
             LIMIT ?2 OFFSET ?3",
            COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![pattern, limit, offset], JobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rows, total))
    })
}

/// Deletes a job; its passes go with it. Returns whether a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}
