use std::path::{Path, PathBuf};

use tracing::info_span;

use crate::error::ExportError;
use crate::model::{WeldJob, WeldPass};
use crate::sanitize;

use super::csv::generate_csv;

/// `{job name with spaces as _}_{YYYY-MM-DD}.csv`, from the job date.
pub fn export_filename(job: &WeldJob) -> String {
    format!(
        "{}_{}.csv",
        sanitize::sanitize_filename(&job.name),
        job.date.format("%Y-%m-%d")
    )
}

/// Writes the job report into `dir` and returns the file path, ready to
/// hand to the platform share sheet. An existing file of the same name is
/// replaced.
pub fn write_export(
    job: &WeldJob,
    passes: &[WeldPass],
    dir: &Path,
    decimal: char,
) -> Result<PathBuf, ExportError> {
    let _span = info_span!("export_csv", job_id = %job.id, pass_count = passes.len()).entered();

    std::fs::create_dir_all(dir).map_err(|e| ExportError::CreateDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(export_filename(job));
    let content = generate_csv(job, passes, decimal);
    std::fs::write(&path, content.as_bytes()).map_err(|e| ExportError::WriteFile {
        path: path.clone(),
        source: e,
    })?;

    log::info!(
        "Exported {} passes to {}",
        passes.len(),
        sanitize::redact_path(&path)
    );
    Ok(path)
}
