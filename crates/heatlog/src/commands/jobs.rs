//! Job history commands.

use crate::app::HeatInputApp;
use crate::db::job_repo::JobFilter;
use crate::error::HeatlogError;
use crate::export;

use super::{Action, ApiResponse, Outcome};

fn detail(app: &HeatInputApp, job_id: &str) -> Result<Option<Outcome>, HeatlogError> {
    let store = app.logger.store();
    let Some(job) = store.find_job(job_id)? else {
        return Ok(None);
    };
    let passes = store.passes(job_id)?;
    let summary = store.summary(job_id)?;
    Ok(Some(Outcome::JobDetail {
        job,
        passes,
        summary,
    }))
}

fn run(app: &mut HeatInputApp, action: Action) -> Result<Option<Outcome>, HeatlogError> {
    let outcome = match action {
        Action::ListJobs {
            name_contains,
            limit,
            offset,
        } => {
            let filter = JobFilter {
                name_contains,
                limit,
                offset,
            };
            Some(Outcome::Jobs {
                jobs: app.logger.store().list_jobs(&filter)?,
            })
        }
        Action::GetJob { job_id } => detail(app, &job_id)?,
        Action::UpdateJobMetadata { job_id, metadata } => {
            app.logger.store().update_metadata(&job_id, metadata)?;
            if app.logger.state().active_job_id.as_deref() == Some(job_id.as_str()) {
                app.logger.refresh_job_name();
            }
            detail(app, &job_id)?
        }
        Action::DeletePass { pass_id } => Some(Outcome::Deleted {
            removed: app.logger.store().delete_pass(&pass_id)?,
        }),
        Action::DeleteJob { job_id } => {
            let removed = app.logger.store().delete_job(&job_id)?;
            app.logger.forget_job(&job_id);
            Some(Outcome::Deleted { removed })
        }
        Action::ExportJob { job_id } => {
            let store = app.logger.store();
            match store.find_job(&job_id)? {
                Some(job) => {
                    let passes = store.passes(&job_id)?;
                    let dir = app.config.export_directory();
                    let path =
                        export::write_export(&job, &passes, &dir, app.decimal_separator())?;
                    Some(Outcome::Exported { path })
                }
                None => None,
            }
        }
        other => {
            return Err(HeatlogError::Command(format!(
                "not a job action: {:?}",
                other
            )))
        }
    };
    Ok(outcome)
}

pub fn handle(app: &mut HeatInputApp, action: Action) -> ApiResponse<Outcome> {
    match run(app, action) {
        Ok(Some(outcome)) => ApiResponse::ok(outcome),
        Ok(None) => ApiResponse::err("Job not found"),
        Err(e) => {
            log::error!("Job command failed: {}", e);
            ApiResponse::err(e.to_string())
        }
    }
}
