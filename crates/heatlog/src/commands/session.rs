//! Calculator screen commands.

use crate::app::HeatInputApp;
use crate::process;
use crate::session::{UiEvent, UiMode};

use super::{Action, ApiResponse, Outcome, SessionSnapshot};

fn snapshot(app: &HeatInputApp) -> ApiResponse<Outcome> {
    ApiResponse::ok(Outcome::Session {
        snapshot: SessionSnapshot::of(app),
    })
}

fn log_pass(app: &mut HeatInputApp) -> ApiResponse<Outcome> {
    if !app.mode.allows_log_pass() {
        return ApiResponse::err("Finish the open dialog before logging a pass");
    }
    if app.logger.preview().heat_input <= 0.0 {
        return ApiResponse::err("Nothing to log: heat input is 0");
    }
    let pass = app.logger.log_pass();
    ApiResponse::ok(Outcome::PassLogged {
        label: pass.result_label(),
        pass,
        snapshot: SessionSnapshot::of(app),
    })
}

fn new_job(app: &mut HeatInputApp) -> ApiResponse<Outcome> {
    if app.logger.state().active_job_id.is_some() {
        let draft = app.logger.refresh_job_name();
        app.apply(UiEvent::BeginNaming { draft });
    } else {
        app.logger.start_new_session();
    }
    snapshot(app)
}

fn save_job_name(app: &mut HeatInputApp) -> ApiResponse<Outcome> {
    let UiMode::NamingJob { draft } = &app.mode else {
        return ApiResponse::err("No job name is being edited");
    };
    let draft = draft.clone();
    app.logger.finalize_and_save_job(&draft);
    app.apply(UiEvent::ConfirmName);
    snapshot(app)
}

pub fn handle(app: &mut HeatInputApp, action: Action) -> ApiResponse<Outcome> {
    match action {
        Action::SelectProcess { name } => {
            if !app.logger.available_processes().iter().any(|p| p.name == name) {
                return ApiResponse::err(format!("Process not available: {}", name));
            }
            app.logger.select_process(&name);
            snapshot(app)
        }
        Action::SetInput { field, value } => {
            app.logger.set_input(field, value);
            snapshot(app)
        }
        Action::SetInputText { field, text } => {
            app.logger.set_input_text(field, &text);
            snapshot(app)
        }
        Action::UpdateExtended { inputs } => {
            app.logger.update_extended(|ext| *ext = inputs);
            snapshot(app)
        }
        Action::LogPass => log_pass(app),
        Action::NewJob => new_job(app),
        Action::EditJobName { name } => {
            app.apply(UiEvent::EditName { name });
            snapshot(app)
        }
        Action::SaveJobName => save_job_name(app),
        Action::CancelNaming => {
            app.apply(UiEvent::CancelNaming);
            snapshot(app)
        }
        Action::ToggleStopwatch => {
            app.logger.toggle_stopwatch();
            snapshot(app)
        }
        Action::ResetStopwatch => {
            app.logger.reset_stopwatch();
            snapshot(app)
        }
        Action::Tick => {
            app.logger.tick();
            snapshot(app)
        }
        Action::SyncStopwatch { value } => {
            app.logger.sync_stopwatch(value);
            snapshot(app)
        }
        Action::Ui { event } => {
            app.apply(event);
            snapshot(app)
        }
        Action::UpdateSettings { settings } => {
            app.logger.update_settings(|s| *s = settings);
            settings_outcome(app)
        }
        Action::ToggleProcessHidden { code } => {
            app.logger.toggle_process_hidden(&code);
            settings_outcome(app)
        }
        Action::ToggleCustomField { field } => {
            app.logger.update_settings(|s| s.toggle_custom_field(field));
            settings_outcome(app)
        }
        other => ApiResponse::err(format!("Not a session action: {:?}", other)),
    }
}

fn settings_outcome(app: &HeatInputApp) -> ApiResponse<Outcome> {
    let settings = app.logger.settings().clone();
    let active_processes = process::active_count(&settings.hidden_process_codes);
    ApiResponse::ok(Outcome::Settings {
        settings,
        active_processes,
    })
}
