//! The pass-logging state machine.
//!
//! `PassLogger` owns the session state, turns the current inputs into
//! `WeldPass` records and keeps the active job pointer consistent with
//! the job store. Persistence is best effort: a failed write is logged
//! and the in-memory session carries on.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info_span;

use crate::calc::{self, Calculation, Measurements};
use crate::model::{WeldJob, WeldPass};
use crate::process::{self, ExtendedField, WeldingProcess};
use crate::sanitize;
use crate::settings::{PreferenceStore, Settings};
use crate::store::JobStore;

use super::clock::{epoch_secs, Clock};
use super::mode::{InputField, JobPhase};
use super::state::{ExtendedInputs, SessionState};

/// Name given to a job nobody named, e.g. `Job 17 Oct 14:05`.
pub fn default_job_name(now: DateTime<Utc>) -> String {
    format!("Job {}", now.format("%-d %b %H:%M"))
}

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

pub struct PassLogger {
    store: JobStore,
    prefs: Arc<dyn PreferenceStore>,
    clock: Arc<dyn Clock>,
    state: SessionState,
    settings: Settings,
}

impl PassLogger {
    /// Loads the persisted session and repairs the active job pointer.
    pub fn new(store: JobStore, prefs: Arc<dyn PreferenceStore>, clock: Arc<dyn Clock>) -> Self {
        let state = SessionState::load(prefs.as_ref());
        let settings = Settings::load(prefs.as_ref());
        let mut logger = Self {
            store,
            prefs,
            clock,
            state,
            settings,
        };
        logger.restore_on_launch();
        logger
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }

    /// Writes the session back, with the stored k matching the one in effect.
    fn persist(&mut self) {
        self.state.efficiency = self.efficiency();
        self.state.save(self.prefs.as_ref());
    }

    // ─── Reads ──────────────────────────────────────────────────────────

    pub fn current_process(&self) -> &'static WeldingProcess {
        process::resolve(&self.state.process_name)
    }

    /// k-factor in effect for the next pass.
    pub fn efficiency(&self) -> f64 {
        calc::efficiency_for(self.current_process(), self.state.extended.arc_energy_override)
    }

    pub fn is_arc_energy_mode(&self) -> bool {
        self.state.extended.arc_energy_override || self.current_process().is_arc_energy()
    }

    /// Inputs as the next pass would see them. A running stopwatch
    /// supplies the travel time, whether or not a tick has refreshed the
    /// time input yet.
    pub fn pending_measurements(&self) -> Measurements {
        let mut measurements = self.state.inputs.measurements();
        if self.state.stopwatch.running {
            measurements.travel_time = calc::parse_decimal(&InputField::Time.format(self.elapsed()));
        }
        measurements
    }

    /// Live result for the current inputs.
    pub fn preview(&self) -> Calculation {
        self.pending_measurements().calculate(self.efficiency())
    }

    pub fn job_phase(&self) -> JobPhase {
        match &self.state.active_job_id {
            Some(job_id) => JobPhase::ActiveJob {
                job_id: job_id.clone(),
                pass_counter: self.state.pass_counter,
            },
            None => JobPhase::NoActiveJob,
        }
    }

    pub fn available_processes(&self) -> Vec<&'static WeldingProcess> {
        process::available_processes(&self.settings.hidden_process_codes)
    }

    /// Extended fields recorded with the next pass. Empty when extended
    /// data is switched off.
    pub fn visible_fields(&self) -> Vec<ExtendedField> {
        if !self.settings.extended_data_enabled {
            return Vec::new();
        }
        process::visible_fields(
            self.current_process(),
            self.settings.field_visibility,
            &self.settings.custom_fields,
        )
    }

    /// Stopwatch reading at the current time.
    pub fn elapsed(&self) -> f64 {
        self.state.stopwatch.elapsed(epoch_secs(self.now()))
    }

    // ─── Input edits ────────────────────────────────────────────────────

    /// Selects a process by name and seeds its default voltage and
    /// amperage. Returns false for an unknown name.
    pub fn select_process(&mut self, name: &str) -> bool {
        let Some(selected) = process::find_by_name(name) else {
            log::warn!("Unknown welding process '{}'", name);
            return false;
        };
        self.state.process_name = selected.name.to_string();
        if selected.default_voltage > 0.0 {
            self.state.inputs.voltage = InputField::Voltage.format(selected.default_voltage);
        }
        if selected.default_amperage > 0.0 {
            self.state.inputs.amperage = InputField::Amperage.format(selected.default_amperage);
        }
        self.persist();
        true
    }

    /// Sets a core input from the drawer, clamped and rounded to the
    /// field precision.
    pub fn set_input(&mut self, field: InputField, value: f64) {
        let text = field.format(value);
        if field == InputField::Time {
            self.state.stopwatch.sync(calc::parse_decimal(&text));
        }
        self.state.inputs.set(field, text);
        self.persist();
    }

    /// Sets a core input from the keyboard, as typed.
    pub fn set_input_text(&mut self, field: InputField, text: &str) {
        self.state.inputs.set(field, text.to_string());
        self.persist();
    }

    pub fn update_extended<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut ExtendedInputs),
    {
        edit(&mut self.state.extended);
        self.persist();
    }

    pub fn set_job_name_draft(&mut self, name: &str) {
        self.state.job_name_draft = name.to_string();
    }

    /// Reloads the draft from the stored name of the active job, which
    /// may have been edited from the job history. Returns the draft.
    pub fn refresh_job_name(&mut self) -> String {
        if let Some(id) = &self.state.active_job_id {
            match self.store.find_job(id) {
                Ok(Some(job)) => self.state.job_name_draft = job.name,
                Ok(None) => log::warn!("Active job {} not found, keeping name draft", id),
                Err(e) => log::error!("Failed to look up active job {}: {}", id, e),
            }
        }
        self.state.job_name_draft.clone()
    }

    // ─── Job lifecycle ──────────────────────────────────────────────────

    /// Returns the id of the job the next pass goes into, creating the
    /// job first when none is active or the pointer is stale.
    fn ensure_active_job(&mut self, now: DateTime<Utc>) -> String {
        if let Some(id) = &self.state.active_job_id {
            match self.store.find_job(id) {
                Ok(Some(_)) => return id.clone(),
                Ok(None) => log::warn!("Active job {} no longer exists, starting a new one", id),
                Err(e) => {
                    log::error!("Failed to look up active job {}: {}", id, e);
                    return id.clone();
                }
            }
            self.state.pass_counter = 1;
        }

        let draft = self.state.job_name_draft.trim();
        let name = if draft.is_empty() {
            default_job_name(now)
        } else {
            draft.to_string()
        };
        let job = WeldJob::new(&name, now);
        if let Err(e) = self.store.insert_job(&job) {
            log::error!("Failed to save new job {}: {}", job.id, e);
        }
        self.state.job_name_draft = job.name.clone();
        self.state.active_job_id = Some(job.id.clone());
        job.id
    }

    /// Records the current inputs as the next pass of the active job.
    pub fn log_pass(&mut self) -> WeldPass {
        let now = self.now();
        let _span = info_span!(
            "log_pass",
            pass_number = self.state.pass_counter,
            job = %sanitize::hash_name(&self.state.job_name_draft),
        )
        .entered();

        if self.state.stopwatch.running {
            self.state.stopwatch.stop(epoch_secs(now));
            self.state.inputs.time = InputField::Time.format(self.state.stopwatch.accumulated);
        }

        let job_id = self.ensure_active_job(now);
        let selected = self.current_process();
        let measurements = self.state.inputs.measurements();
        let result = measurements.calculate(self.efficiency());

        let pass = WeldPass {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job_id.clone(),
            name: format!("Pass #{}", self.state.pass_counter),
            timestamp: now,
            voltage: positive(measurements.voltage),
            amperage: positive(measurements.amperage),
            travel_time_seconds: positive(measurements.travel_time),
            weld_length_millimeters: positive(measurements.weld_length),
            heat_input_kj_per_mm: result.heat_input,
            efficiency_factor_used: result.efficiency_factor,
            is_arc_energy_mode: self.is_arc_energy_mode(),
            process_name: selected.name.to_string(),
            saved_travel_speed: positive(result.travel_speed),
            details: self.state.extended.redact(&self.visible_fields()),
        };

        if let Err(e) = self.store.append_pass(&pass) {
            log::error!("Failed to save {} for job {}: {}", pass.name, job_id, e);
        }
        if let Err(e) = self.store.touch_job(&job_id, now) {
            log::error!("Failed to update date of job {}: {}", job_id, e);
        }
        log::info!(
            "Logged {} for job {}: {:.3} kJ/mm (k={})",
            pass.name,
            job_id,
            pass.heat_input_kj_per_mm,
            pass.efficiency_factor_used
        );

        self.state.pass_counter += 1;
        self.reset_stopwatch();
        pass
    }

    /// Leaves the active job. The next pass starts a new one.
    pub fn start_new_session(&mut self) {
        self.state.active_job_id = None;
        self.state.pass_counter = 1;
        self.state.job_name_draft.clear();
        self.state.extended.clear_transient();
        self.persist();
    }

    /// Saves the confirmed name on the active job and starts a new
    /// session. An empty name keeps the existing one. Returns the id of
    /// the finished job, if there was one.
    pub fn finalize_and_save_job(&mut self, name: &str) -> Option<String> {
        let finished = self.state.active_job_id.clone();
        let name = name.trim();
        if let Some(id) = &finished {
            if !name.is_empty() {
                if let Err(e) = self.store.rename_job(id, name) {
                    log::error!("Failed to rename job {}: {}", id, e);
                }
            }
            log::info!("Finished job {}", id);
        }
        self.start_new_session();
        finished
    }

    /// Drops the active job pointer if it refers to `job_id`, e.g. after
    /// the job was deleted from the history.
    pub fn forget_job(&mut self, job_id: &str) {
        if self.state.active_job_id.as_deref() == Some(job_id) {
            log::info!("Active job {} removed, starting a new session", job_id);
            self.start_new_session();
        }
    }

    /// Repairs the active job pointer after a restart.
    pub fn restore_on_launch(&mut self) -> JobPhase {
        let Some(id) = self.state.active_job_id.clone() else {
            self.state.pass_counter = 1;
            return JobPhase::NoActiveJob;
        };

        let restored = match self.store.find_job(&id) {
            Ok(Some(job)) => match self.store.pass_count(&id) {
                Ok(count) => Some((job, count)),
                Err(e) => {
                    log::error!("Failed to count passes of job {}: {}", id, e);
                    None
                }
            },
            Ok(None) => {
                log::warn!("Stored active job {} not found, clearing", id);
                None
            }
            Err(e) => {
                log::error!("Failed to restore active job {}: {}", id, e);
                None
            }
        };

        match restored {
            Some((job, count)) => {
                self.state.job_name_draft = job.name;
                self.state.pass_counter = u32::try_from(count).unwrap_or(u32::MAX - 1) + 1;
            }
            None => {
                self.state.active_job_id = None;
                self.state.pass_counter = 1;
            }
        }
        self.persist();
        self.job_phase()
    }

    // ─── Stopwatch ──────────────────────────────────────────────────────

    /// Starts or stops the stopwatch. Stopping writes the measured time
    /// into the time input, unless no time passed since the start.
    pub fn toggle_stopwatch(&mut self) {
        let now = epoch_secs(self.now());
        let before = self.state.stopwatch.accumulated;
        self.state.stopwatch.toggle(now);
        let stopwatch = self.state.stopwatch;
        if !stopwatch.running && stopwatch.accumulated != before {
            self.state.inputs.time = InputField::Time.format(stopwatch.accumulated);
        }
        self.persist();
    }

    pub fn reset_stopwatch(&mut self) {
        self.state.stopwatch.reset();
        self.state.inputs.time = "0".to_string();
        self.persist();
    }

    /// Display refresh while the stopwatch runs. Mirrors the elapsed time
    /// into the time input and returns it.
    pub fn tick(&mut self) -> f64 {
        if !self.state.stopwatch.running {
            return self.state.stopwatch.accumulated;
        }
        let elapsed = self.state.stopwatch.tick(epoch_secs(self.now()));
        self.state.inputs.time = InputField::Time.format(elapsed);
        if !self.state.stopwatch.running {
            self.persist();
        }
        elapsed
    }

    /// Manual entry of the elapsed value from the drawer.
    pub fn sync_stopwatch(&mut self, value: f64) {
        self.state.stopwatch.sync(value);
        if !self.state.stopwatch.running {
            self.state.inputs.time = InputField::Time.format(self.state.stopwatch.accumulated);
        }
        self.persist();
    }

    // ─── Settings ───────────────────────────────────────────────────────

    /// Applies a settings edit and persists it. If the selected process
    /// became hidden, arc energy is selected instead.
    pub fn update_settings<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Settings),
    {
        edit(&mut self.settings);
        self.settings.save(self.prefs.as_ref());

        let selected = self.current_process();
        let still_available = self
            .available_processes()
            .iter()
            .any(|p| p.name == selected.name);
        if !still_available {
            self.state.process_name = process::arc_energy().name.to_string();
            self.persist();
        }
    }

    pub fn toggle_process_hidden(&mut self, code: &str) {
        self.update_settings(|s| {
            s.hidden_process_codes = process::toggle_hidden(&s.hidden_process_codes, code);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::session::ManualClock;
    use crate::settings::MemoryPreferences;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 14, 5, 0).unwrap()
    }

    fn logger() -> (PassLogger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = JobStore::new(Database::open_in_memory().unwrap());
        let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::new());
        (PassLogger::new(store, prefs, clock.clone()), clock)
    }

    fn fill_inputs(logger: &mut PassLogger) {
        logger.set_input_text(InputField::Voltage, "24");
        logger.set_input_text(InputField::Amperage, "200");
        logger.set_input_text(InputField::Time, "30");
        logger.set_input_text(InputField::Length, "150");
    }

    #[test]
    fn test_default_job_name() {
        assert_eq!(default_job_name(start()), "Job 17 Oct 14:05");
    }

    #[test]
    fn test_select_process_seeds_defaults() {
        let (mut logger, _) = logger();
        assert!(logger.select_process("MAG welding"));
        assert_eq!(logger.efficiency(), 0.8);
        assert!(!logger.state().inputs.voltage.is_empty());
        assert!(!logger.select_process("Laser"));
        assert_eq!(logger.current_process().name, "MAG welding");
    }

    #[test]
    fn test_arc_override_forces_unit_k() {
        let (mut logger, _) = logger();
        logger.select_process("TIG welding");
        assert_eq!(logger.efficiency(), 0.6);
        logger.update_extended(|e| e.arc_energy_override = true);
        assert_eq!(logger.efficiency(), 1.0);
        assert!(logger.is_arc_energy_mode());
    }

    #[test]
    fn test_log_pass_example() {
        let (mut logger, _) = logger();
        logger.select_process("MAG welding");
        fill_inputs(&mut logger);
        let pass = logger.log_pass();
        assert!((pass.heat_input_kj_per_mm - 0.768).abs() < 1e-9);
        assert_eq!(pass.saved_travel_speed, Some(300.0));
        assert_eq!(pass.name, "Pass #1");
        assert!(!pass.is_arc_energy_mode);
        assert_eq!(logger.state().inputs.time, "0");
        assert_eq!(logger.state().pass_counter, 2);
    }

    #[test]
    fn test_log_pass_creates_one_job() {
        let (mut logger, clock) = logger();
        fill_inputs(&mut logger);
        let first = logger.log_pass();
        clock.advance_secs(60.0);
        fill_inputs(&mut logger);
        let second = logger.log_pass();
        assert_eq!(first.job_id, second.job_id);
        assert_eq!(logger.store().list_jobs(&Default::default()).unwrap().len(), 1);
        let job = logger.store().find_job(&first.job_id).unwrap().unwrap();
        assert_eq!(job.name, "Job 17 Oct 14:05");
        assert_eq!(job.date, second.timestamp);
    }

    #[test]
    fn test_log_pass_folds_running_stopwatch() {
        let (mut logger, clock) = logger();
        fill_inputs(&mut logger);
        logger.toggle_stopwatch();
        clock.advance_secs(42.4);
        let pass = logger.log_pass();
        assert_eq!(pass.travel_time_seconds, Some(42.0));
        assert!(!logger.state().stopwatch.running);
        assert_eq!(logger.state().stopwatch.accumulated, 0.0);
    }

    #[test]
    fn test_absent_core_values_are_none() {
        let (mut logger, _) = logger();
        logger.set_input_text(InputField::Voltage, "24");
        logger.set_input_text(InputField::Length, "abc");
        let pass = logger.log_pass();
        assert_eq!(pass.voltage, Some(24.0));
        assert_eq!(pass.amperage, None);
        assert_eq!(pass.weld_length_millimeters, None);
        assert_eq!(pass.heat_input_kj_per_mm, 0.0);
        assert_eq!(pass.saved_travel_speed, None);
    }

    #[test]
    fn test_extended_data_only_when_enabled() {
        let (mut logger, _) = logger();
        logger.select_process("MAG welding");
        fill_inputs(&mut logger);
        logger.update_extended(|e| e.gas_type = "M21".to_string());
        assert!(logger.log_pass().details.is_empty());

        logger.update_settings(|s| s.extended_data_enabled = true);
        fill_inputs(&mut logger);
        let pass = logger.log_pass();
        assert_eq!(pass.details.gas_type.as_deref(), Some("M21"));
    }

    #[test]
    fn test_finalize_renames_and_resets() {
        let (mut logger, _) = logger();
        fill_inputs(&mut logger);
        let pass = logger.log_pass();
        let finished = logger.finalize_and_save_job("  Flange A ");
        assert_eq!(finished.as_deref(), Some(pass.job_id.as_str()));
        assert_eq!(logger.job_phase(), JobPhase::NoActiveJob);
        assert_eq!(logger.state().pass_counter, 1);
        let job = logger.store().find_job(&pass.job_id).unwrap().unwrap();
        assert_eq!(job.name, "Flange A");
    }

    #[test]
    fn test_finalize_with_empty_name_keeps_existing() {
        let (mut logger, _) = logger();
        logger.set_job_name_draft("Girder");
        fill_inputs(&mut logger);
        let pass = logger.log_pass();
        logger.finalize_and_save_job("   ");
        let job = logger.store().find_job(&pass.job_id).unwrap().unwrap();
        assert_eq!(job.name, "Girder");
    }

    #[test]
    fn test_hiding_selected_process_falls_back() {
        let (mut logger, _) = logger();
        logger.select_process("TIG welding");
        logger.toggle_process_hidden("141");
        assert!(logger.current_process().is_arc_energy());
        assert_eq!(logger.available_processes().len(), process::PROCESSES.len() - 1);
    }

    #[test]
    fn test_preview_uses_running_stopwatch_without_tick() {
        let (mut logger, clock) = logger();
        fill_inputs(&mut logger);
        logger.set_input_text(InputField::Time, "0");
        logger.toggle_stopwatch();
        clock.advance_secs(30.2);

        assert_eq!(logger.state().inputs.time, "0");
        assert_eq!(logger.pending_measurements().travel_time, 30.0);
        assert!(logger.preview().heat_input > 0.0);
    }

    #[test]
    fn test_refresh_job_name_follows_store() {
        let (mut logger, _) = logger();
        fill_inputs(&mut logger);
        let pass = logger.log_pass();
        logger.store().rename_job(&pass.job_id, "Spool 7").unwrap();
        assert_eq!(logger.state().job_name_draft, "Job 17 Oct 14:05");

        assert_eq!(logger.refresh_job_name(), "Spool 7");
        assert_eq!(logger.state().job_name_draft, "Spool 7");
    }

    #[test]
    fn test_zero_length_stopwatch_cycle_keeps_typed_time() {
        let (mut logger, _) = logger();
        logger.set_input(InputField::Time, 1500.0);
        assert_eq!(logger.state().inputs.time, "1500");
        logger.toggle_stopwatch();
        logger.toggle_stopwatch();
        assert_eq!(logger.state().inputs.time, "1500");
    }

    #[test]
    fn test_stored_efficiency_matches_effective_k() {
        let clock = Arc::new(ManualClock::new(start()));
        let store = JobStore::new(Database::open_in_memory().unwrap());
        let prefs = Arc::new(MemoryPreferences::new());
        let mut logger = PassLogger::new(store, prefs.clone(), clock);

        logger.select_process("TIG welding");
        assert_eq!(logger.state().efficiency, 0.6);
        logger.update_extended(|e| e.arc_energy_override = true);
        assert_eq!(logger.state().efficiency, 1.0);
        assert_eq!(prefs.get("heat_efficiency").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_tick_mirrors_elapsed_into_time_input() {
        let (mut logger, clock) = logger();
        logger.toggle_stopwatch();
        clock.advance_secs(12.2);
        assert!((logger.tick() - 12.2).abs() < 1e-4);
        assert_eq!(logger.state().inputs.time, "12");
        clock.advance_secs(2000.0);
        assert_eq!(logger.tick(), 999.0);
        assert!(!logger.state().stopwatch.running);
    }
}
