pub mod actions;
pub mod events;
pub mod headless;
mod run;

use std::sync::Arc;
use std::time::{Duration, Instant};

use ac_base::agents::AgentCatalog;
use ac_base::config::Settings;
use ac_base::config::constants::{DEPLOYMENT_FAILED_MARKER, GENERATE_TIMEOUT_SECS, SPINNER_FRAME_MS};
use ac_base::console::ConsoleLog;
use ac_base::error::SubmitError;
use ac_base::form::FormState;
use ac_mod_api::{ActionBackend, ActionReport, ActionRunner, Backend, SubmissionController, SubmitOutcome, SubmitStart};
use ac_mod_gallery::Gallery;

use crate::state::{UiState, View};
use crate::state::persistence::SnapshotStore;

pub use actions::Action;

/// Shown in the blocking notification when a failure mentions a deployment.
pub const DEPLOYMENT_FAILED_NOTICE: &str =
    "Deployment failed. Please check the console log for more details and ensure all required servers are running.";

pub struct App {
    pub settings: Settings,
    pub catalog: AgentCatalog,
    pub form: FormState,
    pub console: ConsoleLog,
    pub ui: UiState,
    pub controller: SubmissionController,
    pub runner: ActionRunner,
    pub gallery: Gallery,
    store: SnapshotStore,
    last_spinner: Instant,
}

impl App {
    /// Build the app around the given backends and restore the persisted form.
    pub fn new(
        settings: Settings,
        backend: Arc<dyn Backend>,
        action_backend: Arc<dyn ActionBackend>,
        store: SnapshotStore,
        gallery: Gallery,
    ) -> Self {
        let catalog = settings.catalog();
        let form = match store.load() {
            Some(snapshot) => FormState::rehydrate(&catalog, &snapshot),
            None => FormState::new(&catalog),
        };

        let mut app = Self {
            settings,
            catalog,
            form,
            console: ConsoleLog::new(),
            ui: UiState::default(),
            controller: SubmissionController::new(backend, Duration::from_secs(GENERATE_TIMEOUT_SECS)),
            runner: ActionRunner::new(action_backend),
            gallery,
            store,
            last_spinner: Instant::now(),
        };
        if let Some(result) = app.form.last_result() {
            let msg = format!("Restored last result: {}", result);
            app.console.info(msg);
        }
        app
    }

    /// Mirror the form into the snapshot slot.
    pub fn persist(&self) {
        self.store.save(&self.form.snapshot());
    }

    /// Persist and wait for the write to land (quit path).
    pub fn shutdown(&self) {
        self.persist();
        self.store.flush();
    }

    // ========================================================================
    // Generation
    // ========================================================================

    pub fn submit(&mut self) {
        if self.controller.is_submitting() {
            tracing::debug!("generate pressed while a request is in flight");
            return;
        }

        self.console.info("Starting post generation...");
        self.console.info(format!("Agent Type: {}", self.form.category()));
        self.console.info(format!("Agent Name: {}", self.form.name()));

        // The previous result no longer describes what is on screen
        self.form.set_last_result(None);
        self.persist();

        match self.controller.submit(&self.form) {
            SubmitStart::Ignored => {}
            SubmitStart::Sent(request) => {
                tracing::info!(agent_type = %request.category(), agent_name = %request.name(), "generation request sent");
                self.console.info("Sending request to server...");
            }
            SubmitStart::Finished(outcome) => self.finish_submit(outcome),
        }
        self.ui.dirty = true;
    }

    fn finish_submit(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Succeeded(result) => {
                self.console.info("Response received from server...");
                self.console.success(result.summary());
                if let Some(url) = &result.blog_url {
                    self.console.info(format!("Blog URL generated: {}", url));
                }
                self.form.set_last_result(result.identifier().map(str::to_string));
                self.persist();
            }
            SubmitOutcome::Failed(e) => {
                if matches!(e, SubmitError::ServerReported(_)) {
                    self.console.info("Response received from server...");
                }
                self.report_error(&e.to_string());
            }
        }
        self.ui.dirty = true;
    }

    fn report_error(&mut self, message: &str) {
        self.console.error(format!("Error: {}", message));
        if message.contains(DEPLOYMENT_FAILED_MARKER) {
            self.ui.notify(DEPLOYMENT_FAILED_NOTICE);
        }
    }

    // ========================================================================
    // Helper actions
    // ========================================================================

    fn report_action(&mut self, report: ActionReport) {
        match report.result {
            Ok(message) => self.console.success(format!("{}: {}", report.action.label(), message)),
            Err(e) => self.report_error(&e.to_string()),
        }
        self.ui.dirty = true;
    }

    // ========================================================================
    // Background processing
    // ========================================================================

    /// Everything that advances without user input. Called once per loop
    /// iteration with the current time.
    pub fn process_background(&mut self, now: Instant) {
        if let Some(outcome) = self.controller.poll_at(now) {
            self.finish_submit(outcome);
        }

        for report in self.runner.drain() {
            self.report_action(report);
        }

        if self.gallery.tick(now) && self.ui.view == View::Gallery {
            self.ui.dirty = true;
        }

        if self.controller.is_submitting()
            && now.saturating_duration_since(self.last_spinner) >= Duration::from_millis(SPINNER_FRAME_MS)
        {
            self.last_spinner = now;
            self.ui.advance_spinner();
        }
    }
}
