//! Helper calls that sit next to generation: voice-over and deployment of the
//! last result, and the server launchers. Each runs on its own thread and
//! reports back through a channel; none of them affects the submission state.
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use ac_base::error::{ActionError, NetworkError};

use crate::api::AdminClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperAction {
    GenerateVoice { filename: String },
    Deploy { filename: String },
    StartServer { label: String, command: String },
    RunNgrok,
    RunMidjourney,
}

impl HelperAction {
    /// Voice-over for the last result; refused when there is none.
    pub fn generate_voice(last_result: Option<&str>) -> Result<Self, ActionError> {
        Ok(HelperAction::GenerateVoice { filename: require_result(last_result)? })
    }

    /// Deployment of the last result; refused when there is none.
    pub fn deploy(last_result: Option<&str>) -> Result<Self, ActionError> {
        Ok(HelperAction::Deploy { filename: require_result(last_result)? })
    }

    pub fn label(&self) -> String {
        match self {
            HelperAction::GenerateVoice { filename } => format!("Voice-over for {}", filename),
            HelperAction::Deploy { filename } => format!("Deploy {}", filename),
            HelperAction::StartServer { label, .. } => format!("Start {}", label),
            HelperAction::RunNgrok => "Run NGROK".to_string(),
            HelperAction::RunMidjourney => "Run Midjourney webhook server".to_string(),
        }
    }
}

fn require_result(last_result: Option<&str>) -> Result<String, ActionError> {
    last_result.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string).ok_or(ActionError::NoResult)
}

/// Anything that can perform helper actions.
pub trait ActionBackend: Send + Sync + 'static {
    fn perform(&self, action: &HelperAction) -> Result<String, ActionError>;
}

impl ActionBackend for AdminClient {
    fn perform(&self, action: &HelperAction) -> Result<String, ActionError> {
        match action {
            HelperAction::GenerateVoice { filename } => self.generate_voice(filename),
            HelperAction::Deploy { filename } => self.deploy(filename),
            HelperAction::StartServer { command, .. } => self.start_server(command),
            HelperAction::RunNgrok => self.run_ngrok(),
            HelperAction::RunMidjourney => self.run_midjourney(),
        }
    }
}

#[derive(Debug)]
pub struct ActionReport {
    pub action: HelperAction,
    pub result: Result<String, ActionError>,
}

pub struct ActionRunner {
    backend: Arc<dyn ActionBackend>,
    tx: Sender<ActionReport>,
    rx: Receiver<ActionReport>,
    pending: usize,
}

impl ActionRunner {
    pub fn new(backend: Arc<dyn ActionBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx, pending: 0 }
    }

    /// Number of actions started but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn spawn(&mut self, action: HelperAction) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let worker_action = action.clone();
        let spawned = thread::Builder::new().name("helper-action".to_string()).spawn(move || {
            let result = backend.perform(&worker_action);
            let _ = tx.send(ActionReport { action: worker_action, result });
        });
        match spawned {
            Ok(_) => self.pending += 1,
            Err(e) => {
                let err = NetworkError::TransportFailure(format!("Failed to start helper worker: {}", e));
                let _ = self.tx.send(ActionReport { action, result: Err(err.into()) });
                self.pending += 1;
            }
        }
    }

    /// Collect every finished action without blocking.
    pub fn drain(&mut self) -> Vec<ActionReport> {
        let reports: Vec<ActionReport> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(reports.len());
        reports
    }

    /// Block until one action finishes (headless mode).
    pub fn wait_one(&mut self) -> Option<ActionReport> {
        if self.pending == 0 {
            return None;
        }
        let report = self.rx.recv().ok()?;
        self.pending -= 1;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl ActionBackend for Echo {
        fn perform(&self, action: &HelperAction) -> Result<String, ActionError> {
            match action {
                HelperAction::RunNgrok => Err(ActionError::ServerReported("ngrok missing".into())),
                other => Ok(other.label()),
            }
        }
    }

    #[test]
    fn follow_on_actions_need_a_result() {
        assert_eq!(HelperAction::deploy(None), Err(ActionError::NoResult));
        assert_eq!(HelperAction::generate_voice(Some("  ")), Err(ActionError::NoResult));
        assert_eq!(
            HelperAction::deploy(Some("post.md")),
            Ok(HelperAction::Deploy { filename: "post.md".to_string() })
        );
    }

    #[test]
    fn runner_reports_each_action() {
        let mut runner = ActionRunner::new(Arc::new(Echo));
        runner.spawn(HelperAction::GenerateVoice { filename: "a.md".into() });
        runner.spawn(HelperAction::RunNgrok);
        assert_eq!(runner.pending(), 2);

        let mut reports = vec![runner.wait_one().unwrap(), runner.wait_one().unwrap()];
        reports.sort_by_key(|r| r.action.label());
        assert_eq!(runner.pending(), 0);
        assert!(runner.wait_one().is_none());

        assert_eq!(reports[0].action, HelperAction::RunNgrok);
        assert!(reports[0].result.is_err());
        assert_eq!(reports[1].result.as_deref(), Ok("Voice-over for a.md"));
    }
}
