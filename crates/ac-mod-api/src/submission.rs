//! Lifecycle of a generation request: one in flight at a time, a hard
//! client-side deadline, and exactly one terminal outcome per attempt.
//!
//! ```text
//! idle --submit--> submitting --ok--> succeeded --> idle
//!                             --err/timeout--> failed --> idle
//! ```
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use ac_base::error::{NetworkError, SubmitError};
use ac_base::form::FormState;
use ac_base::request::GenerationRequest;

use crate::api::AdminClient;
use crate::types::GenerationResult;

/// Anything that can carry out a generation request.
pub trait Backend: Send + Sync + 'static {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, SubmitError>;
}

impl Backend for AdminClient {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, SubmitError> {
        AdminClient::generate(self, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(GenerationResult),
    Failed(SubmitError),
}

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// A request is already in flight; nothing happened.
    Ignored,
    /// The request passed validation and was handed to the backend.
    Sent(GenerationRequest),
    /// The attempt ended before reaching the network (validation or spawn failure).
    Finished(SubmitOutcome),
}

type Reply = Result<GenerationResult, SubmitError>;

struct InFlight {
    rx: Receiver<Reply>,
    deadline: Instant,
}

pub struct SubmissionController {
    backend: Arc<dyn Backend>,
    timeout: Duration,
    state: SubmissionState,
    in_flight: Option<InFlight>,
    last_terminal: Option<SubmissionState>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn Backend>, timeout: Duration) -> Self {
        Self { backend, timeout, state: SubmissionState::Idle, in_flight: None, last_terminal: None }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Terminal state reached by the most recent attempt.
    pub fn last_terminal(&self) -> Option<SubmissionState> {
        self.last_terminal
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start an attempt from the current form. Re-entrant calls while a
    /// request is in flight are ignored.
    pub fn submit(&mut self, form: &FormState) -> SubmitStart {
        if self.is_submitting() {
            tracing::debug!("submit ignored: a request is already in flight");
            return SubmitStart::Ignored;
        }
        self.state = SubmissionState::Submitting;

        let request = match form.build_request() {
            Ok(request) => request,
            Err(e) => return SubmitStart::Finished(self.settle(SubmitOutcome::Failed(e.into()))),
        };

        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let worker_request = request.clone();
        let spawned = thread::Builder::new().name("generate-request".to_string()).spawn(move || {
            // Receiver may be gone after a timeout; the late reply is dropped.
            let _ = tx.send(backend.generate(&worker_request));
        });
        if let Err(e) = spawned {
            let err = NetworkError::TransportFailure(format!("Failed to start request worker: {}", e));
            return SubmitStart::Finished(self.settle(SubmitOutcome::Failed(err.into())));
        }

        self.in_flight = Some(InFlight { rx, deadline: Instant::now() + self.timeout });
        SubmitStart::Sent(request)
    }

    /// Non-blocking check for a terminal outcome. Call once per loop iteration.
    pub fn poll(&mut self) -> Option<SubmitOutcome> {
        self.poll_at(Instant::now())
    }

    /// Like [`poll`](Self::poll) with an explicit clock.
    pub fn poll_at(&mut self, now: Instant) -> Option<SubmitOutcome> {
        let in_flight = self.in_flight.as_ref()?;
        let reply = match in_flight.rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) if now >= in_flight.deadline => Err(NetworkError::Timeout(self.timeout).into()),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_vanished()),
        };
        Some(self.finish(reply))
    }

    /// Block until the in-flight attempt ends (headless mode).
    pub fn wait(&mut self) -> Option<SubmitOutcome> {
        let in_flight = self.in_flight.as_ref()?;
        let remaining = in_flight.deadline.saturating_duration_since(Instant::now());
        let reply = match in_flight.rx.recv_timeout(remaining) {
            Ok(reply) => reply,
            Err(RecvTimeoutError::Timeout) => Err(NetworkError::Timeout(self.timeout).into()),
            Err(RecvTimeoutError::Disconnected) => Err(worker_vanished()),
        };
        Some(self.finish(reply))
    }

    fn finish(&mut self, reply: Reply) -> SubmitOutcome {
        self.in_flight = None;
        let outcome = match reply {
            Ok(result) => SubmitOutcome::Succeeded(result),
            Err(e) => SubmitOutcome::Failed(e),
        };
        self.settle(outcome)
    }

    /// Record the terminal state and return to idle.
    fn settle(&mut self, outcome: SubmitOutcome) -> SubmitOutcome {
        let terminal = match &outcome {
            SubmitOutcome::Succeeded(_) => SubmissionState::Succeeded,
            SubmitOutcome::Failed(_) => SubmissionState::Failed,
        };
        tracing::info!(?terminal, "generation attempt finished");
        self.last_terminal = Some(terminal);
        self.state = SubmissionState::Idle;
        outcome
    }
}

fn worker_vanished() -> SubmitError {
    NetworkError::TransportFailure("Request worker exited without a response".to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ac_base::agents::{AgentCatalog, InputField};
    use ac_base::error::ValidationError;

    fn ok_result(filename: &str) -> GenerationResult {
        GenerationResult {
            message: "done".to_string(),
            details: None,
            blog_url: None,
            filename: Some(filename.to_string()),
            filepath: None,
        }
    }

    /// Answers immediately and counts calls.
    struct Immediate {
        calls: AtomicUsize,
        reply: Reply,
    }

    impl Backend for Immediate {
        fn generate(&self, _request: &GenerationRequest) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    /// Blocks until released (or forever if never released).
    struct Gated {
        calls: AtomicUsize,
        gate: Mutex<Receiver<()>>,
    }

    impl Backend for Gated {
        fn generate(&self, _request: &GenerationRequest) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
            let _ = gate.recv();
            Ok(ok_result("late.md"))
        }
    }

    fn ready_form() -> FormState {
        let mut form = FormState::new(&AgentCatalog::default());
        form.set_value(InputField::Topic, "rust ownership");
        form
    }

    #[test]
    fn success_path_returns_to_idle() {
        let backend = Arc::new(Immediate { calls: AtomicUsize::new(0), reply: Ok(ok_result("post.md")) });
        let mut ctl = SubmissionController::new(backend.clone(), Duration::from_secs(5));

        assert!(matches!(ctl.submit(&ready_form()), SubmitStart::Sent(_)));
        assert_eq!(ctl.state(), SubmissionState::Submitting);

        let outcome = ctl.wait().unwrap();
        assert_eq!(outcome, SubmitOutcome::Succeeded(ok_result("post.md")));
        assert_eq!(ctl.state(), SubmissionState::Idle);
        assert_eq!(ctl.last_terminal(), Some(SubmissionState::Succeeded));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn server_failure_is_failed() {
        let backend = Arc::new(Immediate {
            calls: AtomicUsize::new(0),
            reply: Err(SubmitError::ServerReported("Deployment failed: no git".into())),
        });
        let mut ctl = SubmissionController::new(backend, Duration::from_secs(5));
        ctl.submit(&ready_form());
        let outcome = ctl.wait().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::ServerReported(_))));
        assert_eq!(ctl.last_terminal(), Some(SubmissionState::Failed));
        assert_eq!(ctl.state(), SubmissionState::Idle);
    }

    #[test]
    fn validation_failure_never_reaches_backend() {
        let backend = Arc::new(Immediate { calls: AtomicUsize::new(0), reply: Ok(ok_result("x")) });
        let mut ctl = SubmissionController::new(backend.clone(), Duration::from_secs(5));
        let form = FormState::new(&AgentCatalog::default());

        let start = ctl.submit(&form);
        assert_eq!(
            start,
            SubmitStart::Finished(SubmitOutcome::Failed(SubmitError::Validation(ValidationError::MissingTopic)))
        );
        assert_eq!(ctl.state(), SubmissionState::Idle);
        assert_eq!(ctl.last_terminal(), Some(SubmissionState::Failed));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(ctl.poll().is_none());
    }

    #[test]
    fn resubmit_while_in_flight_is_ignored() {
        let (release, gate) = mpsc::channel();
        let backend = Arc::new(Gated { calls: AtomicUsize::new(0), gate: Mutex::new(gate) });
        let mut ctl = SubmissionController::new(backend.clone(), Duration::from_secs(5));
        let form = ready_form();

        assert!(matches!(ctl.submit(&form), SubmitStart::Sent(_)));
        assert_eq!(ctl.submit(&form), SubmitStart::Ignored);
        assert!(ctl.poll().is_none());

        release.send(()).unwrap();
        assert!(matches!(ctl.wait(), Some(SubmitOutcome::Succeeded(_))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn silent_backend_times_out() {
        let (_release, gate) = mpsc::channel::<()>();
        let backend = Arc::new(Gated { calls: AtomicUsize::new(0), gate: Mutex::new(gate) });
        let timeout = Duration::from_millis(50);
        let mut ctl = SubmissionController::new(backend, timeout);

        ctl.submit(&ready_form());
        assert!(ctl.poll_at(Instant::now()).is_none());

        let outcome = ctl.poll_at(Instant::now() + timeout * 2).unwrap();
        match outcome {
            SubmitOutcome::Failed(e) => assert!(e.is_timeout(), "expected timeout, got {:?}", e),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(ctl.state(), SubmissionState::Idle);
        assert_eq!(ctl.last_terminal(), Some(SubmissionState::Failed));
        // Control is usable again
        assert!(!ctl.is_submitting());
    }

    #[test]
    fn blocking_wait_honours_deadline() {
        let (_release, gate) = mpsc::channel::<()>();
        let backend = Arc::new(Gated { calls: AtomicUsize::new(0), gate: Mutex::new(gate) });
        let mut ctl = SubmissionController::new(backend, Duration::from_millis(30));
        ctl.submit(&ready_form());
        let outcome = ctl.wait().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.is_timeout()));
    }
}
