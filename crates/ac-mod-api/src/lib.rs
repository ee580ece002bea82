pub mod actions;
pub mod api;
pub mod submission;
pub mod types;

pub use actions::{ActionBackend, ActionReport, ActionRunner, HelperAction};
pub use api::AdminClient;
pub use submission::{Backend, SubmissionController, SubmissionState, SubmitOutcome, SubmitStart};
pub use types::GenerationResult;
