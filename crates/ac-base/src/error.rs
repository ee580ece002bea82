use std::time::Duration;

use thiserror::Error;

use crate::agents::{AgentCategory, AgentName};

/// Local, pre-network failures. They block submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Agent '{name}' is not available for {category}")]
    NameNotInCategory { category: AgentCategory, name: AgentName },
    #[error("Topic is required for researcher agent")]
    MissingTopic,
    #[error("Webhook URL is required for artist agent")]
    MissingWebhook,
    #[error("Image prompt is required for artist agent")]
    MissingImagePrompt,
    #[error("Chaos percentage must be a whole number between 0 and 100, got '{0}'")]
    InvalidChaosPercentage(String),
}

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("Server responded with status: {0}")]
    NonOkStatus(u16),
    #[error("Request timed out after {}. Please try again.", describe_duration(.0))]
    Timeout(Duration),
    #[error("{0}")]
    TransportFailure(String),
}

/// Everything that can end a generation attempt in the `failed` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// Response parsed but carried `success: false`.
    #[error("{0}")]
    ServerReported(String),
}

/// Failures of the helper calls (deploy, voice-over, server launchers).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("{0}")]
    ServerReported(String),
    #[error("No generated result yet; run a generation first")]
    NoResult,
}

impl SubmitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SubmitError::Network(NetworkError::Timeout(_)))
    }
}

fn describe_duration(d: &Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let mins = secs / 60;
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    } else if secs > 0 {
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    } else {
        format!("{} ms", d.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_in_minutes() {
        let e = NetworkError::Timeout(Duration::from_secs(600));
        assert_eq!(e.to_string(), "Request timed out after 10 minutes. Please try again.");
    }

    #[test]
    fn timeout_message_short() {
        assert_eq!(
            NetworkError::Timeout(Duration::from_millis(50)).to_string(),
            "Request timed out after 50 ms. Please try again."
        );
        assert_eq!(
            NetworkError::Timeout(Duration::from_secs(1)).to_string(),
            "Request timed out after 1 second. Please try again."
        );
    }

    #[test]
    fn submit_error_is_transparent() {
        let e: SubmitError = ValidationError::MissingTopic.into();
        assert_eq!(e.to_string(), "Topic is required for researcher agent");
        let e: SubmitError = NetworkError::NonOkStatus(502).into();
        assert_eq!(e.to_string(), "Server responded with status: 502");
        assert!(!e.is_timeout());
    }
}
