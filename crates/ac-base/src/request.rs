//! Validation and assembly of the `/generate` request.

use serde::Serialize;

use crate::agents::{AgentCategory, AgentName};
use crate::error::ValidationError;

/// Raw text of the input fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub topic: String,
    pub image_prompt: String,
    pub webhook_url: String,
    pub chaos_percentage: String,
}

/// A validated generation request. One variant per category, each carrying
/// only the fields that category uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Researcher { name: AgentName, topic: String },
    Artist { name: AgentName, webhook_url: String, image_prompt: Option<String>, chaos_percentage: Option<u8> },
}

impl GenerationRequest {
    pub fn category(&self) -> AgentCategory {
        match self {
            GenerationRequest::Researcher { .. } => AgentCategory::Researcher,
            GenerationRequest::Artist { .. } => AgentCategory::Artist,
        }
    }

    pub fn name(&self) -> AgentName {
        match self {
            GenerationRequest::Researcher { name, .. } | GenerationRequest::Artist { name, .. } => *name,
        }
    }

    /// Wire form of this request.
    pub fn payload(&self) -> GeneratePayload<'_> {
        let mut payload = GeneratePayload {
            agent_type: self.category().as_str(),
            agent_name: self.name().as_str(),
            topic: None,
            webhook_url: None,
            chaos_percentage: None,
            image_prompt: None,
        };
        match self {
            GenerationRequest::Researcher { topic, .. } => payload.topic = Some(topic.as_str()),
            GenerationRequest::Artist { webhook_url, image_prompt, chaos_percentage, .. } => {
                payload.webhook_url = Some(webhook_url.as_str());
                payload.image_prompt = image_prompt.as_deref();
                payload.chaos_percentage = *chaos_percentage;
            }
        }
        payload
    }
}

/// JSON body for `POST /generate`. Absent fields are omitted, not nulled.
#[derive(Debug, Serialize)]
pub struct GeneratePayload<'a> {
    pub agent_type: &'a str,
    pub agent_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaos_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<&'a str>,
}

/// Trimmed value, or `None` when nothing but whitespace is left.
fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Validate `fields` for the given agent and assemble the request.
/// Checks run in order and the first failure wins.
pub fn build(
    category: AgentCategory,
    name: AgentName,
    fields: &FormFields,
) -> Result<GenerationRequest, ValidationError> {
    if name.category() != category {
        return Err(ValidationError::NameNotInCategory { category, name });
    }

    match category {
        AgentCategory::Researcher => {
            let topic = non_blank(&fields.topic).ok_or(ValidationError::MissingTopic)?;
            Ok(GenerationRequest::Researcher { name, topic })
        }
        AgentCategory::Artist => {
            let webhook_url = non_blank(&fields.webhook_url).ok_or(ValidationError::MissingWebhook)?;

            let image_prompt = if name == AgentName::RandomPromptArtist {
                None
            } else {
                Some(non_blank(&fields.image_prompt).ok_or(ValidationError::MissingImagePrompt)?)
            };

            let chaos_percentage = match non_blank(&fields.chaos_percentage) {
                None => None,
                Some(raw) => match raw.parse::<u8>() {
                    Ok(pct) if pct <= 100 => Some(pct),
                    _ => return Err(ValidationError::InvalidChaosPercentage(raw)),
                },
            };

            Ok(GenerationRequest::Artist { name, webhook_url, image_prompt, chaos_percentage })
        }
    }
}
