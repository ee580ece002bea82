use serde::{Deserialize, Serialize};

/// Persisted mirror of the form. Values are stored as typed, so a restore
/// puts back exactly what the user left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSnapshot {
    pub agent_type: Option<String>,
    pub agent_name: Option<String>,
    pub topic: String,
    pub image_prompt: String,
    pub webhook_url: String,
    pub chaos_percentage: String,
    /// Identifier of the last successful result (filename or blog URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl FormSnapshot {
    pub fn to_json(&self) -> String {
        // Plain strings and options only; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parse a stored slot. Malformed content reads as "no snapshot".
    pub fn from_json(content: &str) -> Option<Self> {
        match serde_json::from_str(content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("discarding malformed form snapshot: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_snapshot_round_trips() {
        let snap = FormSnapshot {
            agent_type: Some("blog_artist_ai_agent".into()),
            agent_name: Some("prompt_artist".into()),
            topic: "  leftover ".into(),
            image_prompt: "a lighthouse".into(),
            webhook_url: "https://hook.example".into(),
            chaos_percentage: "25".into(),
            filename: Some("2024-01-01-lighthouse.md".into()),
        };
        assert_eq!(FormSnapshot::from_json(&snap.to_json()), Some(snap));
    }

    #[test]
    fn partial_and_garbage_slots() {
        let snap = FormSnapshot::from_json(r#"{"topic":"rust"}"#).unwrap();
        assert_eq!(snap.topic, "rust");
        assert_eq!(snap.agent_type, None);

        assert_eq!(FormSnapshot::from_json("{not json"), None);
        assert_eq!(FormSnapshot::from_json(r#"{"topic": 12}"#), None);
    }
}
