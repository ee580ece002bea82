use serde::Deserialize;

use ac_base::config::constants::DEFAULT_SUCCESS_MESSAGE;

/// Body returned by `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Body returned by the helper endpoints that answer in JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub message: String,
    pub details: Option<String>,
    pub blog_url: Option<String>,
    pub filename: Option<String>,
    pub filepath: Option<String>,
}

impl GenerationResult {
    pub fn from_response(resp: GenerateResponse) -> Self {
        Self {
            message: non_empty(resp.message).unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            details: non_empty(resp.details),
            blog_url: non_empty(resp.blog_url),
            filename: non_empty(resp.filename),
            filepath: non_empty(resp.filepath),
        }
    }

    /// Message plus details, as shown in the console.
    pub fn summary(&self) -> String {
        match &self.details {
            Some(details) => format!("{}\n\nDetails:\n{}", self.message, details),
            None => self.message.clone(),
        }
    }

    /// What the follow-on actions operate on: the generated filename when the
    /// backend reports one, otherwise the blog URL.
    pub fn identifier(&self) -> Option<&str> {
        self.filename.as_deref().or(self.blog_url.as_deref())
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
