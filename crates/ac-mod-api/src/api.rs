use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;

use ac_base::config::constants::{ACTION_TIMEOUT_SECS, GENERATE_TIMEOUT_SECS, UNKNOWN_SERVER_ERROR};
use ac_base::error::{ActionError, NetworkError, SubmitError};
use ac_base::request::GenerationRequest;

use crate::types::{ActionResponse, GenerateResponse, GenerationResult};

/// Client for the admin backend. All endpoints are same-origin relative to
/// `base_url`; no authentication is handled here.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    generate_timeout: Duration,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        Self::with_timeout(base_url, Duration::from_secs(GENERATE_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, generate_timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .build()
            .map_err(|e| NetworkError::TransportFailure(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), generate_timeout })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /generate`
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, SubmitError> {
        tracing::info!(agent_type = %request.category(), agent_name = %request.name(), "sending generate request");
        let builder = self.client.post(self.url("/generate")).json(&request.payload());
        let (status, body) = send(builder, self.generate_timeout)?;
        interpret_generate_response(status, &body)
    }

    /// `POST /deploy`
    pub fn deploy(&self, filename: &str) -> Result<String, ActionError> {
        self.post_action("/deploy", Some(serde_json::json!({ "filename": filename })))
    }

    /// `POST /generate-voice`
    pub fn generate_voice(&self, filename: &str) -> Result<String, ActionError> {
        self.post_action("/generate-voice", Some(serde_json::json!({ "filename": filename })))
    }

    /// `POST /start_server`
    pub fn start_server(&self, command: &str) -> Result<String, ActionError> {
        self.post_action("/start_server", Some(serde_json::json!({ "command": command })))
    }

    /// `POST /run-ngrok`
    pub fn run_ngrok(&self) -> Result<String, ActionError> {
        self.post_action("/run-ngrok", None)
    }

    /// `POST /run-midjourney`
    pub fn run_midjourney(&self) -> Result<String, ActionError> {
        self.post_action("/run-midjourney", None)
    }

    fn post_action(&self, path: &str, body: Option<serde_json::Value>) -> Result<String, ActionError> {
        tracing::info!(path, "sending helper request");
        let mut builder = self.client.post(self.url(path));
        if let Some(ref body) = body {
            builder = builder.json(body);
        }
        let (status, text) = send(builder, Duration::from_secs(ACTION_TIMEOUT_SECS))?;
        interpret_action_response(status, &text)
    }
}

/// Send with a per-request timeout and read the whole body.
fn send(builder: RequestBuilder, timeout: Duration) -> Result<(u16, String), NetworkError> {
    let resp = builder.timeout(timeout).send().map_err(|e| transport_error(e, timeout))?;
    let status = resp.status().as_u16();
    let body = resp.text().map_err(|e| transport_error(e, timeout))?;
    Ok((status, body))
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> NetworkError {
    if e.is_timeout() {
        NetworkError::Timeout(timeout)
    } else {
        NetworkError::TransportFailure(format!("Request failed: {}", e))
    }
}

/// Map a `/generate` status and body onto the outcome taxonomy.
pub fn interpret_generate_response(status: u16, body: &str) -> Result<GenerationResult, SubmitError> {
    if !(200..=299).contains(&status) {
        tracing::warn!(status, body = %truncate(body, 200), "generate returned non-OK status");
        return Err(NetworkError::NonOkStatus(status).into());
    }
    let resp: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| NetworkError::TransportFailure(format!("Failed to parse response: {}", e)))?;
    if resp.success {
        Ok(GenerationResult::from_response(resp))
    } else {
        Err(SubmitError::ServerReported(server_message(resp.message)))
    }
}

/// Helper endpoints answer either `{success, message}` JSON or plain text.
pub fn interpret_action_response(status: u16, body: &str) -> Result<String, ActionError> {
    if !(200..=299).contains(&status) {
        return Err(NetworkError::NonOkStatus(status).into());
    }
    match serde_json::from_str::<ActionResponse>(body) {
        Ok(ActionResponse { success: Some(false), message }) => Err(ActionError::ServerReported(server_message(message))),
        Ok(ActionResponse { message, .. }) => Ok(message.unwrap_or_else(|| "OK".to_string())),
        Err(_) => Ok(body.trim().to_string()),
    }
}

fn server_message(message: Option<String>) -> String {
    message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string())
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use ac_base::agents::AgentName;
    use serde_json::json;

    /// Answer a single request with `status` and `body`. The receiver yields
    /// the request line and the request body the server saw.
    fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header.trim().is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            let response = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            tx.send((request_line.trim_end().to_string(), String::from_utf8(payload).unwrap())).unwrap();
        });
        (format!("http://{}", addr), rx)
    }

    #[test]
    fn generate_sends_payload_and_reads_result() {
        let (url, rx) = serve_once(200, r#"{"success":true,"message":"done","filename":"cat.md"}"#);
        let client = AdminClient::new(&url).unwrap();
        let request = GenerationRequest::Artist {
            name: AgentName::PromptArtist,
            webhook_url: "http://hook".to_string(),
            image_prompt: Some("a cat".to_string()),
            chaos_percentage: Some(40),
        };

        let result = client.generate(&request).unwrap();
        assert_eq!(result.identifier(), Some("cat.md"));

        let (request_line, body) = rx.recv().unwrap();
        assert_eq!(request_line, "POST /generate HTTP/1.1");
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "agent_type": "blog_artist_ai_agent",
                "agent_name": "prompt_artist",
                "webhook_url": "http://hook",
                "chaos_percentage": 40,
                "image_prompt": "a cat"
            })
        );
    }

    #[test]
    fn generate_reports_error_status() {
        let (url, rx) = serve_once(502, "bad gateway");
        let client = AdminClient::new(&url).unwrap();
        let request = GenerationRequest::Researcher { name: AgentName::TopicResearcher, topic: "AI".to_string() };

        let err = client.generate(&request).unwrap_err();
        assert_eq!(err, SubmitError::Network(NetworkError::NonOkStatus(502)));
        let (_, body) = rx.recv().unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"agent_type": "blog_researcher_ai_agent", "agent_name": "topic_researcher", "topic": "AI"})
        );
    }

    #[test]
    fn deploy_posts_filename() {
        let (url, rx) = serve_once(200, r#"{"success":true,"message":"Deployed"}"#);
        let client = AdminClient::new(&url).unwrap();
        assert_eq!(client.deploy("cat.md").unwrap(), "Deployed");

        let (request_line, body) = rx.recv().unwrap();
        assert_eq!(request_line, "POST /deploy HTTP/1.1");
        assert_eq!(serde_json::from_str::<serde_json::Value>(&body).unwrap(), json!({"filename": "cat.md"}));
    }

    #[test]
    fn non_ok_status() {
        let err = interpret_generate_response(500, "oops").unwrap_err();
        assert_eq!(err, SubmitError::Network(NetworkError::NonOkStatus(500)));
    }

    #[test]
    fn success_false_uses_message() {
        let err = interpret_generate_response(200, r#"{"success":false,"message":"Deployment failed: git"}"#)
            .unwrap_err();
        assert_eq!(err, SubmitError::ServerReported("Deployment failed: git".to_string()));

        let err = interpret_generate_response(200, r#"{"success":false}"#).unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_SERVER_ERROR);
    }

    #[test]
    fn unparseable_body_is_transport_failure() {
        let err = interpret_generate_response(200, "<html>").unwrap_err();
        assert!(matches!(err, SubmitError::Network(NetworkError::TransportFailure(_))));
    }

    #[test]
    fn success_carries_result() {
        let result =
            interpret_generate_response(200, r#"{"success":true,"message":"ok","filename":"post.md"}"#).unwrap();
        assert_eq!(result.message, "ok");
        assert_eq!(result.identifier(), Some("post.md"));
    }

    #[test]
    fn action_plain_text_and_json() {
        assert_eq!(interpret_action_response(200, "NGROK server started\n").unwrap(), "NGROK server started");
        assert_eq!(
            interpret_action_response(200, r#"{"success":true,"message":"Started ngrok"}"#).unwrap(),
            "Started ngrok"
        );
        assert_eq!(
            interpret_action_response(200, r#"{"success":false,"message":"No command provided"}"#).unwrap_err(),
            ActionError::ServerReported("No command provided".to_string())
        );
        assert_eq!(
            interpret_action_response(404, "").unwrap_err(),
            ActionError::Network(NetworkError::NonOkStatus(404))
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = AdminClient::new("http://localhost:9229/").unwrap();
        assert_eq!(client.url("/generate"), "http://localhost:9229/generate");
    }
}
