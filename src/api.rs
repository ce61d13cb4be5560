use crate::constants::CHAT_ENDPOINT;
use crate::errors::{ParlanceError, ParlanceResult};
use crate::logging::{log_request, RequestLog};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

/// Wire form of the backend's reply. Failures are reported through the
/// `status`/`error` fields, not the HTTP status code.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    status: Option<String>,
    response: Option<String>,
    error: Option<String>,
}

/// HTTP client for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    client: Client,
}

impl ChatClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ParlanceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                ParlanceError::transport_error(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ChatClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Posts one user message and returns the bot's reply text.
    pub async fn send_message(&self, message: &str) -> ParlanceResult<String> {
        let url = format!("{}{}", self.base_url, CHAT_ENDPOINT);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| ParlanceError::transport_error(format!("Request failed: {}", e)))?;

        let http_status = response.status();
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParlanceError::transport_error(format!("Failed to parse response: {}", e)))?;

        log_request(&RequestLog {
            endpoint: url,
            request_summary: summarize(message),
            response_status: http_status.as_u16(),
            response_time_ms: started.elapsed().as_millis(),
        });

        if body.status.as_deref() == Some("success") {
            body.response
                .ok_or_else(|| ParlanceError::server_error("Response missing expected content"))
        } else {
            Err(ParlanceError::server_error(
                body.error
                    .unwrap_or_else(|| "Something went wrong".to_string()),
            ))
        }
    }
}

fn summarize(message: &str) -> String {
    if message.chars().count() <= 60 {
        message.to_string()
    } else {
        let head: String = message.chars().take(60).collect();
        format!("{}...", head)
    }
}
