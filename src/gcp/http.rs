//! HTTP utilities for GCP REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Maximum length of an upstream error message surfaced to the user
const MAX_ERROR_MESSAGE_LENGTH: usize = 300;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = floor_char_boundary(body, MAX_LOG_BODY_LENGTH);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Pull `error.message` out of a Google API error body
fn upstream_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?;
    Some(
        message
            .chars()
            .filter(|c| !c.is_control())
            .take(MAX_ERROR_MESSAGE_LENGTH)
            .collect(),
    )
}

/// Short remediation hint for common failure statuses
pub fn hint_for_status(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        401 => Some("Authentication failed. Run 'gcloud auth application-default login'."),
        403 => Some("Permission denied. The caller needs cloudasset.assets.listResource on the scope."),
        404 => Some("Scope not found. Check the project, folder or organization ID."),
        429 => Some("Rate limit exceeded. Please try again later."),
        500..=599 => Some("GCP service temporarily unavailable. Please try again."),
        _ => None,
    }
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone, Debug)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("gcpri/{}", crate::VERSION))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to a GCP API and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url, token: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));

            let mut message = format!("API request failed: {}", status);
            if let Some(upstream) = upstream_error_message(&body) {
                message.push_str(" - ");
                message.push_str(&upstream);
            }
            if let Some(hint) = hint_for_status(status) {
                message.push_str(" (");
                message.push_str(hint);
                message.push(')');
            }
            return Err(anyhow::anyhow!(message));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}
