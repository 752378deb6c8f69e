//! HTTP utilities for Octopus REST API calls

use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Header carrying the Octopus API key
pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Octopus API calls
#[derive(Clone)]
pub struct OctopusHttpClient {
    client: Client,
}

impl OctopusHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("octovars/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request to the Octopus API
    pub async fn get(&self, url: &str, api_key: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only the sanitized body is logged; it may echo request details
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(status_error(status));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn status_error(status: StatusCode) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
            status: status.as_u16(),
        },
        _ => Error::Api {
            status: status.as_u16(),
        },
    }
}
