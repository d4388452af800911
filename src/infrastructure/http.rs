//! Shared blocking HTTP plumbing for the REST adapters

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("siteforge/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn build_client(timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
}

/// A non-success response, reduced to what error mapping needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<NestedError>,
}

#[derive(Deserialize)]
struct NestedError {
    #[serde(default)]
    message: Option<String>,
}

/// Pass successful responses through; turn the rest into an `HttpFailure`
/// carrying the provider's message when the body has one.
pub fn check(response: Response) -> Result<Response, HttpFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(HttpFailure {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
    })
}

/// Extract `message` or `error.message` from a JSON error body.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or_else(|| b.error.and_then(|e| e.message)))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_top_level_message() {
        assert_eq!(
            error_message(r#"{"message":"Bad credentials"}"#, "x"),
            "Bad credentials"
        );
    }

    #[test]
    fn error_message_reads_nested_error() {
        assert_eq!(
            error_message(r#"{"error":{"code":"forbidden","message":"Not allowed"}}"#, "x"),
            "Not allowed"
        );
    }

    #[test]
    fn error_message_falls_back_for_non_json() {
        assert_eq!(error_message("<html>", "Bad Gateway"), "Bad Gateway");
    }
}
