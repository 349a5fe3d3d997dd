//! Error types for the riding-record API client.
//!
//! # Design
//! Callers see a single error kind, `ApiError`, whose only content is a
//! human-readable message. Network failures, timeouts and server-reported
//! failures all surface the same way. The cause is kept as a tagged
//! `Failure` until the last moment so that `normalize` stays a pure function
//! that can be tested without a network.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// The normalized error returned by every client operation.
///
/// `Display` prints the message verbatim so it can be shown to a user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// Why a request failed, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Server { status: u16, body: String },

    /// The request never produced a response (connect, DNS, reset, ...).
    #[error("{0}")]
    Transport(String),

    /// No response arrived within the dispatcher's budget.
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// A 2xx body that is not the JSON the operation expects.
    #[error("{0}")]
    Decode(String),

    /// The request body could not be encoded.
    #[error("{0}")]
    Encode(String),
}

#[derive(Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
}

/// Resolve a failure into the message surfaced to callers.
///
/// Precedence: the server's structured `message` field, then the
/// transport-level description, then `fallback`. Empty strings count as
/// absent at every level.
pub fn normalize(failure: &Failure, fallback: &str) -> String {
    if let Failure::Server { body, .. } = failure {
        if let Some(message) = server_message(body) {
            return message;
        }
    }
    let description = failure.to_string();
    if description.is_empty() {
        fallback.to_string()
    } else {
        description
    }
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServerErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.is_empty())
}

impl Failure {
    pub fn into_api_error(self, fallback: &str) -> ApiError {
        ApiError::new(normalize(&self, fallback))
    }
}
