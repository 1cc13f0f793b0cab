//! api::outcome
//!
//! Structured result of an authenticated resource call.
//!
//! # Design
//!
//! Every call through the resource client lands in exactly one of three
//! buckets:
//!
//! - [`ApiOutcome::Decoded`] - success status and a well-formed envelope
//! - [`ApiOutcome::Empty`] - no entity; the raw response is preserved for
//!   the classifier (non-success status, or a success status whose
//!   envelope lacked the expected field)
//! - [`ApiOutcome::Transport`] - the request never produced a response
//!
//! Callers above the client never re-inspect raw HTTP status codes; they
//! hand an `Empty` outcome to [`crate::api::classify`] and act on the
//! verdict.

use thiserror::Error;

/// Failure before any HTTP response existed.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection-level failure (DNS, refused, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the caller's deadline.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// The parts of a response the classifier needs.
///
/// Header values that are not valid UTF-8 are dropped during capture;
/// the classifier's scan treats absence as "no match", never as an error.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as (name, value) pairs, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Response body as text (possibly empty or non-JSON).
    pub body: String,
}

impl RawResponse {
    /// Build a raw response capture.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is a 2xx success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Tagged result of a resource-client call.
#[derive(Debug, Clone)]
pub enum ApiOutcome<T> {
    /// Success status with a well-formed envelope.
    Decoded(T),
    /// No entity; raw response preserved for classification.
    Empty(RawResponse),
    /// The request failed before a response existed.
    Transport(TransportError),
}

impl<T> ApiOutcome<T> {
    /// Whether this outcome carries a decoded entity.
    pub fn is_decoded(&self) -> bool {
        matches!(self, ApiOutcome::Decoded(_))
    }

    /// The decoded entity, if any.
    pub fn decoded(self) -> Option<T> {
        match self {
            ApiOutcome::Decoded(value) => Some(value),
            _ => None,
        }
    }
}
