//! api::classify
//!
//! Response classification: what a failed call means for the session.
//!
//! # Design
//!
//! A single inspection point turns an entity-less response into one of
//! three verdicts:
//!
//! - [`ClassificationVerdict::ConsentRequired`] - the downstream service
//!   demands a renewed consent grant; fixing this is a one-time consent
//!   prompt, not a fresh login. Takes precedence over every status branch.
//! - [`ClassificationVerdict::ReauthenticateRequired`] - 401; the cached
//!   token is stale or rejected and the user must sign in again.
//! - [`ClassificationVerdict::GenericError`] - everything else.
//!
//! Whether the cached token must be dropped is a separate question from
//! the verdict: a 400 invalidates the token without forcing a sign-in
//! redirect, while a 401 does both. [`requires_token_invalidation`]
//! answers it so that no caller above this module ever matches on raw
//! status codes.
//!
//! The consent scan is a deliberately dumb substring heuristic over
//! third-party error payloads ([`mentions_consent`]). It is isolated here
//! so it can evolve with the backend's error format, and it is unit-tested
//! against literal payload fixtures. Garbage bodies are fine: no match is
//! the default, never an error.

use super::outcome::RawResponse;
use crate::core::types::UserId;

/// Phrases in a header or body that signal a consent problem.
///
/// Matched case-insensitively. Sourced from observed identity-provider
/// error payloads; extend as the backend's format evolves.
pub const CONSENT_PHRASES: &[&str] = &[
    "consent_required",
    "has not consented to use the application",
    "aadsts65001",
];

/// Status codes after which the cached token must not be reused.
const UNAUTHORIZED: u16 = 401;
const BAD_REQUEST: u16 = 400;

/// Tagged outcome of classification.
///
/// Drives side effects (cache invalidation, the consent marker) but never
/// carries an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationVerdict {
    /// Credential is stale or rejected; redirect to sign-in after
    /// invalidating the cached token. No automatic retry.
    ReauthenticateRequired,
    /// The downstream service requires a renewed consent grant for this
    /// user. Presentation takes precedence over re-authentication.
    ConsentRequired(UserId),
    /// Anything else; the message is the provider's reason phrase.
    GenericError(String),
}

/// Scan a response for evidence that the backend wants renewed consent.
///
/// Checks the `WWW-Authenticate` header and the body for
/// [`CONSENT_PHRASES`]. Tolerates non-JSON and malformed content.
pub fn mentions_consent(raw: &RawResponse) -> bool {
    let header = raw.header("www-authenticate").unwrap_or("");
    let header = header.to_ascii_lowercase();
    let body = raw.body.to_ascii_lowercase();

    CONSENT_PHRASES
        .iter()
        .any(|phrase| header.contains(phrase) || body.contains(phrase))
}

/// Whether the cached token for this call's resource must be dropped.
///
/// True for 401 (rejected credential) and 400 (treated as a
/// token/consent problem at this layer, not a user input problem). Both
/// branches are preserved as observed in production behavior: only the
/// 401 additionally forces a sign-in redirect.
pub fn requires_token_invalidation(raw: &RawResponse) -> bool {
    raw.status == UNAUTHORIZED || raw.status == BAD_REQUEST
}

/// Classify an entity-less response.
///
/// Precedence: consent evidence wins regardless of status; then 401 maps
/// to re-authentication; everything else is a generic error carrying the
/// status reason phrase.
pub fn classify(raw: &RawResponse, user: &UserId) -> ClassificationVerdict {
    if mentions_consent(raw) {
        tracing::debug!(user = %user, status = raw.status, "consent required by downstream");
        return ClassificationVerdict::ConsentRequired(user.clone());
    }

    if raw.status == UNAUTHORIZED {
        tracing::debug!(user = %user, "unauthorized response; re-authentication required");
        return ClassificationVerdict::ReauthenticateRequired;
    }

    ClassificationVerdict::GenericError(reason_phrase(raw.status))
}

/// Canonical reason phrase for a status code, falling back to the number.
fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
