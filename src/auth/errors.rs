//! auth::errors
//!
//! Authentication error types.
//!
//! # Design
//!
//! Error messages MUST NOT contain token material. All variants carry
//! identifiers or backend messages only, never credentials.
//!
//! # Example
//!
//! ```
//! use taskgate::auth::AuthError;
//!
//! let err = AuthError::NotAuthenticated("user-42".to_string());
//! assert!(err.to_string().contains("user-42"));
//! ```

use thiserror::Error;

/// Errors from token acquisition.
///
/// These surface from [`TokenAcquirer`] implementations. The
/// [`SilentTokenProvider`] absorbs them: its contract is `Option<Token>`,
/// never an error, so acquisition failures are logged and treated as
/// "authentication required".
///
/// [`TokenAcquirer`]: crate::auth::TokenAcquirer
/// [`SilentTokenProvider`]: crate::auth::SilentTokenProvider
#[derive(Debug, Error)]
pub enum AuthError {
    /// No established session exists for this user.
    #[error("no authentication session for user '{0}'")]
    NotAuthenticated(String),

    /// The session's refresh credential has expired; silent renewal is
    /// impossible and the user must sign in interactively.
    #[error("authentication expired for resource '{0}'")]
    Expired(String),

    /// The identity backend rejected the silent acquisition attempt.
    #[error("silent token acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// Network error while talking to the identity backend.
    #[error("network error: {0}")]
    Network(String),

    /// Internal error (should not happen).
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error means the user must re-authenticate
    /// interactively (as opposed to a transient infrastructure fault).
    pub fn needs_interactive_sign_in(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated(_) | AuthError::Expired(_)
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::AcquisitionFailed(err.to_string())
    }
}
