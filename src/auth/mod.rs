//! auth - per-user token acquisition and caching
//!
//! This module owns the security-relevant state of the crate: which
//! access tokens exist for which `(user, resource)` pairs, and how a new
//! one is minted without user interaction.
//!
//! # Architecture
//!
//! - [`TokenCache`] - session-scoped store, one live [`Token`] per
//!   `(user, resource)` pair, atomic mutations
//! - [`TokenAcquirer`] - pluggable silent acquisition strategy
//! - [`DelegatedAcquirer`] - acquisition via a caller-supplied callback
//! - [`SilentTokenProvider`] - cache lookup with silent-renewal fallback
//!
//! The provider never performs an interactive redirect; when silent
//! acquisition is impossible it returns `None` and the caller decides to
//! send the user to sign-in.
//!
//! # Security
//!
//! Tokens never appear in logs, error messages, or debug output. Types
//! holding credentials implement custom `Debug` that redacts them, and a
//! token the backend has rejected is never reused: the orchestrator
//! invalidates its cache entry at the classification boundary.

pub mod cache;
mod delegate;
mod errors;
mod provider;

pub use cache::{Token, TokenCache, EXPIRY_BUFFER_SECS};
pub use delegate::{AcquireFn, AcquireFuture, DelegatedAcquirer};
pub use errors::AuthError;
pub use provider::SilentTokenProvider;

use crate::core::types::{ResourceId, UserId};

/// Pluggable strategy for acquiring a token without user interaction.
///
/// Implementations talk to the identity backend using whatever long-lived
/// session credential they hold. Returning `Ok(None)` means "a token
/// cannot be minted silently; the user must sign in interactively". It
/// is an expected outcome, not a fault. `Err` is reserved for
/// infrastructure failures (network, malformed backend response).
///
/// Implementations must never prompt, redirect, or block on user input.
#[async_trait::async_trait]
pub trait TokenAcquirer: Send + Sync {
    /// Attempt a silent acquisition for `(user, resource)`.
    async fn acquire_silent(
        &self,
        user: &UserId,
        resource: &ResourceId,
    ) -> Result<Option<Token>, AuthError>;
}
