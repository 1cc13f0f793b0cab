//! auth::provider
//!
//! Silent token provider over the session cache.
//!
//! # Design
//!
//! [`SilentTokenProvider`] sequences cache lookup and silent renewal:
//!
//! 1. Cache hit with a live token returns immediately, with no network I/O.
//! 2. Miss or expired entry delegates to the configured [`TokenAcquirer`].
//! 3. A freshly minted token is stored back before being returned.
//!
//! The contract is deliberately `Option<Token>`, never `Result`: a `None`
//! means "authentication required", not a transient fault. Interactive
//! redirects are the sign-in collaborator's concern and never happen here.
//!
//! The acquisition mechanism is pluggable. The legacy per-session
//! authentication-context pattern and the delegated-callback pattern are
//! both just [`TokenAcquirer`] implementations behind the same provider.
//!
//! # Example
//!
//! ```ignore
//! use taskgate::auth::{SilentTokenProvider, TokenCache};
//!
//! let provider = SilentTokenProvider::new(TokenCache::new(), Box::new(acquirer));
//! match provider.acquire_silently(&user, &resource).await {
//!     Some(token) => { /* issue the authenticated call */ }
//!     None => { /* redirect to sign-in */ }
//! }
//! ```

use super::cache::{Token, TokenCache};
use super::TokenAcquirer;
use crate::core::types::{ResourceId, UserId};

/// Orchestrates silent token acquisition against the session cache.
pub struct SilentTokenProvider {
    cache: TokenCache,
    acquirer: Box<dyn TokenAcquirer>,
}

impl SilentTokenProvider {
    /// Create a provider over a (possibly shared) cache and an
    /// acquisition strategy.
    pub fn new(cache: TokenCache, acquirer: Box<dyn TokenAcquirer>) -> Self {
        Self { cache, acquirer }
    }

    /// Get a valid token for `(user, resource)` without user interaction.
    ///
    /// Returns `None` when silent acquisition is not possible; the caller
    /// must treat that as "authentication required". Acquisition faults
    /// are logged, never propagated.
    pub async fn acquire_silently(&self, user: &UserId, resource: &ResourceId) -> Option<Token> {
        if let Some(token) = self.cache.lookup(user, resource) {
            return Some(token);
        }

        match self.acquirer.acquire_silent(user, resource).await {
            Ok(Some(token)) => {
                self.cache.store(user, resource, token.clone());
                Some(token)
            }
            Ok(None) => {
                tracing::debug!(user = %user, resource = %resource,
                    "silent acquisition declined; sign-in required");
                None
            }
            Err(err) => {
                tracing::warn!(user = %user, resource = %resource, error = %err,
                    "silent acquisition failed");
                None
            }
        }
    }

    /// The cache this provider stores into.
    ///
    /// Shared with the orchestrator so that classifier-driven
    /// invalidation and silent acquisition act on the same state.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Drop every cached token for `user` (sign-out).
    pub fn sign_out(&self, user: &UserId) {
        self.cache.clear(user);
    }
}

// Custom Debug to avoid exposing cached tokens.
impl std::fmt::Debug for SilentTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SilentTokenProvider")
            .field("cached_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}
