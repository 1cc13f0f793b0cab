//! auth::delegate
//!
//! Callback-backed token acquisition.
//!
//! # Design
//!
//! Some hosts hand out token acquisition as a closure (the web stack's
//! "get an access token on behalf of the current user" delegate) rather
//! than as a long-lived service object. [`DelegatedAcquirer`] adapts such
//! a closure to the [`TokenAcquirer`] seam so the provider does not care
//! which historical integration pattern is in play.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use taskgate::auth::{DelegatedAcquirer, Token, TokenAcquirer};
//! use taskgate::core::types::{ResourceId, UserId};
//!
//! # tokio_test::block_on(async {
//! let acquirer = DelegatedAcquirer::new(|_user, resource| {
//!     let resource = resource.clone();
//!     Box::pin(async move {
//!         Ok(Some(Token::new("at", resource, Utc::now() + Duration::hours(1))))
//!     })
//! });
//!
//! let token = acquirer
//!     .acquire_silent(&UserId::new("u"), &ResourceId::new("api://tasklist"))
//!     .await
//!     .unwrap();
//! assert!(token.is_some());
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use super::cache::Token;
use super::errors::AuthError;
use super::TokenAcquirer;
use crate::core::types::{ResourceId, UserId};

/// Future type produced by an acquisition callback.
pub type AcquireFuture = Pin<Box<dyn Future<Output = Result<Option<Token>, AuthError>> + Send>>;

/// Acquisition callback signature.
pub type AcquireFn = dyn Fn(&UserId, &ResourceId) -> AcquireFuture + Send + Sync;

/// [`TokenAcquirer`] backed by a caller-supplied async callback.
pub struct DelegatedAcquirer {
    delegate: Box<AcquireFn>,
}

impl DelegatedAcquirer {
    /// Wrap an async callback as an acquisition strategy.
    pub fn new(
        delegate: impl Fn(&UserId, &ResourceId) -> AcquireFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            delegate: Box::new(delegate),
        }
    }
}

#[async_trait]
impl TokenAcquirer for DelegatedAcquirer {
    async fn acquire_silent(
        &self,
        user: &UserId,
        resource: &ResourceId,
    ) -> Result<Option<Token>, AuthError> {
        (self.delegate)(user, resource).await
    }
}

impl std::fmt::Debug for DelegatedAcquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedAcquirer").finish_non_exhaustive()
    }
}
