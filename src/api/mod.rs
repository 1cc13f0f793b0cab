//! api - authenticated resource client and response classification
//!
//! # Design
//!
//! The [`TaskApi`] trait is the seam between orchestration and transport:
//! the real [`TaskApiClient`] speaks HTTP with a bearer token attached,
//! while [`mock::MockTaskApi`] provides deterministic behavior for tests.
//!
//! Calls return [`ApiOutcome`], never a bare error: a response that
//! carries no entity is preserved raw so the classification functions in
//! [`classify`] can decide what it means for the session (re-authenticate,
//! drop the cached token, renew consent, or just show an error).
//!
//! # Error Handling
//!
//! - `Decoded` - success status with a well-formed envelope
//! - `Empty` - non-success status, or success with a missing/partial
//!   envelope field; hand it to [`classify::classify`]
//! - `Transport` - network fault or deadline; safe to retry on the next
//!   user action, never retried automatically

pub mod classify;
mod client;
pub mod mock;
mod outcome;

pub use classify::{
    classify, mentions_consent, requires_token_invalidation, ClassificationVerdict,
    CONSENT_PHRASES,
};
pub use client::TaskApiClient;
pub use outcome::{ApiOutcome, RawResponse, TransportError};

use async_trait::async_trait;

use crate::auth::Token;
use crate::core::types::{NewTask, Task, TaskId};

/// CRUD surface of the task API.
///
/// Implementations attach the given token to each call and have no side
/// effects beyond the network call itself; in particular they never
/// touch the token cache.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the full task collection (`tasks` envelope).
    async fn list(&self, token: &Token) -> ApiOutcome<Vec<Task>>;

    /// Fetch a single task by id (`task` envelope).
    async fn get(&self, token: &Token, id: TaskId) -> ApiOutcome<Task>;

    /// Create a task (`task` envelope carries the persisted entity).
    async fn create(&self, token: &Token, task: &NewTask) -> ApiOutcome<Task>;

    /// Update an existing task (`task` envelope).
    async fn update(&self, token: &Token, id: TaskId, task: &Task) -> ApiOutcome<Task>;

    /// Delete a task; the `result` envelope carries the backend's verdict.
    async fn delete(&self, token: &Token, id: TaskId) -> ApiOutcome<bool>;
}
