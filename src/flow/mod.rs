//! flow - per-use-case orchestration
//!
//! # Architecture
//!
//! One [`TaskFlow`] method per CRUD use case, each running the same
//! machine:
//!
//! ```text
//! acquire token ──none──▶ [UnableToAuthenticate]
//!      │
//!      ▼
//! call resource ──decoded──▶ [Success]
//!      │
//!      ├─empty──▶ classify ──▶ [NeedsReauth] | [NeedsConsent] | [GenericFailure]
//!      └─transport─────────▶ [GenericFailure]
//! ```
//!
//! There are no automatic retries anywhere: every failure terminates in a
//! caller-visible outcome, and a retry is a fresh user-initiated request.
//!
//! Classification and cache mutation happen exactly once, here, at the
//! boundary where an entity-less response is first inspected. The
//! (user, resource) cache entry is invalidated when the classifier says
//! the token must not be reused (401 and 400), and the consent marker is
//! set when the downstream demands a renewed grant. Transport failures
//! mutate nothing.
//!
//! The caller (the excluded web layer) maps terminal states onto its own
//! collaborators: `UnableToAuthenticate`/`NeedsReauth` become a sign-in
//! redirect, `NeedsConsent` a directive error plus the consent marker the
//! sign-in flow will consume, `GenericFailure` a rendered error.

mod consent;

pub use consent::ConsentMarkers;

use std::sync::Arc;

use crate::api::{classify, ApiOutcome, ClassificationVerdict, RawResponse, TaskApi};
use crate::auth::SilentTokenProvider;
use crate::core::types::{NewTask, ResourceId, Task, TaskId, UserId};

/// Message when silent token acquisition declines.
pub const UNABLE_TO_ACQUIRE_TOKEN: &str = "unable to acquire token";

/// Message when a call completed but produced no usable entity.
pub const NO_TASK_RETURNED: &str = "no task returned";

/// Terminal state of one use-case invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome<T> {
    /// Entity decoded and returned.
    Success(T),
    /// No silent token; the caller redirects to sign-in, typically
    /// rendering [`UNABLE_TO_ACQUIRE_TOKEN`] alongside.
    UnableToAuthenticate,
    /// Rejected credential; cache already invalidated, the caller
    /// redirects to sign-in. Never retried automatically.
    NeedsReauth,
    /// Renewed consent demanded; the marker is set, the caller shows a
    /// directive error.
    NeedsConsent,
    /// Everything else; the message is presentable as-is.
    GenericFailure(String),
}

impl<T> FlowOutcome<T> {
    /// Whether this invocation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, FlowOutcome::Success(_))
    }

    /// The decoded entity, if any.
    pub fn into_success(self) -> Option<T> {
        match self {
            FlowOutcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Orchestrates acquire → call → classify for each task use case.
pub struct TaskFlow {
    tokens: SilentTokenProvider,
    api: Arc<dyn TaskApi>,
    consent: ConsentMarkers,
    resource: ResourceId,
}

impl TaskFlow {
    /// Wire up the pipeline.
    ///
    /// The provider's cache is shared state: invalidations performed here
    /// are observed by the next acquisition.
    pub fn new(
        tokens: SilentTokenProvider,
        api: Arc<dyn TaskApi>,
        consent: ConsentMarkers,
        resource: ResourceId,
    ) -> Self {
        Self {
            tokens,
            api,
            consent,
            resource,
        }
    }

    /// The consent marker store, for the sign-in collaborator.
    pub fn consent(&self) -> &ConsentMarkers {
        &self.consent
    }

    /// The token provider, for sign-out wiring.
    pub fn tokens(&self) -> &SilentTokenProvider {
        &self.tokens
    }

    /// List all tasks.
    pub async fn list(&self, user: &UserId) -> FlowOutcome<Vec<Task>> {
        let Some(token) = self.tokens.acquire_silently(user, &self.resource).await else {
            return FlowOutcome::UnableToAuthenticate;
        };
        self.conclude(user, self.api.list(&token).await)
    }

    /// Fetch one task.
    pub async fn get(&self, user: &UserId, id: TaskId) -> FlowOutcome<Task> {
        let Some(token) = self.tokens.acquire_silently(user, &self.resource).await else {
            return FlowOutcome::UnableToAuthenticate;
        };
        self.conclude(user, self.api.get(&token, id).await)
    }

    /// Create a task.
    pub async fn create(&self, user: &UserId, task: &NewTask) -> FlowOutcome<Task> {
        let Some(token) = self.tokens.acquire_silently(user, &self.resource).await else {
            return FlowOutcome::UnableToAuthenticate;
        };
        self.conclude(user, self.api.create(&token, task).await)
    }

    /// Update a task. The task must carry its backend-assigned id.
    pub async fn update(&self, user: &UserId, task: &Task) -> FlowOutcome<Task> {
        let Some(id) = task.id else {
            return FlowOutcome::GenericFailure("task has no identifier".to_string());
        };
        let Some(token) = self.tokens.acquire_silently(user, &self.resource).await else {
            return FlowOutcome::UnableToAuthenticate;
        };
        self.conclude(user, self.api.update(&token, id, task).await)
    }

    /// Delete a task.
    ///
    /// A decoded `false` (the backend declined the delete) is a generic
    /// failure, not a success and not a crash.
    pub async fn delete(&self, user: &UserId, id: TaskId) -> FlowOutcome<()> {
        let Some(token) = self.tokens.acquire_silently(user, &self.resource).await else {
            return FlowOutcome::UnableToAuthenticate;
        };
        match self.api.delete(&token, id).await {
            ApiOutcome::Decoded(true) => FlowOutcome::Success(()),
            ApiOutcome::Decoded(false) => FlowOutcome::GenericFailure(NO_TASK_RETURNED.to_string()),
            ApiOutcome::Empty(raw) => self.settle_empty(user, raw),
            ApiOutcome::Transport(err) => FlowOutcome::GenericFailure(err.to_string()),
        }
    }

    /// Map a client outcome to a terminal state.
    fn conclude<T>(&self, user: &UserId, outcome: ApiOutcome<T>) -> FlowOutcome<T> {
        match outcome {
            ApiOutcome::Decoded(value) => FlowOutcome::Success(value),
            ApiOutcome::Empty(raw) => self.settle_empty(user, raw),
            ApiOutcome::Transport(err) => FlowOutcome::GenericFailure(err.to_string()),
        }
    }

    /// The classification boundary: cache mutation and verdict mapping.
    fn settle_empty<T>(&self, user: &UserId, raw: RawResponse) -> FlowOutcome<T> {
        if classify::requires_token_invalidation(&raw) {
            self.tokens.cache().invalidate(user, &self.resource);
        }

        match classify::classify(&raw, user) {
            ClassificationVerdict::ConsentRequired(user) => {
                self.consent.set(&user);
                FlowOutcome::NeedsConsent
            }
            ClassificationVerdict::ReauthenticateRequired => FlowOutcome::NeedsReauth,
            ClassificationVerdict::GenericError(message) => FlowOutcome::GenericFailure(message),
        }
    }
}

impl std::fmt::Debug for TaskFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFlow")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
