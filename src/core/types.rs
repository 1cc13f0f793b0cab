//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`UserId`] - Identity-provider object identifier for a signed-in user
//! - [`ResourceId`] - Identifier of a downstream API a token is valid for
//! - [`TaskId`] - Backend-assigned task identifier
//! - [`Task`] - The task entity as carried in API envelopes
//! - [`NewTask`] - Create payload (no identifier yet)
//!
//! # Design
//!
//! `UserId` and `ResourceId` are opaque: the identity provider assigns
//! them and we never interpret their contents. They are compared
//! case-sensitively and used as cache keys in [`crate::auth::TokenCache`].
//!
//! A `Task` is transient. It is constructed from API responses and never
//! cached; its identity is the backend-assigned [`TaskId`], and `id: None`
//! means "not yet created".
//!
//! # Examples
//!
//! ```
//! use taskgate::core::types::{NewTask, Task, TaskId, UserId};
//!
//! let user = UserId::new("7d1f-object-id");
//! assert_eq!(user.as_str(), "7d1f-object-id");
//!
//! let draft = NewTask::new("write report", "quarterly numbers");
//! assert!(!draft.done);
//!
//! let task = Task {
//!     id: Some(TaskId(3)),
//!     title: "write report".to_string(),
//!     description: "quarterly numbers".to_string(),
//!     done: false,
//! };
//! assert!(task.is_persisted());
//! ```

use serde::{Deserialize, Serialize};

/// Opaque identifier of a signed-in user.
///
/// Corresponds to the identity provider's object identifier claim. We
/// treat it as an opaque string: no normalization, no parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier from the provider-issued claim value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a downstream resource (API) a token is scoped to.
///
/// Tokens are cached per `(UserId, ResourceId)` pair so that invalidating
/// credentials for one downstream API leaves tokens for other APIs of the
/// same user untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a resource identifier (e.g. an app-id URI).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend-assigned task identifier.
///
/// The backend emits it as a JSON number, but historical consumers carry
/// it as a string; deserialization accepts both forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl<'de> serde::Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a task id as an integer or a numeric string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<TaskId, E> {
                Ok(TaskId(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<TaskId, E> {
                i64::try_from(v)
                    .map(TaskId)
                    .map_err(|_| E::custom("task id out of range"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<TaskId, E> {
                v.parse::<i64>()
                    .map(TaskId)
                    .map_err(|_| E::custom(format!("invalid task id '{}'", v)))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task as carried in the backend's JSON envelopes.
///
/// Wire shape: `{"id": 1, "title": "...", "description": "...", "done": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned identifier; `None` until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Whether this task has been assigned an identifier by the backend.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Payload for creating a task.
///
/// Wire shape: `{"title": "...", "description": "...", "done": false}`;
/// the backend assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Completion flag (almost always false at creation).
    #[serde(default)]
    pub done: bool,
}

impl NewTask {
    /// Create a new (not yet persisted) task payload.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            done: false,
        }
    }
}
