//! api::mock
//!
//! Mock task API for deterministic testing.
//!
//! # Design
//!
//! The mock stores tasks in memory, auto-assigns identifiers, and allows
//! scripting failure outcomes per operation. It records every call so
//! tests can verify the orchestrator's sequencing (e.g. exactly one call,
//! no automatic retry).
//!
//! # Example
//!
//! ```
//! use taskgate::api::mock::MockTaskApi;
//! use taskgate::api::TaskApi;
//! use taskgate::core::types::NewTask;
//! # use chrono::{Duration, Utc};
//! # use taskgate::auth::Token;
//! # use taskgate::core::types::ResourceId;
//!
//! # tokio_test::block_on(async {
//! let api = MockTaskApi::new();
//! # let token = Token::new("at", ResourceId::new("r"), Utc::now() + Duration::hours(1));
//!
//! let task = api.create(&token, &NewTask::new("A", "d")).await.decoded().unwrap();
//! assert!(task.is_persisted());
//!
//! let tasks = api.list(&token).await.decoded().unwrap();
//! assert_eq!(tasks.len(), 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::outcome::{ApiOutcome, RawResponse, TransportError};
use super::TaskApi;
use crate::auth::Token;
use crate::core::types::{NewTask, Task, TaskId};

/// Which operation should fail, and how.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `list` with the given entity-less response.
    List(FailureKind),
    /// Fail `get` with the given entity-less response.
    Get(FailureKind),
    /// Fail `create` with the given entity-less response.
    Create(FailureKind),
    /// Fail `update` with the given entity-less response.
    Update(FailureKind),
    /// Fail `delete` with the given entity-less response.
    Delete(FailureKind),
}

/// The scripted failure outcome.
#[derive(Debug, Clone)]
pub enum FailureKind {
    /// Return `Empty` with this raw response.
    Empty(RawResponse),
    /// Return `Transport` with this error.
    Transport(TransportError),
}

impl FailureKind {
    /// Convenience: an entity-less response with a status and body.
    pub fn status(status: u16, body: &str) -> Self {
        FailureKind::Empty(RawResponse::new(status, vec![], body))
    }

    fn into_outcome<T>(self) -> ApiOutcome<T> {
        match self {
            FailureKind::Empty(raw) => ApiOutcome::Empty(raw),
            FailureKind::Transport(err) => ApiOutcome::Transport(err),
        }
    }
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    List,
    Get { id: TaskId },
    Create { title: String },
    Update { id: TaskId },
    Delete { id: TaskId },
}

#[derive(Debug, Default)]
struct MockTaskApiInner {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Mock task API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// state.
#[derive(Debug, Clone, Default)]
pub struct MockTaskApi {
    inner: Arc<Mutex<MockTaskApiInner>>,
}

impl MockTaskApi {
    /// Create an empty mock API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a failure for one operation.
    pub fn fail_on(&self, fail: FailOn) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_on = Some(fail);
        }
    }

    /// Clear any scripted failure.
    pub fn clear_failure(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_on = None;
        }
    }

    /// Seed a task directly into the store.
    pub fn seed(&self, task: Task) -> TaskId {
        let mut inner = self.inner.lock().expect("mock lock");
        let id = task.id.unwrap_or_else(|| {
            inner.next_id += 1;
            TaskId(inner.next_id)
        });
        inner.next_id = inner.next_id.max(id.0);
        inner.tasks.insert(id, Task { id: Some(id), ..task });
        id
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner
            .lock()
            .map(|inner| inner.operations.clone())
            .unwrap_or_default()
    }

    /// Number of stored tasks.
    pub fn task_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.tasks.len()).unwrap_or(0)
    }

    fn record(inner: &mut MockTaskApiInner, op: MockOperation) {
        inner.operations.push(op);
    }

    fn take_failure(
        inner: &mut MockTaskApiInner,
        matches: impl Fn(&FailOn) -> Option<FailureKind>,
    ) -> Option<FailureKind> {
        let kind = inner.fail_on.as_ref().and_then(matches);
        if kind.is_some() {
            inner.fail_on = None;
        }
        kind
    }
}

#[async_trait]
impl TaskApi for MockTaskApi {
    async fn list(&self, _token: &Token) -> ApiOutcome<Vec<Task>> {
        let mut inner = self.inner.lock().expect("mock lock");
        Self::record(&mut inner, MockOperation::List);
        if let Some(kind) = Self::take_failure(&mut inner, |f| match f {
            FailOn::List(kind) => Some(kind.clone()),
            _ => None,
        }) {
            return kind.into_outcome();
        }
        ApiOutcome::Decoded(inner.tasks.values().cloned().collect())
    }

    async fn get(&self, _token: &Token, id: TaskId) -> ApiOutcome<Task> {
        let mut inner = self.inner.lock().expect("mock lock");
        Self::record(&mut inner, MockOperation::Get { id });
        if let Some(kind) = Self::take_failure(&mut inner, |f| match f {
            FailOn::Get(kind) => Some(kind.clone()),
            _ => None,
        }) {
            return kind.into_outcome();
        }
        match inner.tasks.get(&id) {
            Some(task) => ApiOutcome::Decoded(task.clone()),
            None => ApiOutcome::Empty(RawResponse::new(404, vec![], r#"{"error": "not found"}"#)),
        }
    }

    async fn create(&self, _token: &Token, task: &NewTask) -> ApiOutcome<Task> {
        let mut inner = self.inner.lock().expect("mock lock");
        Self::record(
            &mut inner,
            MockOperation::Create {
                title: task.title.clone(),
            },
        );
        if let Some(kind) = Self::take_failure(&mut inner, |f| match f {
            FailOn::Create(kind) => Some(kind.clone()),
            _ => None,
        }) {
            return kind.into_outcome();
        }
        inner.next_id += 1;
        let created = Task {
            id: Some(TaskId(inner.next_id)),
            title: task.title.clone(),
            description: task.description.clone(),
            done: task.done,
        };
        let new_id = TaskId(inner.next_id);
        inner.tasks.insert(new_id, created.clone());
        ApiOutcome::Decoded(created)
    }

    async fn update(&self, _token: &Token, id: TaskId, task: &Task) -> ApiOutcome<Task> {
        let mut inner = self.inner.lock().expect("mock lock");
        Self::record(&mut inner, MockOperation::Update { id });
        if let Some(kind) = Self::take_failure(&mut inner, |f| match f {
            FailOn::Update(kind) => Some(kind.clone()),
            _ => None,
        }) {
            return kind.into_outcome();
        }
        if !inner.tasks.contains_key(&id) {
            return ApiOutcome::Empty(RawResponse::new(404, vec![], r#"{"error": "not found"}"#));
        }
        let updated = Task {
            id: Some(id),
            ..task.clone()
        };
        inner.tasks.insert(id, updated.clone());
        ApiOutcome::Decoded(updated)
    }

    async fn delete(&self, _token: &Token, id: TaskId) -> ApiOutcome<bool> {
        let mut inner = self.inner.lock().expect("mock lock");
        Self::record(&mut inner, MockOperation::Delete { id });
        if let Some(kind) = Self::take_failure(&mut inner, |f| match f {
            FailOn::Delete(kind) => Some(kind.clone()),
            _ => None,
        }) {
            return kind.into_outcome();
        }
        ApiOutcome::Decoded(inner.tasks.remove(&id).is_some())
    }
}
