//! api::client
//!
//! Authenticated HTTP client for the task API.
//!
//! # Design
//!
//! The client owns one `reqwest::Client` (a process-wide connection pool,
//! safe for concurrent use by all sessions) and the API base URL. Every
//! call attaches `Authorization: Bearer <token>` and decodes the backend's
//! JSON envelope:
//!
//! | Call            | Route              | Envelope field |
//! |-----------------|--------------------|----------------|
//! | list            | `GET base`         | `tasks`        |
//! | get / create /  | `GET base/{id}`,   | `task`         |
//! | update          | `POST base`,       |                |
//! |                 | `PUT base/{id}`    |                |
//! | delete          | `DELETE base/{id}` | `result`       |
//!
//! A missing expected field on an otherwise-successful response yields
//! [`ApiOutcome::Empty`], never an entity: partial envelopes are not
//! success. Non-2xx responses and network faults never decode a body.
//!
//! The client has no side effects beyond the network call. It never
//! touches the token cache; invalidation decisions belong to the
//! classification boundary in [`crate::flow`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::outcome::{ApiOutcome, RawResponse, TransportError};
use super::TaskApi;
use crate::auth::Token;
use crate::core::config::Config;
use crate::core::types::{NewTask, Task, TaskId};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "taskgate";

/// Envelope for `GET base`.
#[derive(Debug, Deserialize)]
struct TaskListEnvelope {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

/// Envelope for single-entity responses.
#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    #[serde(default)]
    task: Option<Task>,
}

/// Envelope for `DELETE base/{id}`.
#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    #[serde(default)]
    result: Option<bool>,
}

/// Authenticated resource client for the task API.
#[derive(Debug, Clone)]
pub struct TaskApiClient {
    client: Client,
    base_url: String,
}

impl TaskApiClient {
    /// Create a client for the given collection endpoint.
    ///
    /// The per-request `timeout` doubles as the caller's deadline: a
    /// request cancelled by it reports [`TransportError::Timeout`] and
    /// mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Network` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    /// The collection endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a single task.
    fn item_url(&self, id: TaskId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Send a request with the bearer token attached and capture the
    /// response for decoding/classification.
    async fn execute(
        &self,
        request: RequestBuilder,
        token: &Token,
    ) -> Result<RawResponse, TransportError> {
        let response = request
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token.access_token()),
            )
            .send()
            .await?;
        Self::capture(response).await
    }

    /// Read a response into a [`RawResponse`].
    async fn capture(response: Response) -> Result<RawResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;
        Ok(RawResponse::new(status, headers, body))
    }

    /// Decode a captured response through an envelope type.
    ///
    /// Success status + envelope carrying the expected field → `Decoded`.
    /// Everything else → `Empty` with the raw response preserved.
    fn decode<T, E>(raw: RawResponse, extract: impl FnOnce(E) -> Option<T>) -> ApiOutcome<T>
    where
        E: DeserializeOwned,
    {
        if !raw.is_success() {
            return ApiOutcome::Empty(raw);
        }
        match serde_json::from_str::<E>(&raw.body) {
            Ok(envelope) => match extract(envelope) {
                Some(value) => ApiOutcome::Decoded(value),
                None => ApiOutcome::Empty(raw),
            },
            Err(_) => ApiOutcome::Empty(raw),
        }
    }

    /// Collapse a transport error into the outcome type.
    fn settle<T, E>(
        result: Result<RawResponse, TransportError>,
        extract: impl FnOnce(E) -> Option<T>,
    ) -> ApiOutcome<T>
    where
        E: DeserializeOwned,
    {
        match result {
            Ok(raw) => Self::decode(raw, extract),
            Err(err) => ApiOutcome::Transport(err),
        }
    }
}

#[async_trait]
impl TaskApi for TaskApiClient {
    async fn list(&self, token: &Token) -> ApiOutcome<Vec<Task>> {
        let result = self.execute(self.client.get(&self.base_url), token).await;
        Self::settle(result, |e: TaskListEnvelope| e.tasks)
    }

    async fn get(&self, token: &Token, id: TaskId) -> ApiOutcome<Task> {
        let result = self.execute(self.client.get(self.item_url(id)), token).await;
        Self::settle(result, |e: TaskEnvelope| e.task)
    }

    async fn create(&self, token: &Token, task: &NewTask) -> ApiOutcome<Task> {
        let result = self
            .execute(self.client.post(&self.base_url).json(task), token)
            .await;
        Self::settle(result, |e: TaskEnvelope| e.task)
    }

    async fn update(&self, token: &Token, id: TaskId, task: &Task) -> ApiOutcome<Task> {
        let result = self
            .execute(self.client.put(self.item_url(id)).json(task), token)
            .await;
        Self::settle(result, |e: TaskEnvelope| e.task)
    }

    async fn delete(&self, token: &Token, id: TaskId) -> ApiOutcome<bool> {
        let result = self
            .execute(self.client.delete(self.item_url(id)), token)
            .await;
        Self::settle(result, |e: ResultEnvelope| e.result)
    }
}
