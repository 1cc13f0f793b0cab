//! End-to-end tests for the acquire → call → classify pipeline.
//!
//! These wire a real `TaskApiClient` (over wiremock) behind `TaskFlow`
//! with a scripted acquirer, and verify the terminal outcomes and their
//! side effects: single invalidation on 401/400, consent marker on
//! consent payloads, no cache mutation on transport faults.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use taskgate::api::TaskApiClient;
use taskgate::auth::{AuthError, SilentTokenProvider, Token, TokenAcquirer, TokenCache};
use taskgate::core::types::{NewTask, ResourceId, TaskId, UserId};
use taskgate::flow::{ConsentMarkers, FlowOutcome, TaskFlow};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mints a fresh token per call and counts round trips.
struct CountingAcquirer {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TokenAcquirer for CountingAcquirer {
    async fn acquire_silent(
        &self,
        _user: &UserId,
        resource: &ResourceId,
    ) -> Result<Option<Token>, AuthError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Token::new(
            format!("at-{}", n),
            resource.clone(),
            Utc::now() + chrono::Duration::hours(1),
        )))
    }
}

struct Harness {
    flow: TaskFlow,
    cache: TokenCache,
    acquisitions: Arc<AtomicUsize>,
    user: UserId,
    resource: ResourceId,
}

async fn harness(server: &MockServer) -> Harness {
    let cache = TokenCache::new();
    let acquisitions = Arc::new(AtomicUsize::new(0));
    let resource = ResourceId::new("api://tasklist");
    let client = TaskApiClient::new(format!("{}/tasks", server.uri()), Duration::from_secs(5))
        .expect("build client");
    let flow = TaskFlow::new(
        SilentTokenProvider::new(
            cache.clone(),
            Box::new(CountingAcquirer {
                calls: acquisitions.clone(),
            }),
        ),
        Arc::new(client),
        ConsentMarkers::new(60),
        resource.clone(),
    );
    Harness {
        flow,
        cache,
        acquisitions,
        user: UserId::new("user-1"),
        resource,
    }
}

#[tokio::test]
async fn list_end_to_end_decodes_one_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("Authorization", "Bearer at-0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"tasks":[{"id":"1","title":"A","description":"d","done":false}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let tasks = h.flow.list(&h.user).await.into_success().expect("tasks");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, Some(TaskId(1)));
    assert!(!tasks[0].done);
}

#[tokio::test]
async fn second_call_reuses_cached_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("Authorization", "Bearer at-0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"tasks":[]}"#))
        .expect(2)
        .mount(&server)
        .await;

    let h = harness(&server).await;
    assert!(h.flow.list(&h.user).await.is_success());
    assert!(h.flow.list(&h.user).await.is_success());
    assert_eq!(h.acquisitions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unauthorized_drops_token_and_reports_reauth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error": "invalid_token"}"#),
        )
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let outcome = h.flow.list(&h.user).await;

    assert_eq!(outcome, FlowOutcome::NeedsReauth);
    assert!(h.cache.lookup(&h.user, &h.resource).is_none());
    // Next user-initiated attempt acquires afresh rather than
    // replaying the rejected token.
    assert_eq!(h.acquisitions.load(Ordering::SeqCst), 1);
    h.flow.list(&h.user).await;
    assert_eq!(h.acquisitions.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn consent_payload_wins_and_sets_marker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"error":"interaction_required","error_description":"AADSTS65001: the user has not consented to use the application"}"#,
        ))
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let outcome = h.flow.list(&h.user).await;

    assert_eq!(outcome, FlowOutcome::NeedsConsent);
    assert!(h.flow.consent().is_pending(&h.user));
    // The one-shot marker is consumed by the sign-in flow.
    assert!(h.flow.consent().take(&h.user));
    assert!(!h.flow.consent().is_pending(&h.user));
}

#[tokio::test]
async fn bad_request_invalidates_without_reauth_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_request"}"#))
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let outcome = h.flow.create(&h.user, &NewTask::new("A", "d")).await;

    assert_eq!(outcome, FlowOutcome::GenericFailure("Bad Request".to_string()));
    assert!(h.cache.lookup(&h.user, &h.resource).is_none());
}

#[tokio::test]
async fn delete_result_true_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result": true}"#))
        .mount(&server)
        .await;

    let h = harness(&server).await;
    assert!(h.flow.delete(&h.user, TaskId(1)).await.is_success());
}

#[tokio::test]
async fn delete_result_false_is_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result": false}"#))
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let outcome = h.flow.delete(&h.user, TaskId(1)).await;
    assert!(matches!(outcome, FlowOutcome::GenericFailure(_)));
}

#[tokio::test]
async fn malformed_success_envelope_is_not_an_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": {}}"#))
        .mount(&server)
        .await;

    let h = harness(&server).await;
    let outcome = h.flow.get(&h.user, TaskId(1)).await;

    // 200 with a missing field classifies as generic, never as success.
    assert_eq!(outcome, FlowOutcome::GenericFailure("OK".to_string()));
    // No invalidation for a non-401/400 status.
    assert!(h.cache.lookup(&h.user, &h.resource).is_some());
}

#[tokio::test]
async fn transport_fault_mutates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"tasks": []}"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let cache = TokenCache::new();
    let acquisitions = Arc::new(AtomicUsize::new(0));
    let resource = ResourceId::new("api://tasklist");
    let client = TaskApiClient::new(format!("{}/tasks", server.uri()), Duration::from_millis(100))
        .expect("build client");
    let flow = TaskFlow::new(
        SilentTokenProvider::new(
            cache.clone(),
            Box::new(CountingAcquirer {
                calls: acquisitions,
            }),
        ),
        Arc::new(client),
        ConsentMarkers::new(60),
        resource.clone(),
    );
    let user = UserId::new("user-1");

    let outcome = flow.list(&user).await;

    assert!(matches!(outcome, FlowOutcome::GenericFailure(_)));
    // The acquired token stays cached; a timeout is not a credential problem.
    assert!(cache.lookup(&user, &resource).is_some());
    assert!(!flow.consent().is_pending(&user));
}
