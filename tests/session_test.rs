// Integration tests for the session refresh protocol
//
// These tests run the full pipeline (bearer attachment, 401 interception,
// refresh, replay) against a mock backend.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use policypulse_client::error::Error;
use policypulse_client::session::{CredentialStore, SessionManager};
use policypulse_client::{ClientConfig, PolicyPulse};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "email": "a@b.com",
        "name": "a",
        "role": "user",
        "status": "active",
        "subscription": { "type": "all", "status": "active" }
    })
}

fn policy_page_json() -> serde_json::Value {
    json!({
        "data": [{
            "id": "p-1",
            "title": "新能源补贴政策",
            "summary": "s",
            "region": "上海",
            "industry": "能源"
        }],
        "total": 1,
        "page": 1,
        "pageSize": 20,
        "totalPages": 1
    })
}

/// Build a client over an in-memory credential store, pointed at the
/// given mock server.
fn build_client(server_url: &str) -> PolicyPulse {
    let config = ClientConfig::new(server_url, "/tmp/unused.db").expect("config");
    let session = Arc::new(
        SessionManager::with_store(&config, CredentialStore::in_memory().expect("store"))
            .expect("session"),
    );
    PolicyPulse::with_session(config, session).expect("client")
}

async fn establish(client: &PolicyPulse, access: &str, refresh: &str) {
    let user = serde_json::from_value(user_json()).expect("user");
    client
        .session()
        .establish(access.to_string(), refresh.to_string(), user)
        .await
        .expect("establish");
}

// ==================================================================================================
// Bearer token attachment
// ==================================================================================================

#[tokio::test]
async fn test_bearer_token_attached_when_logged_in() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());
    establish(&client, "at-1", "rt-1").await;

    let mock = server
        .mock("GET", "/api/policies")
        .match_header("authorization", "Bearer at-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(policy_page_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let page = client
        .policies
        .get_policies(&policypulse_client::ListQuery::new())
        .await;

    assert_eq!(page.data.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_authorization_header_when_logged_out() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());

    let mock = server
        .mock("GET", "/api/policies")
        .match_header("authorization", Matcher::Missing)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(policy_page_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let page = client
        .policies
        .get_policies(&policypulse_client::ListQuery::new())
        .await;

    assert_eq!(page.data.len(), 1);
    mock.assert_async().await;
}

// ==================================================================================================
// Single retry after successful refresh
// ==================================================================================================

#[tokio::test]
async fn test_401_triggers_refresh_and_single_replay() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());
    establish(&client, "stale-at", "rt-1").await;

    let first = server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer stale-at")
        .with_status(401)
        .with_body(json!({ "detail": "Token expired" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .match_body(Matcher::Json(json!({ "refresh_token": "rt-1" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": "at-2" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let replay = server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer at-2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "user": user_json() }).to_string())
        .expect(1)
        .create_async()
        .await;

    // Caller observes only the final successful outcome
    let user = client.auth.current_user().await.expect("current_user");
    assert_eq!(user.email, "a@b.com");

    // Access token replaced, refresh token unchanged
    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("at-2")
    );
    assert_eq!(
        client.session().refresh_token().await.as_deref(),
        Some("rt-1")
    );

    first.assert_async().await;
    refresh.assert_async().await;
    replay.assert_async().await;
}

#[tokio::test]
async fn test_replayed_request_never_refreshes_twice() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());
    establish(&client, "stale-at", "rt-1").await;

    server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer stale-at")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": "at-2" }).to_string())
        .expect(1)
        .create_async()
        .await;

    // Backend still rejects the replayed request: the 401 surfaces as an
    // API error instead of driving a second refresh
    server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer at-2")
        .with_status(401)
        .with_body(json!({ "detail": "Could not validate credentials" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let result = client.auth.current_user().await;
    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected 401 API error, got {:?}", other.err()),
    }

    refresh.assert_async().await;
}

// ==================================================================================================
// Refresh failure clears the session
// ==================================================================================================

#[tokio::test]
async fn test_refresh_failure_clears_both_tokens() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());
    establish(&client, "stale-at", "rt-dead").await;

    server
        .mock("GET", "/api/auth/me")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .with_status(401)
        .with_body(json!({ "detail": "Invalid refresh token" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let result = client.auth.current_user().await;
    assert!(matches!(result, Err(Error::SessionExpired)));

    assert!(!client.session().is_authenticated().await);
    assert!(client.session().access_token().await.is_none());
    assert!(client.session().refresh_token().await.is_none());
    refresh.assert_async().await;

    // Subsequent requests carry no Authorization header
    let bare = server
        .mock("GET", "/api/policies")
        .match_header("authorization", Matcher::Missing)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(policy_page_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let page = client
        .policies
        .get_policies(&policypulse_client::ListQuery::new())
        .await;
    assert_eq!(page.data.len(), 1);
    bare.assert_async().await;
}

// ==================================================================================================
// Concurrent 401s share one refresh call
// ==================================================================================================

#[tokio::test]
async fn test_concurrent_401s_deduplicate_refresh() {
    let mut server = mockito::Server::new_async().await;
    let client = build_client(&server.url());
    establish(&client, "stale-at", "rt-1").await;

    server
        .mock("GET", "/api/policies")
        .match_header("authorization", "Bearer stale-at")
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    server
        .mock("GET", "/api/bids")
        .match_header("authorization", "Bearer stale-at")
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": "at-2" }).to_string())
        .expect(1)
        .create_async()
        .await;

    server
        .mock("GET", "/api/policies")
        .match_header("authorization", "Bearer at-2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(policy_page_json().to_string())
        .expect(1)
        .create_async()
        .await;

    server
        .mock("GET", "/api/bids")
        .match_header("authorization", "Bearer at-2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [{
                    "id": "b-1",
                    "title": "市政工程招标",
                    "summary": "s",
                    "region": "北京",
                    "industry": "建筑"
                }],
                "total": 1,
                "page": 1,
                "pageSize": 20,
                "totalPages": 1
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let query = policypulse_client::ListQuery::new();
    let (policies, bids) = tokio::join!(
        client.policies.get_policies(&query),
        client.policies.get_bids(&query)
    );

    assert_eq!(policies.data.len(), 1);
    assert_eq!(bids.data.len(), 1);

    // Exactly one refresh call served both 401s
    refresh.assert_async().await;
}

// ==================================================================================================
// Session persistence across client restarts
// ==================================================================================================

#[tokio::test]
async fn test_session_survives_restart() {
    let server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let store_path = dir.path().join("session.sqlite3");

    {
        let config = ClientConfig::new(&server.url(), &store_path).expect("config");
        let client = PolicyPulse::new(config).expect("client");
        establish(&client, "at-1", "rt-1").await;
    }

    let config = ClientConfig::new(&server.url(), &store_path).expect("config");
    let client = PolicyPulse::new(config).expect("client");
    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("at-1")
    );
    assert_eq!(
        client.session().current_user().await.expect("user").email,
        "a@b.com"
    );
}
