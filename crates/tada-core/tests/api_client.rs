//! Remote collection client against a mock todo service.

use std::sync::Arc;

use serde_json::json;
use tada_core::{ApiClient, ApiError, SessionStore, TodoId, TodoPatch};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with_token(server: &MockServer, token: Option<&str>) -> ApiClient {
    let session = Arc::new(SessionStore::in_memory());
    if let Some(t) = token {
        session.set_credential(t).unwrap();
    }
    ApiClient::new(&server.uri(), session)
}

#[tokio::test]
async fn test_login_stores_token_and_list_sends_it() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let login = client.login("a@b.com", "x").await.unwrap();

    assert_eq!(login.access_token, "T1");
    assert_eq!(client.session().credential().as_deref(), Some("T1"));

    let todos = client.list().await.unwrap();
    assert!(todos.is_empty());
}

#[tokio::test]
async fn test_login_persists_token_to_disk() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let session_path = temp_dir.path().join("session_token");

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "T2", "user": {"id": 7}})),
        )
        .mount(&server)
        .await;

    let session = Arc::new(SessionStore::open(&session_path).unwrap());
    let client = ApiClient::new(&server.uri(), session);
    let login = client.login("a@b.com", "x").await.unwrap();
    assert!(login.extra.contains_key("user"));

    // A fresh process picks the session back up
    let restored = SessionStore::open(&session_path).unwrap();
    assert_eq!(restored.credential().as_deref(), Some("T2"));
}

#[tokio::test]
async fn test_login_that_cannot_be_saved_stays_logged_out() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T1"})))
        .mount(&server)
        .await;

    let session = Arc::new(SessionStore::open(blocker.join("session_token")).unwrap());
    // The session directory cannot be created over a plain file
    std::fs::write(&blocker, "").unwrap();

    let client = ApiClient::new(&server.uri(), session);
    let err = client.login("a@b.com", "x").await.unwrap_err();

    assert!(!err.is_unauthorized());
    assert!(err.to_string().starts_with("Failed to save session"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_failure_uses_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad email or password"})),
        )
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let err = client.login("a@b.com", "wrong").await.unwrap_err();

    // Never Unauthorized, even on a 401
    assert!(!err.is_unauthorized());
    assert_eq!(err.to_string(), "Bad email or password");
    assert_eq!(err.http_status(), Some(401));
    assert!(client.session().credential().is_none());
}

#[tokio::test]
async fn test_login_failure_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let err = client.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
}

#[tokio::test]
async fn test_login_success_without_token_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let err = client.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
    assert!(client.session().credential().is_none());
}

#[tokio::test]
async fn test_list_unauthorized_clears_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("expired"));
    let err = client.list().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(client.session().credential().is_none());
}

#[tokio::test]
async fn test_every_operation_clears_credential_on_422() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let client = client_with_token(&server, None);
    let id = TodoId::Int(1);

    client.session().set_credential("T").unwrap();
    assert!(client.list().await.unwrap_err().is_unauthorized());
    assert!(client.session().credential().is_none());

    client.session().set_credential("T").unwrap();
    assert!(client.create("x").await.unwrap_err().is_unauthorized());
    assert!(client.session().credential().is_none());

    client.session().set_credential("T").unwrap();
    let patch = TodoPatch::completed(true);
    assert!(client.update(&id, &patch).await.unwrap_err().is_unauthorized());
    assert!(client.session().credential().is_none());

    client.session().set_credential("T").unwrap();
    assert!(client.delete(&id).await.unwrap_err().is_unauthorized());
    assert!(client.session().credential().is_none());
}

#[tokio::test]
async fn test_unauthorized_removes_persisted_token() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let session_path = temp_dir.path().join("session_token");

    Mock::given(method("DELETE"))
        .and(path("/todos/3"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = Arc::new(SessionStore::open(&session_path).unwrap());
    session.set_credential("T1").unwrap();
    let client = ApiClient::new(&server.uri(), session);

    let err = client.delete(&TodoId::Int(3)).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_other_statuses_use_operation_messages() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "database exploded"})),
        )
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    let id = TodoId::Int(1);

    let err = client.list().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch todos");
    assert_eq!(err.http_status(), Some(500));

    let err = client.create("x").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to create todo");

    let err = client.update(&id, &TodoPatch::text("y")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to update todo");

    let err = client.delete(&id).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete todo");

    // Not an auth failure, so the session survives
    assert_eq!(client.session().credential().as_deref(), Some("T1"));
}

#[tokio::test]
async fn test_forbidden_is_not_an_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    let err = client.list().await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_transport_failure_is_request_failed() {
    // Nothing listens on port 1
    let session = Arc::new(SessionStore::in_memory());
    session.set_credential("T1").unwrap();
    let client = ApiClient::new("http://127.0.0.1:1", session);

    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed { status: None, .. }));
    assert_eq!(err.to_string(), "Failed to fetch todos");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_create_sends_text_and_returns_server_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(header("Authorization", "Bearer T1"))
        .and(body_json(json!({"text": "buy milk"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 12, "text": "buy milk", "completed": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    let todo = client.create("buy milk").await.unwrap();

    assert_eq!(todo.id, TodoId::Int(12));
    assert_eq!(todo.text, "buy milk");
    assert!(!todo.completed);
}

#[tokio::test]
async fn test_update_sends_only_patched_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "text": "a", "completed": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    let todo = client
        .update(&TodoId::Int(1), &TodoPatch::completed(true))
        .await
        .unwrap();
    assert!(todo.completed);
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/todos/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    client.delete(&TodoId::from("abc")).await.unwrap();
}

#[tokio::test]
async fn test_undecodable_body_is_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("T1"));
    let err = client.list().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch todos");
    assert_eq!(err.http_status(), None);
}
