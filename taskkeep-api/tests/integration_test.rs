/// Integration tests for the TaskKeep API
///
/// These drive the full router (middleware, extractors, handlers, workflows)
/// over in-memory stores:
/// - Registration and login
/// - Bearer token enforcement
/// - Task lifecycle and ownership isolation
/// - Error envelope and status code mapping

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Duration;
use common::{TestContext, TEST_JWT_SECRET};
use serde_json::json;
use taskkeep_shared::auth::jwt::TokenService;
use uuid::Uuid;

/// Register, log in, then walk one task through its lifecycle while a second
/// user is kept out of it
#[tokio::test]
async fn test_two_user_scenario() {
    let ctx = TestContext::new();

    let alice = ctx.signup("alice", "secret123").await;
    let task = ctx.create_task(&alice, "Buy milk", "2%").await;
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], "OPEN");

    let res = ctx
        .send(
            Method::PATCH,
            &format!("/tasks/{}/status", task_id),
            Some(&alice),
            Some(json!({ "status": "DONE" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "DONE");

    let res = ctx
        .send(Method::GET, &format!("/tasks/{}", task_id), Some(&alice), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "DONE");

    let bob = ctx.signup("bob", "hunter22").await;

    let res = ctx
        .send(Method::GET, &format!("/tasks/{}", task_id), Some(&bob), None)
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "forbidden");

    let res = ctx.send(Method::GET, "/tasks", Some(&bob), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!([]));

    let res = ctx
        .send(
            Method::PATCH,
            &format!("/tasks/{}/status", task_id),
            Some(&bob),
            Some(json!({ "status": "OPEN" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = ctx
        .send(Method::DELETE, &format!("/tasks/{}", task_id), Some(&bob), None)
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // Bob's attempts left the task untouched
    let res = ctx
        .send(Method::GET, &format!("/tasks/{}", task_id), Some(&alice), None)
        .await;
    assert_eq!(res.body["data"]["status"], "DONE");
}

#[tokio::test]
async fn test_register_response() {
    let ctx = TestContext::new();

    let res = ctx
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "secret123" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["data"]["username"], "alice");
    assert!(res.body["data"]["message"].is_string());
    assert!(res.body["timestamp"].is_string());
    assert!(res.body["data"].get("password").is_none());
    assert!(res.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_response() {
    let ctx = TestContext::new();
    ctx.register("alice", "secret123").await;

    let res = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "secret123" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["token_type"], "Bearer");
    assert_eq!(
        res.body["data"]["expires_in"],
        ctx.config.jwt.expires_in_seconds
    );
    assert!(!res.body["data"]["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::new();
    ctx.register("alice", "secret123").await;

    let res = ctx
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "another-password" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["status_code"], 409);
    assert_eq!(res.body["error"], "conflict");

    // The original password still works
    ctx.login("alice", "secret123").await;
}

#[tokio::test]
async fn test_register_validation() {
    let ctx = TestContext::new();

    let res = ctx
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "", "password": "12345" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["error"], "validation_error");

    let fields: Vec<&str> = res.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "username"]);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("alice", "secret123").await;

    let wrong_password = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong-password" })),
        )
        .await;
    let unknown_user = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "mallory", "password": "secret123" })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["error"], unknown_user.body["error"]);
    assert_eq!(wrong_password.body["message"], unknown_user.body["message"]);
    assert_eq!(wrong_password.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_does_not_apply_password_rules() {
    let ctx = TestContext::new();

    let res = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "x" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tasks_require_token() {
    let ctx = TestContext::new();

    let res = ctx.send(Method::GET, "/tasks", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["status_code"], 401);

    let res = ctx
        .send(Method::GET, "/tasks", Some("not-a-jwt"), None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            None,
            Some(json!({ "title": "t", "description": "d" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_failures_share_one_message() {
    let ctx = TestContext::new();
    ctx.register("alice", "secret123").await;

    let expired = TokenService::new(TEST_JWT_SECRET, Duration::hours(-2))
        .issue("alice")
        .unwrap();
    let forged = TokenService::new("some-other-secret-that-is-32-bytes-long", Duration::hours(1))
        .issue("alice")
        .unwrap();
    let unknown_user = TokenService::new(TEST_JWT_SECRET, Duration::hours(1))
        .issue("ghost")
        .unwrap();

    let missing = ctx.send(Method::GET, "/tasks", None, None).await;
    let mut messages = vec![missing.body["message"].clone()];

    for token in [&expired, &forged, &unknown_user] {
        let res = ctx.send(Method::GET, "/tasks", Some(token), None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        messages.push(res.body["message"].clone());
    }

    let basic = ctx
        .send_request(
            Request::builder()
                .uri("/tasks")
                .header(header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(basic.status, StatusCode::UNAUTHORIZED);
    messages.push(basic.body["message"].clone());

    assert!(messages.iter().all(|m| *m == messages[0]));
}

#[tokio::test]
async fn test_get_missing_task() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;

    let res = ctx
        .send(
            Method::GET,
            &format!("/tasks/{}", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "not_found");

    let res = ctx
        .send(Method::GET, "/tasks/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;
    let task = ctx.create_task(&token, "Buy milk", "2%").await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let res = ctx.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_null());

    let res = ctx.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_only_returns_own_tasks_in_creation_order() {
    let ctx = TestContext::new();
    let alice = ctx.signup("alice", "secret123").await;
    let bob = ctx.signup("bob", "hunter22").await;

    ctx.create_task(&alice, "first", "a").await;
    ctx.create_task(&bob, "bob's", "b").await;
    ctx.create_task(&alice, "second", "a").await;

    let res = ctx.send(Method::GET, "/tasks", Some(&alice), None).await;
    assert_eq!(res.status, StatusCode::OK);

    let titles: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[tokio::test]
async fn test_task_json_shape() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;
    let task = ctx.create_task(&token, "Buy milk", "2%").await;

    for field in [
        "id",
        "title",
        "description",
        "status",
        "owner_id",
        "created_at",
        "updated_at",
    ] {
        assert!(task.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["description"], "2%");
}

#[tokio::test]
async fn test_create_task_validation() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "", "description": "d" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["details"][0]["field"], "title");

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "x".repeat(101), "description": "d" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "x".repeat(100), "description": "d" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "t" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let res = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&token),
            Some(json!({ "title": "t", "description": "d", "owner_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_status_rejected() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;
    let task = ctx.create_task(&token, "Buy milk", "2%").await;
    let uri = format!("/tasks/{}/status", task["id"].as_str().unwrap());

    let res = ctx
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "status": "ARCHIVED" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["details"][0]["field"], "status");
}

#[tokio::test]
async fn test_status_body_checked_before_task_id() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;

    let res = ctx
        .send(
            Method::PATCH,
            "/tasks/not-a-uuid/status",
            Some(&token),
            Some(json!({ "status": "BOGUS" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["details"][0]["field"], "status");

    let res = ctx
        .send(
            Method::PATCH,
            &format!("/tasks/{}/status", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "status": "BOGUS" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let res = ctx
        .send(
            Method::PATCH,
            "/tasks/not-a-uuid/status",
            Some(&token),
            Some(json!({ "status": "DONE" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_status_transition_allowed() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice", "secret123").await;
    let task = ctx.create_task(&token, "Buy milk", "2%").await;
    let uri = format!("/tasks/{}/status", task["id"].as_str().unwrap());

    for status in ["DONE", "OPEN", "IN_PROGRESS", "IN_PROGRESS", "OPEN"] {
        let res = ctx
            .send(
                Method::PATCH,
                &uri,
                Some(&token),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["data"]["status"], status);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let res = ctx
        .send_request(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": \"alice\""))
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "bad_request");

    let res = ctx
        .send_request(
            Request::builder()
                .method(Method::POST)
                .uri("/auth/register")
                .body(Body::from("{\"username\": \"alice\", \"password\": \"secret123\"}"))
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let res = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"], "connected");
    assert!(res.body["version"].is_string());
}

#[tokio::test]
async fn test_security_headers_on_errors() {
    let ctx = TestContext::new();

    let res = ctx.send(Method::GET, "/tasks", None, None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(res.headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_cors_preflight() {
    let ctx = TestContext::new();

    let res = ctx
        .send_request(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/tasks")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_some());
}
