//! Common test utilities for integration tests
//!
//! Builds the real router over in-memory stores, so no database is needed:
//! - Test configuration
//! - Request helpers returning status and parsed JSON
//! - User registration and login helpers

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use taskkeep_api::app::{build_router, AppState};
use taskkeep_api::config::Config;
use taskkeep_shared::store::Stores;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Response status, headers and JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// Test context containing the router and its backing stores
pub struct TestContext {
    pub app: axum::Router,
    pub stores: Stores,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with empty in-memory stores
    pub fn new() -> Self {
        Self::with_stores(Stores::in_memory())
    }

    /// Creates a context over the given stores
    pub fn with_stores(stores: Stores) -> Self {
        let config = test_config();
        let state = AppState::new(stores.clone(), config.clone());

        TestContext {
            app: build_router(state),
            stores,
            config,
        }
    }

    /// Sends a request, with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a fully built request
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!(
                    "Expected JSON body, got {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers a user and asserts 201
    pub async fn register(&self, username: &str, password: &str) {
        let res = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
    }

    /// Logs in and returns the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.body["data"]["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Registers a user, logs in, and returns the token
    pub async fn signup(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        self.login(username, password).await
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, title: &str, description: &str) -> Value {
        let res = self
            .send(
                Method::POST,
                "/tasks",
                Some(token),
                Some(serde_json::json!({ "title": title, "description": description })),
            )
            .await;

        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body["data"].clone()
    }
}

/// Configuration for tests, independent of the process environment
pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgresql://unused/taskkeep_test"),
        ("JWT_SECRET", TEST_JWT_SECRET),
    ]);

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}
