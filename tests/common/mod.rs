#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use daylog::app::auth::AuthService;
use daylog::app::humanize::Locale;
use daylog::config::{AppConfig, StorageBackend};
use daylog::infra::memory_store::MemoryStore;
use daylog::AppState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

// "0123456789abcdef0123456789abcdef" (test-only key)
const TEST_PASETO_ACCESS_KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
pub const DEFAULT_PASSWORD: &str = "testpassword123";

// ---------------------------------------------------------------------------
// TestApp: one per test, each with its own in-memory store
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub access_token: String,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".into(),
        storage: StorageBackend::Memory,
        database_url: None,
        db_max_connections: 1,
        db_connect_timeout_seconds: 1,
        db_idle_timeout_seconds: 0,
        db_max_lifetime_seconds: 60,
        run_migrations: false,
        paseto_access_key: TEST_PASETO_ACCESS_KEY,
        access_ttl_minutes: 15,
        frontend_url: None,
        default_locale: Locale::En,
        body_limit_bytes: 65536,
    }
}

pub fn app() -> TestApp {
    let config = test_config();
    let state = AppState::with_store(Arc::new(MemoryStore::new()), &config);
    let router = daylog::http::router(state.clone());
    TestApp { router, state }
}

impl TestApp {
    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {}", t));
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, None, token).await
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, path, Some(body), token).await
    }

    pub async fn put_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::PUT, path, Some(body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, None, token).await
    }

    // ------------------------------------------------------------------
    // Test data helpers
    // ------------------------------------------------------------------

    /// Register a user through the auth service and issue an access token directly.
    pub async fn create_user(&self, suffix: &str) -> TestUser {
        let email = format!("test_{}@example.com", suffix);
        let auth_service = AuthService::new(
            self.state.users.clone(),
            self.state.paseto_access_key,
            self.state.access_ttl_minutes,
        );
        let user = auth_service
            .signup(&email, suffix, DEFAULT_PASSWORD)
            .await
            .expect("signup failed")
            .expect("email already taken");
        let token = auth_service
            .issue_access_token(user.id)
            .expect("issue_access_token failed");

        TestUser {
            id: user.id,
            email,
            access_token: token.token,
        }
    }

    /// Create a post via the API. Returns the post id.
    pub async fn create_post(&self, token: &str, date_time: &str, description: &str) -> Uuid {
        let resp = self
            .post_json(
                "/posts",
                json!({
                    "dateTime": date_time,
                    "description": description,
                    "duration": "30 phút",
                }),
                Some(token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.json());
        Uuid::parse_str(resp.json()["post"]["id"].as_str().unwrap()).unwrap()
    }
}
