use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// In-process stand-in for the IMA REST API. Issues `tok-<username>`
/// bearer tokens, reports a fixed role from the who-am-I endpoint and
/// counts credential-exchange attempts so tests can assert on retries.
pub struct MockApi {
    pub base_url: String,
    login_attempts: Arc<AtomicU32>,
}

impl MockApi {
    pub fn login_attempts(&self) -> u32 {
        self.login_attempts.load(Ordering::SeqCst)
    }
}

struct MockState {
    role: String,
    attempts: Arc<AtomicU32>,
}

fn router(role: &str, attempts: Arc<AtomicU32>) -> Router {
    let state = Arc::new(MockState {
        role: role.to_string(),
        attempts,
    });
    Router::new()
        .route("/auth/token", post(token))
        .route("/auth/me", get(me))
        .route("/companies/active", get(active_company))
        .with_state(state)
}

/// Starts the mock immediately on a free port.
pub async fn start_mock(role: &str) -> Result<MockApi> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind mock listener")?;
    let port = listener.local_addr()?.port();
    let attempts = Arc::new(AtomicU32::new(0));
    let app = router(role, attempts.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    Ok(MockApi {
        base_url: format!("http://127.0.0.1:{}", port),
        login_attempts: attempts,
    })
}

/// Starts the mock on a known port only after `delay`, so the first
/// request is refused in transit, the way a cold backend behaves.
pub fn start_mock_delayed(port: u16, role: &str, delay: Duration) -> MockApi {
    let attempts = Arc::new(AtomicU32::new(0));
    let app = router(role, attempts.clone());

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("failed to bind delayed mock listener");
        axum::serve(listener, app).await.expect("mock server");
    });

    MockApi {
        base_url: format!("http://127.0.0.1:{}", port),
        login_attempts: attempts,
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.attempts.fetch_add(1, Ordering::SeqCst);

    let username = body.get("username").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");

    if username.is_empty() || password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": format!("tok-{}", username),
            "token_type": "bearer"
        })),
    )
}

fn bearer_username(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer tok-")
        .map(|u| u.to_string())
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer_username(&headers) {
        Some(username) => (
            StatusCode::OK,
            Json(json!({
                "id": uuid::Uuid::new_v4(),
                "username": username,
                "email": format!("{}@example.com", username),
                "role": state.role
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        ),
    }
}

async fn active_company(
    State(_state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    match bearer_username(&headers) {
        Some(_) => (
            StatusCode::OK,
            Json(json!({
                "id": uuid::Uuid::new_v4(),
                "name": "Bar Demo",
                "branding": {
                    "primary_color": "#204060",
                    "logo_url": null
                }
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        ),
    }
}
