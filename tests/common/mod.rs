//! Shared helpers for the integration tests
//!
//! Every test gets its own in-memory database and a scripted completion
//! client, so nothing touches the network.

#![allow(dead_code)]

use algorithms_server::core::AppState;
use algorithms_server::llm::{CompletionClient, CompletionRequest, LlmError};
use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "Password123";

/// Completion client that replays canned replies in order and remembers
/// every request it received. Runs out with `EmptyResponse`.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, content: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
    }

    pub fn fail(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

/// In-memory database with the migrations applied. One connection that
/// never expires, otherwise the database would vanish between queries.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn create_test_state(pool: SqlitePool, llm: Arc<ScriptedClient>) -> Arc<AppState> {
    Arc::new(AppState::new(pool, TEST_JWT_SECRET.to_string(), llm))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = algorithms_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Fresh database, scripted client and server in one call
pub async fn setup() -> (TestServer, Arc<AppState>, Arc<ScriptedClient>) {
    let llm = ScriptedClient::new();
    let state = create_test_state(create_test_pool().await, llm.clone());
    let server = create_test_server(state.clone());
    (server, state, llm)
}

/// A registered user with a valid token
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

pub async fn register_and_login(server: &TestServer, username: &str) -> TestUser {
    let response = server
        .post("/auth/register")
        .json(&json!({ "username": username, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let id = response.json::<Value>()["id"]
        .as_i64()
        .expect("registered user has an id");

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": username, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let header = response
        .headers()
        .get("authorization")
        .expect("login returns an authorization header")
        .to_str()
        .expect("authorization header is ascii")
        .to_string();

    TestUser {
        id,
        username: username.to_string(),
        token: header
            .strip_prefix("Bearer ")
            .expect("bearer token")
            .to_string(),
    }
}
