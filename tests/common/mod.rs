#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use short_url::AppError;
use short_url::domain::repositories::{UrlRepository, UserRepository};
use short_url::infrastructure::memory::{InMemoryUrlRepository, InMemoryUserRepository};
use short_url::routes::build_router;
use short_url::state::AppState;
use short_url::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";

/// Generator that hands out a fixed list of codes in order.
pub struct ScriptedCodeGenerator {
    codes: Mutex<Vec<String>>,
}

impl ScriptedCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        let mut codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        codes.reverse();
        Self {
            codes: Mutex::new(codes),
        }
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self) -> Result<String, AppError> {
        self.codes
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AppError::internal("Script exhausted", json!({})))
    }
}

pub fn create_test_state_with(
    url_repository: Arc<dyn UrlRepository>,
    user_repository: Arc<dyn UserRepository>,
    generator: Arc<dyn CodeGenerator>,
) -> AppState {
    AppState::new(
        url_repository,
        user_repository,
        generator,
        BASE_URL,
        TEST_SECRET,
        3600,
    )
}

/// In-memory state with a random 6-character generator.
pub fn create_test_state() -> AppState {
    create_test_state_with(
        Arc::new(InMemoryUrlRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(RandomCodeGenerator::default()),
    )
}

/// State over a PostgreSQL pool prepared by `#[sqlx::test]`.
pub fn create_pg_test_state(pool: PgPool) -> AppState {
    use short_url::infrastructure::persistence::{PgUrlRepository, PgUserRepository};

    let pool = Arc::new(pool);
    create_test_state_with(
        Arc::new(PgUrlRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
        Arc::new(RandomCodeGenerator::default()),
    )
}

pub fn create_test_server() -> TestServer {
    server_for(create_test_state())
}

pub fn server_for(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Registers a user and returns `(token, user_id)`.
pub async fn register_user(server: &TestServer, email: &str) -> (String, i64) {
    let response = server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": "secret123" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

/// Shortens `original_url`, authenticated when `token` is given.
/// Returns the response body.
pub async fn create_url(server: &TestServer, original_url: &str, token: Option<&str>) -> Value {
    let mut request = server
        .post("/urls")
        .json(&json!({ "originalUrl": original_url }));

    if let Some(token) = token {
        request = request.add_header("Authorization", bearer(token));
    }

    let response = request.await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Lists the caller's URLs.
pub async fn list_urls(server: &TestServer, token: &str) -> Vec<Value> {
    let response = server
        .get("/urls")
        .add_header("Authorization", bearer(token))
        .await;

    response.assert_status_ok();
    response.json()
}

/// Finds the id of an owned URL by its short code.
pub async fn id_of(server: &TestServer, token: &str, short_code: &str) -> i64 {
    list_urls(server, token)
        .await
        .into_iter()
        .find(|u| u["shortCode"] == short_code)
        .and_then(|u| u["id"].as_i64())
        .unwrap()
}
