//! Shared setup for integration tests against a mocked admin API

#![allow(dead_code)]

use pakads_admin::repositories::{Repositories, TokenStore};
use pakads_admin::settings::Settings;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-admin-token";

/// Mock server plus repositories wired to it.
pub struct TestApi {
    pub server: MockServer,
    pub repos: Repositories,
    pub tokens: TokenStore,
}

impl TestApi {
    /// Starts a mock server with a signed-in in-memory session.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(configure: impl FnOnce(&mut Settings)) -> Self {
        let server = MockServer::start().await;
        let mut settings = Settings::for_base_url(&server.uri());
        configure(&mut settings);

        let tokens = TokenStore::in_memory();
        tokens.set_token(TEST_TOKEN).await.expect("store token");

        let repos = Repositories::new(&settings, tokens.clone()).expect("build repositories");

        Self {
            server,
            repos,
            tokens,
        }
    }

    /// Same server, no stored credentials.
    pub async fn signed_out() -> Self {
        let api = Self::start().await;
        api.tokens.clear().await.expect("clear tokens");
        api
    }
}

/// Route under the versioned API root.
pub fn api_path(route: &str) -> String {
    format!("/api/v1{route}")
}

pub fn deposit_json(id: &str, status: &str, amount: f64, name: &str) -> Value {
    json!({
        "_id": id,
        "amount": amount,
        "status": status,
        "user": { "_id": format!("u-{id}"), "name": name, "email": format!("{}@example.com", name.to_lowercase()) },
        "createdAt": "2026-10-01T08:00:00Z"
    })
}

pub fn approval_user_json(id: &str, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "is_active": active
    })
}
