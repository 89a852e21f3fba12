use serde_json::json;

use super::api::{ApiClient, ApiError};
use crate::models::auth::{login_token, AdminIdentity};

#[derive(Clone, Debug)]
pub struct AuthRepository {
    api: ApiClient,
}

impl AuthRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges credentials for a token and persists it.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .api
            .post("/auth/login", &json!({ "email": email, "password": password }))
            .await?;

        let token = login_token(&response)
            .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))?;
        self.api.tokens().set_token(&token).await?;

        Ok(token)
    }

    pub async fn me(&self) -> Result<AdminIdentity, ApiError> {
        let response = self.api.get("/auth/me").await?;
        Ok(AdminIdentity::from_api(&response))
    }

    /// Best-effort server logout; local credentials are always dropped.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self.api.get("/auth/logout").await {
            log::debug!("Ignoring logout failure: {}", e);
        }
        self.api.tokens().clear().await?;

        Ok(())
    }
}
