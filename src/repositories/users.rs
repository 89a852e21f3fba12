use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::users::{UserAccount, UserPatch};
use crate::normalize::{extract_list_with, unwrap_envelope};

#[derive(Clone, Debug)]
pub struct UserRepository {
    api: ApiClient,
}

impl UserRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<UserAccount>, ApiError> {
        let response = self.api.get("/users").await?;

        Ok(extract_list_with(&response, &["users", "rows", "items"])
            .iter()
            .map(UserAccount::from_api)
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<UserAccount, ApiError> {
        let response = self.api.get(&format!("/users/{id}")).await?;
        let payload = unwrap_envelope(&response);

        Ok(UserAccount::from_api(payload.get("user").unwrap_or(payload)))
    }

    pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<Value, ApiError> {
        self.api.put(&format!("/users/{id}"), patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.api.delete(&format!("/users/{id}")).await
    }
}
