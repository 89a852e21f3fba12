use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::ads::{Ad, AdDraft};
use crate::normalize::{extract_list_with, unwrap_envelope};

#[derive(Clone, Debug)]
pub struct AdRepository {
    api: ApiClient,
}

impl AdRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Ad>, ApiError> {
        let response = self.api.get("/ads").await?;

        Ok(extract_list_with(&response, &["rows", "ads", "items"])
            .iter()
            .map(Ad::from_api)
            .collect())
    }

    pub async fn create(&self, draft: &AdDraft) -> Result<Value, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;

        let response = self.api.post("/ads", &draft.to_body()).await?;
        Ok(unwrap_envelope(&response).clone())
    }

    pub async fn update(&self, id: &str, draft: &AdDraft) -> Result<Value, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;

        let response = self.api.put(&format!("/ads/{id}"), &draft.to_body()).await?;
        Ok(unwrap_envelope(&response).clone())
    }

    pub async fn approve(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/ads/{id}/approve")).await
    }

    pub async fn reject(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/ads/{id}/reject")).await
    }

    pub async fn feature(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/ads/{id}/feature")).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.api.delete(&format!("/ads/{id}")).await
    }
}
