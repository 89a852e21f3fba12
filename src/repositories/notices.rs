use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::notices::{Notice, NoticeDraft};
use crate::normalize::{extract_list_with, unwrap_envelope};

const NOTICE_KEYS: &[&str] = &["notices", "rows", "items"];

#[derive(Clone, Debug)]
pub struct NoticeRepository {
    api: ApiClient,
}

impl NoticeRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Notice>, ApiError> {
        let response = self.api.get("/notices").await?;
        Ok(notices_from(&response))
    }

    pub async fn list_active(&self) -> Result<Vec<Notice>, ApiError> {
        let response = self.api.get("/notices/active").await?;
        Ok(notices_from(&response))
    }

    pub async fn get(&self, id: &str) -> Result<Notice, ApiError> {
        let response = self.api.get(&format!("/notices/{id}")).await?;
        Ok(Notice::from_api(unwrap_envelope(&response)))
    }

    pub async fn create(&self, draft: &NoticeDraft) -> Result<Value, ApiError> {
        self.api.post("/notices", &draft.create_body()).await
    }

    pub async fn update(&self, id: &str, draft: &NoticeDraft) -> Result<Value, ApiError> {
        self.api.put(&format!("/notices/{id}"), &draft.update_body()).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.api.delete(&format!("/notices/{id}")).await
    }
}

fn notices_from(response: &Value) -> Vec<Notice> {
    extract_list_with(response, NOTICE_KEYS)
        .iter()
        .map(Notice::from_api)
        .collect()
}
