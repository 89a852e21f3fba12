use serde_json::{json, Value};

use super::api::{ApiClient, ApiError};
use crate::models::deposits::DEFAULT_REJECT_REASON;
use crate::models::withdrawals::{Withdrawal, WithdrawalStats};
use crate::normalize::extract_list_with;

#[derive(Clone, Debug)]
pub struct WithdrawalRepository {
    api: ApiClient,
}

impl WithdrawalRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_all(&self) -> Result<Vec<Withdrawal>, ApiError> {
        let response = self.api.get("/admin/withdrawals").await?;

        Ok(extract_list_with(&response, &["withdrawals", "rows", "items"])
            .iter()
            .map(Withdrawal::from_api)
            .collect())
    }

    pub async fn stats(&self) -> Result<WithdrawalStats, ApiError> {
        let response = self.api.get("/admin/withdrawals/stats").await?;
        Ok(WithdrawalStats::from_api(&response))
    }

    pub async fn approve(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/admin/withdrawals/{id}/approve")).await
    }

    pub async fn reject(&self, id: &str, reason: Option<&str>) -> Result<Value, ApiError> {
        let reason = reason.unwrap_or(DEFAULT_REJECT_REASON);
        self.api
            .put(&format!("/admin/withdrawals/{id}/reject"), &json!({ "reason": reason }))
            .await
    }

    pub async fn mark_sent(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/admin/withdrawals/{id}/sent")).await
    }
}
