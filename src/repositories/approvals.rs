use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::approvals::{ApprovalSource, ApprovalStats, ApprovalUser};
use crate::normalize::extract_list_with;

#[derive(Clone, Debug)]
pub struct ApprovalRepository {
    api: ApiClient,
}

impl ApprovalRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_pending(&self) -> Result<Vec<ApprovalUser>, ApiError> {
        let response = self.api.get("/admin/approval/pending").await?;
        Ok(users_from(&response, ApprovalSource::Pending))
    }

    pub async fn list_approved(&self) -> Result<Vec<ApprovalUser>, ApiError> {
        let response = self.api.get("/admin/approval/approved").await?;
        Ok(users_from(&response, ApprovalSource::Approved))
    }

    pub async fn stats(&self) -> Result<ApprovalStats, ApiError> {
        let response = self.api.get("/admin/approval/stats").await?;
        Ok(ApprovalStats::from_api(&response))
    }

    pub async fn approve(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/admin/approval/{id}/approve")).await
    }

    pub async fn reject(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/admin/approval/{id}/reject")).await
    }
}

fn users_from(response: &Value, source: ApprovalSource) -> Vec<ApprovalUser> {
    extract_list_with(response, &["rows", "users"])
        .iter()
        .map(|u| ApprovalUser::from_api(u, source))
        .collect()
}
