use serde_json::{json, Value};

use super::api::{ApiClient, ApiError};
use crate::models::daily_bonus::{DailyBonusHistoryItem, DailyBonusStatus};
use crate::normalize::unwrap_envelope;

#[derive(Clone, Debug)]
pub struct DailyBonusRepository {
    api: ApiClient,
}

impl DailyBonusRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn status(&self) -> Result<DailyBonusStatus, ApiError> {
        let response = self.api.get("/daily-referral-bonus/status").await?;
        Ok(DailyBonusStatus::from_api(&response))
    }

    pub async fn history(&self, page: u32, limit: u32) -> Result<Vec<DailyBonusHistoryItem>, ApiError> {
        let response = self
            .api
            .get_with_query("/daily-referral-bonus/history", &[("page", page), ("limit", limit)])
            .await?;
        Ok(DailyBonusHistoryItem::list_from_api(&response))
    }

    pub async fn check_and_award(&self) -> Result<Value, ApiError> {
        let response = self.api.post("/daily-referral-bonus/check", &json!({})).await?;
        Ok(unwrap_envelope(&response).clone())
    }
}
