use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::commissions::{CommissionOverview, TopEarner};
use crate::normalize::{extract_list_with, unwrap_envelope};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopEarnersQuery {
    start_date: String,
    end_date: String,
    limit: usize,
}

#[derive(Clone, Debug)]
pub struct CommissionRepository {
    api: ApiClient,
}

impl CommissionRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn overall_stats(&self) -> Result<CommissionOverview, ApiError> {
        let response = self.api.get("/commissions/admin/overall-stats").await?;
        Ok(CommissionOverview::from_api(&response))
    }

    /// Top earners between `start` and `end`, best first.
    pub async fn top_earners(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
        limit: usize,
    ) -> Result<Vec<TopEarner>, ApiError> {
        let query = TopEarnersQuery {
            start_date: start.to_rfc3339(),
            end_date: end.to_rfc3339(),
            limit,
        };
        let response = self
            .api
            .get_with_query("/commissions/admin/top-earners", &query)
            .await?;

        Ok(extract_list_with(&response, &["topEarners"])
            .iter()
            .map(TopEarner::from_api)
            .collect())
    }

    pub async fn user_admin(&self, user_id: &str) -> Result<Value, ApiError> {
        let response = self
            .api
            .get(&format!("/commissions/admin/user/{user_id}"))
            .await?;
        Ok(unwrap_envelope(&response).clone())
    }

    pub async fn distribute(&self, payload: &Value) -> Result<Value, ApiError> {
        let response = self.api.post("/commissions/distribute", payload).await?;
        Ok(unwrap_envelope(&response).clone())
    }
}
