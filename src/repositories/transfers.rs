use super::api::{ApiClient, ApiError};
use crate::models::dashboard::TransferStats;

#[derive(Clone, Debug)]
pub struct TransferRepository {
    api: ApiClient,
}

impl TransferRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn admin_stats(&self) -> Result<TransferStats, ApiError> {
        let response = self.api.get("/transfers/admin/stats").await?;
        Ok(TransferStats::from_api(&response))
    }
}
