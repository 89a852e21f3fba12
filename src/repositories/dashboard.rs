use super::api::{ApiClient, ApiError};
use crate::models::commissions::LevelDistribution;
use crate::models::dashboard::AdminStats;

#[derive(Clone, Debug)]
pub struct DashboardRepository {
    api: ApiClient,
}

impl DashboardRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let response = self.api.get("/dashboard/admin/stats").await?;
        Ok(AdminStats::from_api(&response))
    }

    /// Commission totals per referral level.
    pub async fn admin_commissions(&self) -> Result<Vec<LevelDistribution>, ApiError> {
        let response = self.api.get("/dashboard/admin/commissions").await?;
        Ok(LevelDistribution::list_from_api(&response))
    }
}
