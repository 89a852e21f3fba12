use super::api::{ApiClient, ApiError};
use crate::models::withdrawals::Withdrawal;
use crate::normalize::extract_list_with;

#[derive(Clone, Debug)]
pub struct WalletRepository {
    api: ApiClient,
}

impl WalletRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Withdrawals as seen from the wallet endpoint.
    pub async fn withdrawals(&self) -> Result<Vec<Withdrawal>, ApiError> {
        let response = self.api.get("/wallet/withdrawals").await?;

        Ok(extract_list_with(&response, &["withdrawals", "rows", "items"])
            .iter()
            .map(Withdrawal::from_api)
            .collect())
    }
}
