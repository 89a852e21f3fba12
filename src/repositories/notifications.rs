use super::api::{ApiClient, ApiError};
use crate::models::notifications::Notification;
use crate::normalize::extract_list_with;

#[derive(Clone, Debug)]
pub struct NotificationRepository {
    api: ApiClient,
}

impl NotificationRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Admin feed; the backend returns either a bare array or `{items}`.
    pub async fn list_admin(&self) -> Result<Vec<Notification>, ApiError> {
        let response = self.api.get("/notifications/admin").await?;

        Ok(extract_list_with(&response, &["items", "notifications", "rows"])
            .iter()
            .map(Notification::from_api)
            .collect())
    }
}
