use super::api::{ApiClient, ApiError};
use crate::models::taxonomy::{Category, Location, TaxonomyEntry};
use crate::normalize::extract_list_with;

async fn list_entries(api: &ApiClient, path: &str) -> Result<Vec<TaxonomyEntry>, ApiError> {
    let response = api.get(path).await?;

    Ok(extract_list_with(&response, &["rows", "items"])
        .iter()
        .map(TaxonomyEntry::from_api)
        .collect())
}

#[derive(Clone, Debug)]
pub struct CategoryRepository {
    api: ApiClient,
}

impl CategoryRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        list_entries(&self.api, "/categories").await
    }
}

#[derive(Clone, Debug)]
pub struct LocationRepository {
    api: ApiClient,
}

impl LocationRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Location>, ApiError> {
        list_entries(&self.api, "/locations").await
    }
}
