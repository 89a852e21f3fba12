use serde_json::{json, Value};

use super::api::{ApiClient, ApiError};
use crate::models::deposits::{Deposit, DepositStats, DEFAULT_REJECT_REASON};
use crate::normalize::{extract_list_with, path, unwrap_envelope};

const DEPOSIT_KEYS: &[&str] = &["deposits", "rows", "items"];

#[derive(Clone, Debug)]
pub struct DepositRepository {
    api: ApiClient,
    batch_size: usize,
    max_pages: usize,
}

impl DepositRepository {
    pub fn new(api: ApiClient, batch_size: usize, max_pages: usize) -> Self {
        Self {
            api,
            batch_size: batch_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// Fetches every deposit page by page. Stops on a short or empty page,
    /// once the reported `totalPages` has been read, when a page starts with
    /// the same record as the one before it, or after `max_pages` requests.
    pub async fn list_all(&self) -> Result<Vec<Deposit>, ApiError> {
        let mut deposits = Vec::new();
        let mut previous_first: Option<String> = None;
        let mut page: u64 = 1;

        loop {
            let response = self
                .api
                .get_with_query(
                    "/deposits/admin/list",
                    &[("page", page), ("limit", self.batch_size as u64)],
                )
                .await?;

            let batch: Vec<Deposit> = extract_list_with(&response, DEPOSIT_KEYS)
                .iter()
                .map(Deposit::from_api)
                .collect();
            let first = batch
                .first()
                .map(|deposit| deposit.id.clone())
                .filter(|id| !id.is_empty());

            if first.is_some() && first == previous_first {
                log::warn!(
                    "Deposit page {} repeats page {}, server ignores paging; stopping",
                    page,
                    page - 1
                );
                break;
            }

            let fetched = batch.len();
            deposits.extend(batch);

            let total_pages = total_pages(&response);
            log::debug!(
                "Deposit page {} returned {} records (total pages: {:?})",
                page,
                fetched,
                total_pages
            );

            if fetched < self.batch_size {
                break;
            }
            if total_pages.is_some_and(|total| page >= total) {
                break;
            }
            if page >= self.max_pages as u64 {
                log::warn!(
                    "Stopped listing deposits at the {} page limit with {} records",
                    self.max_pages,
                    deposits.len()
                );
                break;
            }
            previous_first = first;
            page += 1;
        }

        Ok(deposits)
    }

    pub async fn get(&self, id: &str) -> Result<Deposit, ApiError> {
        let response = self.api.get(&format!("/deposits/admin/{id}")).await?;
        let payload = unwrap_envelope(&response);
        let record = payload.get("deposit").unwrap_or(payload);

        Ok(Deposit::from_api(record))
    }

    pub async fn approve(&self, id: &str) -> Result<Value, ApiError> {
        self.api.put_empty(&format!("/deposits/{id}/approve")).await
    }

    pub async fn reject(&self, id: &str, reason: Option<&str>) -> Result<Value, ApiError> {
        let reason = reason.unwrap_or(DEFAULT_REJECT_REASON);
        self.api
            .put(&format!("/deposits/{id}/reject"), &json!({ "reason": reason }))
            .await
    }

    pub async fn stats(&self) -> Result<DepositStats, ApiError> {
        let response = self.api.get("/deposits/admin/stats").await?;
        Ok(DepositStats::from_api(&response))
    }
}

fn total_pages(response: &Value) -> Option<u64> {
    path(response, "pagination.totalPages")
        .or_else(|| path(response, "data.pagination.totalPages"))
        .and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_at_either_level() {
        assert_eq!(total_pages(&json!({ "pagination": { "totalPages": 4 } })), Some(4));
        assert_eq!(
            total_pages(&json!({ "data": { "deposits": [], "pagination": { "totalPages": 2 } } })),
            Some(2)
        );
        assert_eq!(total_pages(&json!([])), None);
    }
}
