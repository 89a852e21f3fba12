use serde_json::Value;

use super::UserRef;
use crate::normalize::{first_f64, first_str, first_u64, id_of, unwrap_envelope};

pub const DEFAULT_REJECT_REASON: &str = "Rejected by admin";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deposit {
    pub id: String,
    pub user: Option<UserRef>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub proof_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
}

impl Deposit {
    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value).unwrap_or_default(),
            user: UserRef::from_api(value),
            amount: first_f64(value, &["amount", "amountUSD", "amount_usd"]),
            status: first_str(value, &["status"]),
            proof_url: first_str(value, &["proofImageUrl", "proof_url", "proofImageURL"]),
            created_at: first_str(value, &["createdAt", "created_at"]),
            updated_at: first_str(value, &["updatedAt", "updated_at"]),
            approved_at: first_str(value, &["approvedAt", "approved_at"]),
            rejected_at: first_str(value, &["rejectedAt", "rejected_at"]),
            approved_by: first_str(value, &["approvedBy", "approved_by"]),
            rejected_by: first_str(value, &["rejectedBy", "rejected_by"]),
            rejection_reason: first_str(value, &["rejectionReason", "rejection_reason", "reason"]),
        }
    }

    pub fn status_is(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepositStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total_amount: f64,
}

impl DepositStats {
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);

        Self {
            total: first_u64(stats, &["total", "totalDeposits"]).unwrap_or(0),
            pending: first_u64(stats, &["pending"]).unwrap_or(0),
            approved: first_u64(stats, &["approved"]).unwrap_or(0),
            rejected: first_u64(stats, &["rejected"]).unwrap_or(0),
            total_amount: first_f64(stats, &["totalAmount", "total_amount"]).unwrap_or(0.0),
        }
    }

    /// Counts derived from a fetched list when the backend supplies none.
    pub fn from_deposits(deposits: &[Deposit]) -> Self {
        let count = |status: &str| deposits.iter().filter(|d| d.status_is(status)).count() as u64;

        Self {
            total: deposits.len() as u64,
            pending: count("pending"),
            approved: count("approved"),
            rejected: count("rejected"),
            total_amount: deposits.iter().filter_map(|d| d.amount).sum(),
        }
    }
}
