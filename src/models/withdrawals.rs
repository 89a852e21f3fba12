use serde_json::Value;

use super::UserRef;
use crate::normalize::{first_f64, first_number, first_str, first_u64, id_of, path, unwrap_envelope};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Withdrawal {
    pub id: String,
    pub user: Option<UserRef>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub account_details: Option<String>,
    pub created_at: Option<String>,
}

impl Withdrawal {
    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value).unwrap_or_default(),
            user: UserRef::from_api(value),
            amount: first_number(value, &["amount", "amountUSD", "amount_usd"]),
            status: first_str(value, &["status"]),
            account_details: first_str(value, &["description", "accountDetails", "account_details"]),
            created_at: first_str(value, &["createdAt", "created_at"]),
        }
    }

    pub fn status_is(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WithdrawalStats {
    pub pending: Option<u64>,
    pub approved: Option<u64>,
    pub rejected: Option<u64>,
    pub sent: Option<u64>,
    pub total_withdrawals: Option<u64>,
    pub total_amount: Option<f64>,
    pub total_amount_usd: Option<f64>,
}

impl WithdrawalStats {
    /// Flat counts win; otherwise `byStatus.<status>.count` is used.
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);
        let count = |status: &str| {
            first_u64(stats, &[status]).or_else(|| {
                path(stats, &format!("byStatus.{status}.count")).and_then(Value::as_u64)
            })
        };

        Self {
            pending: count("pending"),
            approved: count("approved"),
            rejected: count("rejected"),
            sent: count("sent"),
            total_withdrawals: first_u64(stats, &["totalWithdrawals"]),
            total_amount: first_f64(stats, &["totalAmount"]),
            total_amount_usd: first_f64(stats, &["totalAmountUSD"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_and_details_fallbacks() {
        let w = Withdrawal::from_api(&json!({
            "id": 8,
            "amountUSD": 40,
            "description": "JazzCash 0300",
            "created_at": "2025-03-01",
        }));
        assert_eq!(w.amount, Some(40.0));
        assert_eq!(w.account_details.as_deref(), Some("JazzCash 0300"));
        assert_eq!(w.created_at.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn stats_by_status() {
        let stats = WithdrawalStats::from_api(&json!({ "data": {
            "byStatus": { "pending": { "count": 3 }, "sent": { "count": 1 } },
            "totalAmount": 90
        }}));
        assert_eq!(stats.pending, Some(3));
        assert_eq!(stats.sent, Some(1));
        assert_eq!(stats.approved, None);
        assert_eq!(stats.total_amount, Some(90.0));
    }
}
