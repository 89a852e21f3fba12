use serde_json::Value;

use crate::normalize::{first_f64, first_u64, unwrap_envelope};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdminStats {
    pub total_users: Option<u64>,
    pub verified_users: Option<u64>,
    pub total_withdrawals: Option<f64>,
    pub total_deposits: Option<f64>,
    pub pending_requests: Option<u64>,
    pub daily_revenue: Option<f64>,
}

impl AdminStats {
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);

        Self {
            total_users: first_u64(stats, &["totalUsers", "total_users"]),
            verified_users: first_u64(stats, &["verifiedUsers", "verified_users"]),
            total_withdrawals: first_f64(stats, &["totalWithdrawals", "total_withdrawals"]),
            total_deposits: first_f64(stats, &["totalDeposits", "total_deposits"]),
            pending_requests: first_u64(stats, &["pendingRequests", "pending_requests"]),
            daily_revenue: first_f64(stats, &["dailyRevenue", "daily_revenue"]),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransferStats {
    pub total: Option<f64>,
    pub today: Option<f64>,
    pub month: Option<f64>,
}

impl TransferStats {
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);

        Self {
            total: first_f64(stats, &["total"]),
            today: first_f64(stats, &["today"]),
            month: first_f64(stats, &["month"]),
        }
    }
}
