use serde::Serialize;
use serde_json::Value;

use crate::normalize::{first_bool, first_f64, first_str, first_u64, id_of};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub verified: Option<bool>,
    pub balance: Option<f64>,
    pub referrals_count: Option<u64>,
    pub total_earned: Option<f64>,
    pub created_at: Option<String>,
}

impl UserAccount {
    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value).unwrap_or_default(),
            name: first_str(value, &["name"]),
            email: first_str(value, &["email"]),
            phone: first_str(value, &["phone"]),
            status: first_str(value, &["status"]),
            verified: first_bool(value, &["verified", "is_verified", "isVerified"]),
            balance: first_f64(value, &["balance", "walletBalance", "wallet_balance"]),
            referrals_count: first_u64(value, &["referralsCount", "referrals_count", "referrals"]),
            total_earned: first_f64(value, &["totalEarned", "total_earned"]),
            created_at: first_str(value, &["createdAt", "created_at", "joinDate"]),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }

    pub fn has_balance(&self) -> bool {
        self.balance.unwrap_or(0.0) > 0.0
    }
}

/// Partial update for `PUT /users/{id}`; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balance_and_activity() {
        let user = UserAccount::from_api(&json!({ "id": 1, "status": "active", "balance": "12.5" }));
        assert!(user.is_active());
        assert!(user.has_balance());

        let idle = UserAccount::from_api(&json!({ "id": 2 }));
        assert!(!idle.is_active());
        assert!(!idle.has_balance());
    }

    #[test]
    fn patch_skips_unset() {
        let patch = UserPatch {
            status: Some("inactive".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).ok(), Some(json!({ "status": "inactive" })));
    }
}
