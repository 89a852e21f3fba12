use serde_json::Value;

use crate::normalize::{first_f64, first_str, id_of};

pub mod ads;
pub mod approvals;
pub mod auth;
pub mod commissions;
pub mod daily_bonus;
pub mod dashboard;
pub mod deposits;
pub mod notices;
pub mod notifications;
pub mod taxonomy;
pub mod upload;
pub mod users;
pub mod withdrawals;

/// The embedded `user` object that deposits and withdrawals carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserRef {
    pub fn from_api(value: &Value) -> Option<Self> {
        let user = value.get("user").filter(|u| u.is_object())?;

        Some(Self {
            id: id_of(user),
            name: first_str(user, &["name", "fullName", "full_name"]),
            email: first_str(user, &["email"]),
            phone: first_str(user, &["phone"]),
        })
    }

    /// Name, then email; used as the table label.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.email.as_deref())
    }
}

/// Dual-currency amount as reported by the bonus endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Money {
    pub pkr: f64,
    pub usd: f64,
}

impl Money {
    pub fn from_api(value: Option<&Value>) -> Option<Self> {
        let value = value.filter(|v| v.is_object())?;

        Some(Self {
            pkr: first_f64(value, &["pkr"]).unwrap_or_default(),
            usd: first_f64(value, &["usd"]).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_ref_requires_object() {
        assert_eq!(UserRef::from_api(&json!({ "user": "u1" })), None);
        assert_eq!(UserRef::from_api(&json!({})), None);

        let user = UserRef::from_api(&json!({ "user": { "id": 7, "email": "a@b.c" } }));
        let user = user.unwrap_or_default();
        assert_eq!(user.id.as_deref(), Some("7"));
        assert_eq!(user.label(), Some("a@b.c"));
    }

    #[test]
    fn money_defaults_missing_currency() {
        let money = Money::from_api(Some(&json!({ "pkr": 500 })));
        assert_eq!(money, Some(Money { pkr: 500.0, usd: 0.0 }));
        assert_eq!(Money::from_api(Some(&json!(null))), None);
    }
}
