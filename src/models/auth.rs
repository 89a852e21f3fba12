use serde_json::Value;

use crate::normalize::{first_str, id_of, unwrap_envelope};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminIdentity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl AdminIdentity {
    /// `/auth/me` answers either with the user or with `{ user: ... }`.
    pub fn from_api(value: &Value) -> Self {
        let payload = unwrap_envelope(value);
        let user = payload.get("user").filter(|u| u.is_object()).unwrap_or(payload);

        Self {
            id: id_of(user),
            name: first_str(user, &["name"]),
            email: first_str(user, &["email"]),
            role: first_str(user, &["role"]),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Pulls the bearer token out of a login response.
pub fn login_token(value: &Value) -> Option<String> {
    first_str(unwrap_envelope(value), &["token", "accessToken", "access_token"])
        .or_else(|| first_str(value, &["token"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_accepts_nested_user() {
        let me = AdminIdentity::from_api(&json!({ "data": { "user": { "id": 1, "role": "admin" } } }));
        assert!(me.is_admin());
        assert_eq!(me.id.as_deref(), Some("1"));
    }

    #[test]
    fn non_admin_roles() {
        assert!(!AdminIdentity::from_api(&json!({ "role": "user" })).is_admin());
        assert!(!AdminIdentity::from_api(&json!({})).is_admin());
    }

    #[test]
    fn token_from_envelope_or_bare() {
        assert_eq!(login_token(&json!({ "data": { "token": "t1" } })).as_deref(), Some("t1"));
        assert_eq!(login_token(&json!({ "token": "t2" })).as_deref(), Some("t2"));
        assert_eq!(login_token(&json!({ "data": {} })), None);
    }
}
