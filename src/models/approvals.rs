use serde_json::Value;

use crate::normalize::{first_bool, first_str, first_u64, id_of, unwrap_envelope};

/// Which approval list a user was fetched from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalSource {
    Pending,
    Approved,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApprovalUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cnic: Option<String>,
    pub is_active: Option<bool>,
    pub status: String,
    pub created_at: Option<String>,
}

impl ApprovalUser {
    /// A pending user that was deactivated is reported as rejected.
    pub fn from_api(value: &Value, source: ApprovalSource) -> Self {
        let is_active = first_bool(value, &["is_active", "isActive"]);
        let status = match source {
            ApprovalSource::Pending if is_active == Some(false) => "rejected",
            ApprovalSource::Pending => "pending",
            ApprovalSource::Approved => "approved",
        };

        Self {
            id: id_of(value).unwrap_or_default(),
            name: first_str(value, &["name"]),
            email: first_str(value, &["email"]),
            phone: first_str(value, &["phone"]),
            cnic: first_str(value, &["cnic"]),
            is_active,
            status: status.to_string(),
            created_at: first_str(value, &["created_at", "createdAt"]),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApprovalStats {
    pub pending: Option<u64>,
    pub approved: Option<u64>,
    pub rejected: Option<u64>,
}

impl ApprovalStats {
    /// The backend reports `pendingUsers` / `approvedUsers` and has no rejected count.
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);

        Self {
            pending: Some(first_u64(stats, &["pendingUsers", "pending"]).unwrap_or(0)),
            approved: Some(first_u64(stats, &["approvedUsers", "approved"]).unwrap_or(0)),
            rejected: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deactivated_pending_user_is_rejected() {
        let user = ApprovalUser::from_api(
            &json!({ "id": 3, "name": "Ali", "is_active": false }),
            ApprovalSource::Pending,
        );
        assert_eq!(user.status, "rejected");
        assert_eq!(user.id, "3");
    }

    #[test]
    fn missing_cnic_is_none() {
        let user = ApprovalUser::from_api(
            &json!({ "id": "u1", "email": "x@y.z", "createdAt": "2025-01-01" }),
            ApprovalSource::Approved,
        );
        assert_eq!(user.cnic, None);
        assert_eq!(user.status, "approved");
        assert_eq!(user.created_at.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn stats_read_backend_names() {
        let stats = ApprovalStats::from_api(&json!({ "data": { "pendingUsers": 4, "approvedUsers": 9 } }));
        assert_eq!(stats.pending, Some(4));
        assert_eq!(stats.approved, Some(9));
        assert_eq!(stats.rejected, Some(0));
    }
}
