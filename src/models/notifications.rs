use serde_json::Value;

use crate::normalize::{first_bool, first_str, id_of};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub member_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub login_time: Option<String>,
    pub location: Option<String>,
    pub time: Option<String>,
    pub is_new: bool,
    pub kind: Option<String>,
}

impl Notification {
    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value).unwrap_or_default(),
            message: first_str(value, &["message"]).unwrap_or_default(),
            member_name: first_str(value, &["memberName", "member_name"]),
            email: first_str(value, &["email"]),
            phone: first_str(value, &["phone"]),
            login_time: first_str(value, &["loginTime", "login_time"]),
            location: first_str(value, &["location"]),
            time: first_str(value, &["time", "createdAt", "created_at"]),
            is_new: first_bool(value, &["isNew", "is_new"]).unwrap_or(false),
            kind: first_str(value, &["type"]),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind.as_deref().unwrap_or("") {
            "login" => "🔐",
            "signup" => "👤",
            "withdrawal" => "💸",
            "deposit" => "💰",
            _ => "🔔",
        }
    }
}
