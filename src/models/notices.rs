use serde_json::{json, Map, Value};

use crate::normalize::{first_str, id_of};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notice {
    pub id: String,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<String>,
    pub is_active: bool,
    pub created_date: Option<String>,
}

impl Notice {
    pub fn from_api(value: &Value) -> Self {
        let status = first_str(value, &["status"]).unwrap_or_default();

        Self {
            id: id_of(value).unwrap_or_default(),
            kind: first_str(value, &["type"]),
            title: first_str(value, &["title"]),
            content: first_str(value, &["content"]),
            priority: first_str(value, &["priority"]),
            is_active: status.eq_ignore_ascii_case("active"),
            created_date: first_str(value, &["created_at", "createdAt"]),
        }
    }

    pub fn is_phone(&self) -> bool {
        self.kind.as_deref() == Some("phone")
    }
}

/// Notice fields to send. Unset fields are left out of updates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeDraft {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<String>,
    pub is_active: Option<bool>,
}

fn status_of(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "inactive"
    }
}

impl NoticeDraft {
    pub fn create_body(&self) -> Value {
        json!({
            "title": self.title,
            "content": self.content,
            "type": self.kind.as_deref().unwrap_or("general"),
            "priority": self.priority,
            "status": status_of(self.is_active != Some(false)),
        })
    }

    pub fn update_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(title) = &self.title {
            body.insert("title".into(), json!(title));
        }
        if let Some(content) = &self.content {
            body.insert("content".into(), json!(content));
        }
        if let Some(kind) = &self.kind {
            body.insert("type".into(), json!(kind));
        }
        if let Some(priority) = &self.priority {
            body.insert("priority".into(), json!(priority));
        }
        if let Some(active) = self.is_active {
            body.insert("status".into(), json!(status_of(active)));
        }

        Value::Object(body)
    }
}
