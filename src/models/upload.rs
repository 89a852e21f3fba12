use serde_json::Value;

use crate::normalize::{first_str, unwrap_envelope};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadedFile {
    pub url: Option<String>,
    pub filename: Option<String>,
}

impl UploadedFile {
    pub fn from_api(value: &Value) -> Self {
        let payload = unwrap_envelope(value);

        Self {
            url: first_str(payload, &["url", "imageUrl", "image_url"]),
            filename: first_str(payload, &["filename", "fileName"]),
        }
    }
}
