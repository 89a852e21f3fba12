use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::api::{ApiClient, ApiError};
use crate::models::upload::UploadedFile;

#[derive(Clone, Debug)]
pub struct UploadRepository {
    api: ApiClient,
}

impl UploadRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Uploads a local image as the multipart field `image`.
    pub async fn upload_image(&self, file: &Path) -> Result<UploadedFile, ApiError> {
        let bytes = tokio::fs::read(file).await?;
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime_for(file))
            .map_err(ApiError::from)?;
        let form = Form::new().part("image", part);

        let response = self.api.post_multipart("/upload/image", form).await?;
        Ok(UploadedFile::from_api(&response))
    }

    pub async fn delete(&self, filename: &str) -> Result<Value, ApiError> {
        self.api
            .delete(&format!("/upload/{}", urlencoding::encode(filename)))
            .await
    }
}

fn mime_for(file: &Path) -> &'static str {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("banner.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }
}
