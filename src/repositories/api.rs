use std::time::Duration;

use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::token_store::TokenStore;
use crate::settings::Settings;

pub const GENERIC_ERROR: &str = "Request failed";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message} (HTTP 401)")]
    Unauthorized { message: String },
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

/// Banner text for a failed response body: `message`, then `error`, then a
/// generic fallback.
pub fn error_message(body: &Value) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| {
            body.get(*key)
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
        })
        .unwrap_or(GENERIC_ERROR)
        .to_string()
}

/// JSON-over-HTTP client for the admin API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    root: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(settings: &Settings, tokens: TokenStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            root: settings.api_root(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, path).await).await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Value, ApiError> {
        let builder = self.request(Method::GET, path).await.query(query);
        self.send(builder).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, path).await.json(body);
        self.send(builder).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let builder = self.request(Method::PUT, path).await.json(body);
        self.send(builder).await
    }

    pub async fn put_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::PUT, path).await).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::DELETE, path).await).await
    }

    pub async fn post_multipart(&self, path: &str, form: multipart::Form) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, path).await.multipart(form);
        self.send(builder).await
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("{} {}", method, path);

        let builder = self.client.request(method, self.url(path));
        match self.tokens.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await.map_err(|e| {
            log::warn!("Request failed to send: {}", e);
            ApiError::from(e)
        })?;

        self.handle(response).await
    }

    async fn handle(&self, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => return Err(ApiError::Decode(e.to_string())),
            }
        };

        if status == StatusCode::UNAUTHORIZED {
            log::info!("Received 401; clearing stored credentials.");
            if let Err(e) = self.tokens.clear().await {
                log::warn!("Could not clear stored credentials: {}", e);
            }
            return Err(ApiError::Unauthorized {
                message: error_message(&body),
            });
        }

        if !status.is_success() {
            let message = error_message(&body);
            log::warn!("API returned {}: {}", status.as_u16(), message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}
