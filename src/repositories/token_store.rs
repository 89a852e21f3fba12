use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Primary key the admin token is written under.
pub const ADMIN_TOKEN_KEY: &str = "pakads_admin_token";
/// Legacy key still honoured when reading and cleared on logout.
pub const LEGACY_TOKEN_KEY: &str = "pakads_token";

type Entries = BTreeMap<String, String>;

/// Persisted key/value credential storage shared by every request.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
    entries: Arc<RwLock<Entries>>,
}

impl TokenStore {
    /// Opens the store at `path`. A missing or corrupt file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Entries>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                    Entries::new()
                }
            },
            Err(_) => Entries::new(),
        };

        Self {
            path: Some(path),
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(RwLock::new(Entries::new())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn token(&self) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(ADMIN_TOKEN_KEY)
            .or_else(|| entries.get(LEGACY_TOKEN_KEY))
            .filter(|t| !t.is_empty())
            .cloned()
    }

    pub async fn contains_token(&self) -> bool {
        self.token().await.is_some()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), std::io::Error> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    pub async fn set_token(&self, token: &str) -> Result<(), std::io::Error> {
        self.set(ADMIN_TOKEN_KEY, token).await
    }

    /// Removes both token keys.
    pub async fn clear(&self) -> Result<(), std::io::Error> {
        let mut entries = self.entries.write().await;
        entries.remove(ADMIN_TOKEN_KEY);
        entries.remove(LEGACY_TOKEN_KEY);
        self.persist(&entries).await
    }

    async fn persist(&self, entries: &Entries) -> Result<(), std::io::Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(path, raw).await
    }
}
