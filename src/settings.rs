use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deposits {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for Deposits {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub deposits: Deposits,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    100
}

fn default_page_size() -> usize {
    10
}

fn default_max_pages() -> usize {
    50
}

impl Settings {
    /// Loads `path` (optional) and overlays `PAKADS_*` environment variables,
    /// e.g. `PAKADS_API__BASE_URL`.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("api.base_url", "")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PAKADS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Settings pointing at `base_url` with every other value defaulted.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            api: Api {
                base_url: base_url.to_string(),
                api_version: default_api_version(),
                timeout_secs: default_timeout_secs(),
            },
            session: Session::default(),
            deposits: Deposits::default(),
        }
    }

    /// `{base_url}/api/{version}` with trailing slashes stripped from the origin.
    pub fn api_root(&self) -> String {
        let base = self.api.base_url.trim_end_matches('/');
        format!("{}/api/{}", base, self.api.api_version)
    }

    pub fn token_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.session.token_file {
            return Some(path.clone());
        }

        ProjectDirs::from("pk", "pakads", "admin").map(|dirs| dirs.data_dir().join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_strips_trailing_slashes() {
        let settings = Settings::for_base_url("https://api.example.com///");
        assert_eq!(settings.api_root(), "https://api.example.com/api/v1");
    }

    #[test]
    fn empty_base_url_yields_relative_root() {
        let settings = Settings::for_base_url("");
        assert_eq!(settings.api_root(), "/api/v1");
    }

    #[test]
    fn explicit_token_file_wins() {
        let mut settings = Settings::for_base_url("http://localhost");
        settings.session.token_file = Some(PathBuf::from("/tmp/pakads.json"));
        assert_eq!(settings.token_file(), Some(PathBuf::from("/tmp/pakads.json")));
    }

    #[test]
    fn deposit_defaults() {
        let deposits = Deposits::default();
        assert_eq!(deposits.batch_size, 100);
        assert_eq!(deposits.page_size, 10);
        assert_eq!(deposits.max_pages, 50);
    }
}
