//! Configuration management for LexAI using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::AuthState;

/// Default upper bound for uploaded documents (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Document extensions the analysis service accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "doc", "docx", "rtf"];

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory (holds the local history list).
    pub data_dir: PathBuf,
    /// Base URL of the analysis service.
    pub api_url: String,
    /// Base URL of the remote history store (None = local history only).
    pub history_url: Option<String>,
    /// Signed-in user id.
    pub user_id: Option<String>,
    /// Bearer token for the remote history store.
    pub auth_token: Option<String>,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds (None = transport default).
    pub request_timeout: Option<u64>,
    /// Largest document accepted for upload, in bytes.
    pub max_upload_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("lexai");

        Self {
            data_dir,
            api_url: "http://localhost:5000".to_string(),
            history_url: None,
            user_id: None,
            auth_token: None,
            user_agent: format!("LexAI/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// Authentication state derived from the configured user.
    pub fn auth_state(&self) -> AuthState {
        AuthState::from_parts(self.user_id.clone(), self.auth_token.clone())
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (`~` is expanded).
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Analysis service base URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Remote history store base URL.
    #[serde(default)]
    pub history_url: Option<String>,
    /// Signed-in user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Bearer token for the remote history store.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Largest document accepted for upload, in bytes.
    #[serde(default)]
    pub max_upload_bytes: Option<u64>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers lexai config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("lexai").await {
            Ok(pref_config) => {
                let data_dir: Option<String> = pref_config.get("data_dir").ok();
                let api_url: Option<String> = pref_config.get("api_url").ok();
                let history_url: Option<String> = pref_config.get("history_url").ok();
                let user_id: Option<String> = pref_config.get("user_id").ok();
                let auth_token: Option<String> = pref_config.get("auth_token").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let max_upload_bytes: Option<u64> =
                    pref_config.get("max_upload_bytes").ok();

                Config {
                    data_dir,
                    api_url,
                    history_url,
                    user_id,
                    auth_token,
                    user_agent,
                    request_timeout,
                    max_upload_bytes,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref dir) = self.data_dir {
            let path = shellexpand::tilde(dir);
            settings.data_dir = PathBuf::from(path.as_ref());
        }
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(ref url) = self.history_url {
            settings.history_url = Some(url.clone());
        }
        if let Some(ref user_id) = self.user_id {
            settings.user_id = Some(user_id.clone());
        }
        if let Some(ref token) = self.auth_token {
            settings.auth_token = Some(token.clone());
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
        if let Some(max) = self.max_upload_bytes {
            settings.max_upload_bytes = max;
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
