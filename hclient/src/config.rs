//! Client configuration
//!
//! [`Config`] is supplied by the caller and never mutated after the client is
//! built. It derives `Deserialize` so it can be embedded in whatever
//! configuration format the application already uses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{HClientError, Result};

/// Default identity endpoint path
pub const DEFAULT_AUTH_PATH: &str = "/oauth/token";

/// Startup parameters for an [`crate::HClient`]
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Platform base URL, e.g. `https://open.example.com`
    pub base_url: String,
    /// Identity used to obtain access tokens
    pub client_id: String,
    /// Secret paired with `client_id`
    pub client_secret: String,
    /// Identity endpoint path, relative to `base_url`
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Token lifetime assumed when the identity endpoint omits `expires_in`
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// Treat a token as stale this many seconds before it expires
    #[serde(default = "default_refresh_skew_secs")]
    pub refresh_skew_secs: u64,
    /// Default page size for structured queries
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_auth_path() -> String {
    DEFAULT_AUTH_PATH.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_token_ttl_secs() -> u64 {
    7200
}

fn default_refresh_skew_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    10
}

impl Config {
    /// Create a config with default tuning
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_path: default_auth_path(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            token_ttl_secs: default_token_ttl_secs(),
            refresh_skew_secs: default_refresh_skew_secs(),
            page_size: default_page_size(),
        }
    }

    pub fn with_auth_path(mut self, auth_path: impl Into<String>) -> Self {
        self.auth_path = auth_path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
        self.refresh_skew_secs = skew.as_secs();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Join a path onto the base URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base(), path)
        } else {
            format!("{}/{}", self.base(), path)
        }
    }

    /// Check the config is usable before any service is built
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HClientError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.client_id.trim().is_empty() {
            return Err(HClientError::Config("client_id is empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(HClientError::Config("client_secret is empty".into()));
        }
        if self.page_size == 0 {
            return Err(HClientError::Config("page_size must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(HClientError::Config("timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_path", &self.auth_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("refresh_skew_secs", &self.refresh_skew_secs)
            .field("page_size", &self.page_size)
            .finish()
    }
}
