//! Environment-derived client configuration.
//!
//! Resolved once at startup and passed to `Transport::new`. Missing, blank
//! or unparseable values fall back to the defaults below; resolution never
//! fails.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_APP_NAME: &str = "User Management";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

pub const BASE_URL_VAR: &str = "API_BASE_URL";
pub const TIMEOUT_VAR: &str = "API_TIMEOUT";
pub const APP_NAME_VAR: &str = "APP_NAME";
pub const APP_VERSION_VAR: &str = "APP_VERSION";

/// Identity of the consuming application, sent as the `User-Agent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl AppInfo {
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Applied to every request, connect through body.
    pub timeout: Duration,
    pub app: AppInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            app: AppInfo::default(),
        }
    }
}

impl Config {
    /// Resolve from the process environment.
    pub fn resolve() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = non_blank(BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // A zero timeout would fail every request immediately.
        let timeout_ms = non_blank(TIMEOUT_VAR)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let defaults = AppInfo::default();
        let app = AppInfo {
            name: non_blank(APP_NAME_VAR).unwrap_or(defaults.name),
            version: non_blank(APP_VERSION_VAR).unwrap_or(defaults.version),
        };

        let config = Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            app,
        };
        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms,
            "resolved client configuration"
        );
        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
