//! Configuration for spotctl
//!
//! [`ControlConfig`] is what a [`SpotifyControl`](crate::SpotifyControl) is
//! built from. [`Config`] is the optional CLI config file stored at
//! ~/.config/spotctl/config.toml.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::discovery::{END_PORT, START_PORT};

/// Default host of the local API
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default timeout for every request, probes included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
/// Web endpoint handing out anonymous OAuth tokens
pub const DEFAULT_TOKEN_URL: &str = "https://open.spotify.com/token";
/// User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("spotctl/", env!("CARGO_PKG_VERSION"));

/// Settings used to construct a control session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    pub host: String,
    pub timeout: Duration,
    pub ports: RangeInclusive<u16>,
    pub token_url: String,
    pub user_agent: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
            ports: START_PORT..=END_PORT,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ControlConfig {
    /// Set the host; an empty host keeps the default
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        if !host.is_empty() {
            self.host = host;
        }
        self
    }

    /// Set the request timeout; a zero timeout keeps the default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    /// Set the port range scanned during discovery
    pub fn with_ports(mut self, ports: RangeInclusive<u16>) -> Self {
        self.ports = ports;
        self
    }

    /// Set the OAuth token endpoint (for testing)
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// CLI configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host running the Spotify desktop client
    pub host: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/spotctl/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("spotctl").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    /// Parse config from TOML, None if malformed
    pub fn parse(s: &str) -> Option<Self> {
        match toml::from_str(s) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed config file");
                None
            }
        }
    }

    /// Merge file values with overrides into a session config
    ///
    /// Overrides (flags, then environment) win over the file.
    pub fn resolve(&self, host: Option<&str>, timeout_ms: Option<u64>) -> ControlConfig {
        let mut config = ControlConfig::default();

        if let Some(h) = host.or(self.host.as_deref()) {
            config = config.with_host(h);
        }
        if let Some(ms) = timeout_ms.or(self.timeout_ms) {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }
}
