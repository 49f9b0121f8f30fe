// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers the status service location, poll cadence, and UI preferences.

use serde::{Deserialize, Serialize};

/// Default base URL for the pool status service
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the configured server URL
pub const SERVER_URL_ENV: &str = "POOLWATCH_SERVER";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the pool status service (env var takes precedence)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Report feed poll interval in seconds
    #[serde(default = "default_poll_secs")]
    pub feed_poll_secs: u64,

    /// Weather gate poll interval in seconds
    #[serde(default = "default_poll_secs")]
    pub gate_poll_secs: u64,

    /// Report feed panel expanded state
    #[serde(default = "default_true")]
    pub feed_panel_expanded: bool,
}

// Default value functions for serde
fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_poll_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            feed_poll_secs: default_poll_secs(),
            gate_poll_secs: default_poll_secs(),
            feed_panel_expanded: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load("poolwatch-desktop", "config")
    }

    /// Save configuration to disk
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store("poolwatch-desktop", "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path("poolwatch-desktop", "config")
    }

    /// Resolve the service URL: command-line flag first, then the
    /// environment variable, then the config file
    pub fn resolve_server_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(SERVER_URL_ENV).ok();
        resolve_server_url_from(cli_override, env_value.as_deref(), self)
    }
}

fn resolve_server_url_from(cli: Option<&str>, env: Option<&str>, config: &AppConfig) -> String {
    if let Some(url) = cli.filter(|url| !url.is_empty()) {
        return url.to_string();
    }
    if let Some(url) = env.filter(|url| !url.is_empty()) {
        return url.to_string();
    }
    config.server_url.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.feed_poll_secs, 60);
        assert_eq!(config.gate_poll_secs, 60);
        assert!(config.feed_panel_expanded);
    }

    #[test]
    fn test_server_url_precedence() {
        let config = AppConfig {
            server_url: "http://from-config:5000".to_string(),
            ..Default::default()
        };

        assert_eq!(
            resolve_server_url_from(
                Some("http://from-cli:5000"),
                Some("http://from-env:5000"),
                &config
            ),
            "http://from-cli:5000"
        );
        assert_eq!(
            resolve_server_url_from(None, Some("http://from-env:5000"), &config),
            "http://from-env:5000"
        );
        assert_eq!(
            resolve_server_url_from(None, None, &config),
            "http://from-config:5000"
        );
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let config = AppConfig::default();
        assert_eq!(
            resolve_server_url_from(Some(""), Some(""), &config),
            DEFAULT_SERVER_URL
        );
    }
}
