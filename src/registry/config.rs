//! Registry configuration file support.
//!
//! This module provides utilities for reading registry configuration from
//! TOML configuration files and from the environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RegistryType;
use super::repository::RegistryError;

/// Registry configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub registry: RegistrySettings,
    #[serde(default)]
    pub rest: RestSettings,
}

/// Registry type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(rename = "type")]
    pub registry_type: String,
}

/// Record service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestSettings {
    #[serde(default = "default_event_service_url")]
    pub event_service_url: String,
    #[serde(default = "default_race_service_url")]
    pub race_service_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

fn default_event_service_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_race_service_url() -> String {
    "http://localhost:8088".to_string()
}

fn default_request_timeout() -> u64 {
    20
}

impl Default for RestSettings {
    fn default() -> Self {
        Self {
            event_service_url: default_event_service_url(),
            race_service_url: default_race_service_url(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl RestSettings {
    /// Build settings from the record services' host/port environment
    /// variables (`EVENTS_HOST_SERVER`, `EVENTS_HOST_PORT`,
    /// `RACE_HOST_SERVER`, `RACE_HOST_PORT`), falling back to localhost
    /// defaults.
    pub fn from_env() -> Self {
        let events_host =
            std::env::var("EVENTS_HOST_SERVER").unwrap_or_else(|_| "localhost".to_string());
        let events_port = std::env::var("EVENTS_HOST_PORT").unwrap_or_else(|_| "8082".to_string());
        let race_host =
            std::env::var("RACE_HOST_SERVER").unwrap_or_else(|_| "localhost".to_string());
        let race_port = std::env::var("RACE_HOST_PORT").unwrap_or_else(|_| "8088".to_string());

        Self {
            event_service_url: format!("http://{}:{}", events_host, events_port),
            race_service_url: format!("http://{}:{}", race_host, race_port),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Load registry configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RegistryConfig)` if successful
    /// * `Err(RegistryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RegistryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RegistryConfig = toml::from_str(&content).map_err(|e| {
            RegistryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load registry configuration from the default location.
    ///
    /// Searches for `registry.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    ///
    /// # Returns
    /// * `Ok(RegistryConfig)` if found and parsed successfully
    /// * `Err(RegistryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RegistryError> {
        let search_paths = vec![
            PathBuf::from("registry.toml"),
            PathBuf::from("../registry.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RegistryError::configuration(
            "No registry.toml found in standard locations",
        ))
    }

    /// Get the registry type from configuration.
    pub fn registry_type(&self) -> Result<RegistryType, String> {
        RegistryType::from_str(&self.registry.registry_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[registry]
type = "local"
"#;

        let config: RegistryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.registry.registry_type, "local");
        assert_eq!(config.registry_type().unwrap(), RegistryType::Local);
        assert_eq!(config.rest.event_service_url, "http://localhost:8082");
    }

    #[test]
    fn test_parse_rest_config() {
        let toml = r#"
[registry]
type = "rest"

[rest]
event_service_url = "http://events.example.org:8082"
race_service_url = "http://races.example.org:8088"
request_timeout_sec = 5
"#;

        let config: RegistryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.registry_type().unwrap(), RegistryType::Rest);
        assert_eq!(config.rest.event_service_url, "http://events.example.org:8082");
        assert_eq!(config.rest.race_service_url, "http://races.example.org:8088");
        assert_eq!(config.rest.request_timeout_sec, 5);
    }

    #[test]
    fn test_rest_settings_defaults() {
        let toml = r#"
[registry]
type = "rest"

[rest]
event_service_url = "http://events.example.org:8082"
"#;

        let config: RegistryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.rest.race_service_url, "http://localhost:8088");
        assert_eq!(config.rest.request_timeout_sec, 20);
    }
}
