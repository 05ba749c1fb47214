//! Registry factory for dependency injection.
//!
//! This module provides utilities for creating and configuring registry
//! instances based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::{RegistryConfig, RestSettings};
#[cfg(feature = "local-registry")]
use super::repositories::LocalRegistry;
#[cfg(feature = "rest-client")]
use super::repositories::RestRegistry;
use super::repository::{EventRegistry, RegistryError, RegistryResult};

/// Registry type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryType {
    /// HTTP client against the live record services
    Rest,
    /// In-memory local registry
    Local,
}

impl FromStr for RegistryType {
    type Err = String;

    /// Parse registry type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("rest", "local")
    ///
    /// # Returns
    /// * `Ok(RegistryType)` if valid
    /// * `Err` if invalid
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" | "http" => Ok(Self::Rest),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown registry type: {}", s)),
        }
    }
}

impl RegistryType {
    /// Get registry type from environment variable.
    ///
    /// Reads `REGISTRY_TYPE` environment variable. Defaults to Rest if a
    /// record service host is configured, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REGISTRY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("EVENTS_HOST_SERVER").is_ok() || std::env::var("RACE_HOST_SERVER").is_ok()
        {
            Self::Rest
        } else {
            Self::Local
        }
    }
}

/// Registry factory for creating registry instances.
///
/// Builds a backend from explicit settings, environment variables, or a
/// configuration file, and hands it back as `Arc<dyn EventRegistry>`.
///
/// # Example
/// ```ignore
/// use raceplan_engine::registry::{RegistryFactory, RegistryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // In-memory registry for development
///     let local = RegistryFactory::create_local();
///
///     // Client against the live services, with the session's token
///     let settings = raceplan_engine::registry::RestSettings::from_env();
///     let _rest = RegistryFactory::create_rest(&settings, "token")?;
///
///     Ok(())
/// }
/// ```
pub struct RegistryFactory;

impl RegistryFactory {
    /// Create a registry instance based on type.
    ///
    /// # Arguments
    /// * `registry_type` - Type of registry to create
    /// * `rest_settings` - Service endpoints (required for Rest)
    /// * `token` - Bearer token (required for Rest)
    ///
    /// # Returns
    /// * `Ok(Arc<dyn EventRegistry>)` - Boxed registry instance
    /// * `Err(RegistryError)` - If creation fails
    pub fn create(
        registry_type: RegistryType,
        rest_settings: Option<&RestSettings>,
        token: Option<&str>,
    ) -> RegistryResult<Arc<dyn EventRegistry>> {
        match registry_type {
            RegistryType::Rest => {
                #[cfg(feature = "rest-client")]
                {
                    let settings = rest_settings.ok_or_else(|| {
                        RegistryError::configuration("Rest registry requires RestSettings")
                    })?;
                    let token = token.ok_or_else(|| {
                        RegistryError::configuration("Rest registry requires a bearer token")
                    })?;
                    let rest = Self::create_rest(settings, token)?;
                    Ok(rest as Arc<dyn EventRegistry>)
                }
                #[cfg(not(feature = "rest-client"))]
                {
                    let _ = (rest_settings, token);
                    Err(RegistryError::configuration(
                        "Rest registry feature not enabled",
                    ))
                }
            }
            RegistryType::Local => {
                #[cfg(feature = "local-registry")]
                {
                    Ok(Self::create_local())
                }
                #[cfg(not(feature = "local-registry"))]
                {
                    Err(RegistryError::configuration(
                        "Local registry feature not enabled",
                    ))
                }
            }
        }
    }

    /// Create a REST client registry.
    ///
    /// # Arguments
    /// * `settings` - Service endpoints and timeout
    /// * `token` - Bearer token of the logged-in user
    ///
    /// # Returns
    /// * `Ok(Arc<RestRegistry>)` - REST registry instance
    /// * `Err(RegistryError)` - If initialization fails
    #[cfg(feature = "rest-client")]
    pub fn create_rest(
        settings: &RestSettings,
        token: impl Into<String>,
    ) -> RegistryResult<Arc<RestRegistry>> {
        let registry = RestRegistry::new(settings, token)?;
        Ok(Arc::new(registry))
    }

    /// Create an in-memory local registry.
    ///
    /// # Returns
    /// Boxed local registry instance
    #[cfg(feature = "local-registry")]
    pub fn create_local() -> Arc<dyn EventRegistry> {
        Arc::new(LocalRegistry::new())
    }

    /// Create a registry from environment configuration.
    ///
    /// Reads `REGISTRY_TYPE` to pick the backend. For the Rest backend the
    /// service endpoints come from the host/port environment variables and
    /// the bearer token from `REGISTRY_TOKEN`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn EventRegistry>)` - Registry instance
    /// * `Err(RegistryError)` - If creation fails
    pub fn from_env() -> RegistryResult<Arc<dyn EventRegistry>> {
        let registry_type = RegistryType::from_env();

        match registry_type {
            RegistryType::Rest => {
                let settings = RestSettings::from_env();
                let token = std::env::var("REGISTRY_TOKEN").unwrap_or_default();
                Self::create(RegistryType::Rest, Some(&settings), Some(&token))
            }
            RegistryType::Local => Self::create(RegistryType::Local, None, None),
        }
    }

    /// Create a registry from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the registry.toml configuration file
    /// * `token` - Bearer token for the Rest backend (ignored for Local)
    ///
    /// # Returns
    /// * `Ok(Arc<dyn EventRegistry>)` - Registry instance
    /// * `Err(RegistryError)` - If creation fails
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
        token: Option<&str>,
    ) -> RegistryResult<Arc<dyn EventRegistry>> {
        let config = RegistryConfig::from_file(config_path)?;
        Self::from_registry_config(&config, token)
    }

    /// Create a registry from a RegistryConfig instance.
    fn from_registry_config(
        config: &RegistryConfig,
        token: Option<&str>,
    ) -> RegistryResult<Arc<dyn EventRegistry>> {
        let registry_type = config.registry_type().map_err(|e| {
            RegistryError::configuration(format!("Invalid registry type: {}", e))
        })?;

        Self::create(registry_type, Some(&config.rest), token)
    }
}
