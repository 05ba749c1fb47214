//! Registry implementations module.
//!
//! This module contains different implementations of the registry traits:
//! - `local`: In-memory implementation for unit testing and local development
//! - `rest`: HTTP client implementation for the live record services
#[cfg(feature = "local-registry")]
pub mod local;
#[cfg(feature = "rest-client")]
pub mod rest;

#[cfg(feature = "local-registry")]
pub use local::LocalRegistry;
#[cfg(feature = "rest-client")]
pub use rest::RestRegistry;
