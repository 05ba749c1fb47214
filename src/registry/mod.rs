//! Record-store access for contestants, race classes and races.
//!
//! The engine never talks to a concrete store directly. Services depend on
//! the registry traits, and a backend (in-memory or REST) is picked at
//! construction time through the factory.
//!
//! # Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Admin console (views, forms, sessions)       │
//! └─────────────────────┬────────────────────────┘
//!                       │
//! ┌─────────────────────▼────────────────────────┐
//! │ services/: seeding, swaps, rebalancing,      │
//! │ raceplan timing                              │
//! └─────────────────────┬────────────────────────┘
//!                       │
//! ┌─────────────────────▼────────────────────────┐
//! │ registry traits (repository/)                │
//! └──────────┬─────────────────────┬─────────────┘
//!            │                     │
//! ┌──────────▼──────────┐ ┌────────▼─────────────┐
//! │ LocalRegistry       │ │ RestRegistry         │
//! │ (in-memory)         │ │ (record services)    │
//! └─────────────────────┘ └──────────────────────┘
//! ```
//!
//! # Modules
//! - `repository`: the `ContestantRegistry` / `RaceRegistry` traits and
//!   `RegistryError`
//! - `repositories`: the two backends
//! - `factory`: backend selection
//! - `config`: TOML file and environment settings
//!
//! # Usage
//!
//! ```ignore
//! use raceplan_engine::registry::RegistryFactory;
//!
//! let registry = RegistryFactory::from_env()?;
//! let classes = registry.raceclasses(&event_id).await?;
//! ```

#[cfg(not(any(feature = "rest-client", feature = "local-registry")))]
compile_error!("Enable at least one registry backend feature.");

pub mod config;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use config::{RegistryConfig, RestSettings};
pub use factory::{RegistryFactory, RegistryType};
#[cfg(feature = "local-registry")]
pub use repositories::LocalRegistry;
#[cfg(feature = "rest-client")]
pub use repositories::RestRegistry;
pub use repository::{
    ContestantRegistry, ErrorContext, EventRegistry, RaceRegistry, RegistryError, RegistryResult,
};
