//! Registry trait definitions.
//!
//! The engine talks to two record services: the event service (contestants,
//! race classes) and the race service (races, start entries, raceplan
//! timing). Each gets its own trait; `EventRegistry` combines them for
//! callers that need both.

pub mod contestants;
pub mod error;
pub mod races;

pub use contestants::ContestantRegistry;
pub use error::{ErrorContext, RegistryError, RegistryResult};
pub use races::RaceRegistry;

/// Combined registry over both record services.
///
/// The engine operations take `&dyn EventRegistry`; any type implementing
/// both component traits qualifies automatically.
pub trait EventRegistry: ContestantRegistry + RaceRegistry {}

impl<T> EventRegistry for T where T: ContestantRegistry + RaceRegistry {}
