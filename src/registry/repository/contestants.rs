//! Contestant registry trait for event record service operations.
//!
//! This trait covers the contestant and race-class records held by the
//! event record service: lookups by race class, id and bib, plus the
//! single-record update the bib-swap machinery is built on.

use async_trait::async_trait;

use super::error::RegistryResult;
use crate::api::{ContestantId, EventId};
use crate::models::{Contestant, Raceclass};

/// Registry trait for contestant operations.
///
/// All reads hit the record service directly; the engine never caches
/// contestants across writes. Lookups are scoped to a single event.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; callers hold them behind `Arc`.
#[async_trait]
pub trait ContestantRegistry: Send + Sync {
    /// Fetch all race classes of an event, in class order.
    ///
    /// # Arguments
    /// * `event_id` - The event to list classes for
    ///
    /// # Returns
    /// * `Ok(Vec<Raceclass>)` - All race classes of the event
    /// * `Err(RegistryError)` - If the operation fails
    async fn raceclasses(&self, event_id: &EventId) -> RegistryResult<Vec<Raceclass>>;

    /// Fetch the contestants of one race class.
    ///
    /// The returned order is the service's native order and doubles as the
    /// slot order during seeding: index `n` is the contestant whose bib
    /// marks slot `n` of the class.
    ///
    /// # Arguments
    /// * `event_id` - The event the class belongs to
    /// * `raceclass` - Race class name (e.g. "J19")
    ///
    /// # Returns
    /// * `Ok(Vec<Contestant>)` - Contestants whose age class belongs to the race class
    /// * `Err(RegistryError)` - If the operation fails
    async fn contestants_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Contestant>>;

    /// Fetch a single contestant by id.
    ///
    /// # Arguments
    /// * `event_id` - The event the contestant belongs to
    /// * `contestant_id` - The contestant's id
    ///
    /// # Returns
    /// * `Ok(Contestant)` - The current record
    /// * `Err(RegistryError::NotFound)` - If no such contestant exists
    async fn contestant_by_id(
        &self,
        event_id: &EventId,
        contestant_id: &ContestantId,
    ) -> RegistryResult<Contestant>;

    /// Fetch the contestant currently holding a bib, if any.
    ///
    /// # Arguments
    /// * `event_id` - The event to search in
    /// * `bib` - The bib number
    ///
    /// # Returns
    /// * `Ok(Some(Contestant))` - The holder of the bib
    /// * `Ok(None)` - No contestant holds the bib
    /// * `Err(RegistryError)` - If the operation fails
    async fn contestant_by_bib(
        &self,
        event_id: &EventId,
        bib: i32,
    ) -> RegistryResult<Option<Contestant>>;

    /// Persist a contestant record.
    ///
    /// The record carries its own event and contestant ids. Implementations
    /// reject updates that would give two contestants of one event the same
    /// bib.
    ///
    /// # Arguments
    /// * `contestant` - The full record to store
    ///
    /// # Returns
    /// * `Ok(())` - Record stored
    /// * `Err(RegistryError)` - If the operation fails
    async fn update_contestant(&self, contestant: &Contestant) -> RegistryResult<()>;
}
