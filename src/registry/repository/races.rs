//! Race registry trait for race record service operations.
//!
//! This trait covers races, start entries and the raceplan start-time
//! cascade held by the race record service.

use async_trait::async_trait;

use super::error::RegistryResult;
use crate::api::{EventId, RaceId, StartEntryId};
use crate::models::{Race, RaceTime, StartEntry};

/// Registry trait for race and start-list operations.
///
/// # Thread Safety
/// Implementations are shared across tasks and must be `Send + Sync`.
#[async_trait]
pub trait RaceRegistry: Send + Sync {
    // ==================== Races ====================

    /// Fetch every race of an event, ascending by `order`.
    ///
    /// # Arguments
    /// * `event_id` - The event to list races for
    ///
    /// # Returns
    /// * `Ok(Vec<Race>)` - The full race plan in schedule order
    /// * `Err(RegistryError)` - If the operation fails
    async fn races_for_event(&self, event_id: &EventId) -> RegistryResult<Vec<Race>>;

    /// Fetch the races of one race class, ascending by `order`.
    ///
    /// # Arguments
    /// * `event_id` - The event the class belongs to
    /// * `raceclass` - Race class name
    ///
    /// # Returns
    /// * `Ok(Vec<Race>)` - The class's races in schedule order
    /// * `Err(RegistryError)` - If the operation fails
    async fn races_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Race>>;

    /// Fetch a single race with its start entries.
    ///
    /// Start entries come back ascending by `starting_position`.
    ///
    /// # Arguments
    /// * `race_id` - The race's id
    ///
    /// # Returns
    /// * `Ok(Race)` - The race with `start_entries` populated
    /// * `Err(RegistryError::NotFound)` - If no such race exists
    async fn race_by_id(&self, race_id: &RaceId) -> RegistryResult<Race>;

    /// Persist a single race record.
    ///
    /// This is a plain record write: changing `start_time` here moves only
    /// this race and leaves the rest of the plan untouched.
    ///
    /// # Arguments
    /// * `race` - The full record to store
    ///
    /// # Returns
    /// * `Ok(())` - Record stored
    /// * `Err(RegistryError)` - If the operation fails
    async fn update_race(&self, race: &Race) -> RegistryResult<()>;

    // ==================== Start entries ====================

    /// Create a start entry in the race named by `entry.race_id`.
    ///
    /// # Arguments
    /// * `entry` - The entry to create (`id` is ignored and service-assigned)
    ///
    /// # Returns
    /// * `Ok(StartEntryId)` - The id assigned by the service
    /// * `Err(RegistryError)` - If the operation fails
    async fn create_start_entry(&self, entry: &StartEntry) -> RegistryResult<StartEntryId>;

    /// Delete a start entry from a race.
    ///
    /// # Arguments
    /// * `race_id` - The race holding the entry
    /// * `start_entry_id` - The entry to delete
    ///
    /// # Returns
    /// * `Ok(())` - Entry deleted
    /// * `Err(RegistryError)` - If the operation fails
    async fn delete_start_entry(
        &self,
        race_id: &RaceId,
        start_entry_id: &StartEntryId,
    ) -> RegistryResult<()>;

    // ==================== Raceplan timing ====================

    /// Move the race at `order` to `new_time`, cascading to later races.
    ///
    /// Contract: the race whose `order` matches takes `new_time` exactly,
    /// and every race with a higher `order` shifts by the same delta, so
    /// the spacing of the remainder of the plan is preserved. Only the
    /// time-of-day of `new_time` travels on the wire; the date stays the
    /// race's own.
    ///
    /// # Arguments
    /// * `event_id` - The event whose plan is adjusted
    /// * `order` - Global schedule key of the race to move
    /// * `new_time` - The race's new start time
    ///
    /// # Returns
    /// * `Ok(())` - Plan adjusted
    /// * `Err(RegistryError::NotFound)` - If no race has the given order
    async fn update_start_time(
        &self,
        event_id: &EventId,
        order: u32,
        new_time: &RaceTime,
    ) -> RegistryResult<()>;
}
