//! In-memory local registry implementation.
//!
//! This module provides a local implementation of all registry traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.
//!
//! The implementation honors the two contracts the engine leans on: bib
//! uniqueness per event is enforced on every contestant write, and
//! `update_start_time` cascades to every later race in the plan.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ContestantId, EventId, RaceId, StartEntryId};
use crate::models::{Contestant, Race, RaceTime, Raceclass, StartEntry};
use crate::registry::repository::{
    ContestantRegistry, RaceRegistry, RegistryError, RegistryResult,
};

/// In-memory local registry.
///
/// This implementation stores all data in memory, making it ideal for unit
/// tests and local development that need isolation and speed. Contestants
/// keep their insertion order per event, which is the slot order the
/// seeding allocator relies on.
///
/// # Example
/// ```ignore
/// use raceplan_engine::registry::repositories::LocalRegistry;
///
/// #[tokio::test]
/// async fn test_contestant_lookup() {
///     let registry = LocalRegistry::new();
///
///     // Pre-populate with test data
///     registry.add_contestant(/* ... */);
///
///     let holder = registry.contestant_by_bib(&event, 101).await.unwrap();
///     assert!(holder.is_some());
/// }
/// ```
#[derive(Clone)]
pub struct LocalRegistry {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    raceclasses: HashMap<EventId, Vec<Raceclass>>,
    // Insertion order per event is the service-native order
    contestants: HashMap<EventId, Vec<Contestant>>,
    races: HashMap<EventId, Vec<Race>>,

    // Fault injection for tests
    is_healthy: bool,
    is_authorized: bool,
    fail_after_writes: Option<u32>,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            raceclasses: HashMap::new(),
            contestants: HashMap::new(),
            races: HashMap::new(),
            is_healthy: true,
            is_authorized: true,
            fail_after_writes: None,
        }
    }
}

impl LocalRegistry {
    /// Create a new empty local registry.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Add a race class to the registry.
    ///
    /// This is a helper method for setting up data.
    pub fn add_raceclass(&self, raceclass: Raceclass) {
        let mut data = self.data.write();
        data.raceclasses
            .entry(raceclass.event_id.clone())
            .or_default()
            .push(raceclass);
    }

    /// Add a contestant to the registry.
    ///
    /// Contestants are listed back in insertion order, so add them in the
    /// order the record service would return them.
    pub fn add_contestant(&self, contestant: Contestant) {
        let mut data = self.data.write();
        data.contestants
            .entry(contestant.event_id.clone())
            .or_default()
            .push(contestant);
    }

    /// Add a race to the registry.
    pub fn add_race(&self, race: Race) {
        let mut data = self.data.write();
        let races = data.races.entry(race.event_id.clone()).or_default();
        races.push(race);
        races.sort_by_key(|r| r.order);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write();
        data.is_healthy = healthy;
    }

    /// Set the authorization status for testing rejected tokens.
    pub fn set_authorized(&self, authorized: bool) {
        let mut data = self.data.write();
        data.is_authorized = authorized;
    }

    /// Let the next `n` writes succeed and fail every write after that,
    /// for testing partial-failure handling.
    pub fn fail_after_writes(&self, n: u32) {
        let mut data = self.data.write();
        data.fail_after_writes = Some(n);
    }

    /// Clear all data from the registry.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            is_authorized: data.is_authorized,
            ..Default::default()
        };
    }

    /// Helper to check health and authorization, returning an error when
    /// either gate is closed.
    fn check_access(data: &LocalData) -> RegistryResult<()> {
        if !data.is_healthy {
            return Err(RegistryError::connection("Record service is not reachable"));
        }
        if !data.is_authorized {
            return Err(RegistryError::unauthorized("Bearer token rejected (401)"));
        }
        Ok(())
    }

    /// Helper consuming one write credit, failing once the budget is spent.
    fn consume_write(data: &mut LocalData) -> RegistryResult<()> {
        if let Some(remaining) = data.fail_after_writes {
            if remaining == 0 {
                return Err(RegistryError::connection(
                    "Record service dropped the write",
                ));
            }
            data.fail_after_writes = Some(remaining - 1);
        }
        Ok(())
    }
}

impl Default for LocalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContestantRegistry for LocalRegistry {
    async fn raceclasses(&self, event_id: &EventId) -> RegistryResult<Vec<Raceclass>> {
        let data = self.data.read();
        Self::check_access(&data)?;

        let mut classes = data
            .raceclasses
            .get(event_id)
            .cloned()
            .unwrap_or_default();
        classes.sort_by_key(|c| (c.group, c.order));
        Ok(classes)
    }

    async fn contestants_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Contestant>> {
        let data = self.data.read();
        Self::check_access(&data)?;

        let class = data
            .raceclasses
            .get(event_id)
            .and_then(|classes| classes.iter().find(|c| c.name == raceclass))
            .ok_or_else(|| {
                RegistryError::not_found(format!("Raceclass {} not found", raceclass))
            })?;

        let contestants = data
            .contestants
            .get(event_id)
            .map(|all| {
                all.iter()
                    .filter(|c| class.ageclasses.contains(&c.ageclass))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(contestants)
    }

    async fn contestant_by_id(
        &self,
        event_id: &EventId,
        contestant_id: &ContestantId,
    ) -> RegistryResult<Contestant> {
        let data = self.data.read();
        Self::check_access(&data)?;

        data.contestants
            .get(event_id)
            .and_then(|all| all.iter().find(|c| &c.id == contestant_id))
            .cloned()
            .ok_or_else(|| {
                RegistryError::not_found(format!("Contestant {} not found", contestant_id))
            })
    }

    async fn contestant_by_bib(
        &self,
        event_id: &EventId,
        bib: i32,
    ) -> RegistryResult<Option<Contestant>> {
        let data = self.data.read();
        Self::check_access(&data)?;

        Ok(data
            .contestants
            .get(event_id)
            .and_then(|all| all.iter().find(|c| c.bib == Some(bib)))
            .cloned())
    }

    async fn update_contestant(&self, contestant: &Contestant) -> RegistryResult<()> {
        let mut data = self.data.write();
        Self::check_access(&data)?;
        Self::consume_write(&mut data)?;

        if let Some(bib) = contestant.bib {
            let taken = data
                .contestants
                .get(&contestant.event_id)
                .map(|all| {
                    all.iter()
                        .any(|c| c.id != contestant.id && c.bib == Some(bib))
                })
                .unwrap_or(false);
            if taken {
                return Err(RegistryError::validation(format!(
                    "Bib {} is already assigned in event {}",
                    bib, contestant.event_id
                )));
            }
        }

        let slot = data
            .contestants
            .get_mut(&contestant.event_id)
            .and_then(|all| all.iter_mut().find(|c| c.id == contestant.id))
            .ok_or_else(|| {
                RegistryError::not_found(format!("Contestant {} not found", contestant.id))
            })?;
        // Replace in place so the native order survives bib updates
        *slot = contestant.clone();
        Ok(())
    }
}

#[async_trait]
impl RaceRegistry for LocalRegistry {
    async fn races_for_event(&self, event_id: &EventId) -> RegistryResult<Vec<Race>> {
        let data = self.data.read();
        Self::check_access(&data)?;

        let mut races = data.races.get(event_id).cloned().unwrap_or_default();
        races.sort_by_key(|r| r.order);
        Ok(races)
    }

    async fn races_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Race>> {
        let data = self.data.read();
        Self::check_access(&data)?;

        let mut races: Vec<Race> = data
            .races
            .get(event_id)
            .map(|all| {
                all.iter()
                    .filter(|r| r.raceclass == raceclass)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        races.sort_by_key(|r| r.order);
        Ok(races)
    }

    async fn race_by_id(&self, race_id: &RaceId) -> RegistryResult<Race> {
        let data = self.data.read();
        Self::check_access(&data)?;

        let mut race = data
            .races
            .values()
            .flatten()
            .find(|r| &r.id == race_id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("Race {} not found", race_id)))?;
        race.start_entries.sort_by_key(|e| e.starting_position);
        Ok(race)
    }

    async fn update_race(&self, race: &Race) -> RegistryResult<()> {
        let mut data = self.data.write();
        Self::check_access(&data)?;
        Self::consume_write(&mut data)?;

        let races = data
            .races
            .get_mut(&race.event_id)
            .ok_or_else(|| RegistryError::not_found(format!("Race {} not found", race.id)))?;
        let slot = races
            .iter_mut()
            .find(|r| r.id == race.id)
            .ok_or_else(|| RegistryError::not_found(format!("Race {} not found", race.id)))?;
        *slot = race.clone();
        races.sort_by_key(|r| r.order);
        Ok(())
    }

    async fn create_start_entry(&self, entry: &StartEntry) -> RegistryResult<StartEntryId> {
        let mut data = self.data.write();
        Self::check_access(&data)?;
        Self::consume_write(&mut data)?;

        let race = data
            .races
            .values_mut()
            .flatten()
            .find(|r| r.id == entry.race_id)
            .ok_or_else(|| {
                RegistryError::not_found(format!("Race {} not found", entry.race_id))
            })?;

        let id = StartEntryId::new(Uuid::new_v4().to_string());
        let mut stored = entry.clone();
        stored.id = Some(id.clone());
        race.start_entries.push(stored);
        race.start_entries.sort_by_key(|e| e.starting_position);
        Ok(id)
    }

    async fn delete_start_entry(
        &self,
        race_id: &RaceId,
        start_entry_id: &StartEntryId,
    ) -> RegistryResult<()> {
        let mut data = self.data.write();
        Self::check_access(&data)?;
        Self::consume_write(&mut data)?;

        let race = data
            .races
            .values_mut()
            .flatten()
            .find(|r| &r.id == race_id)
            .ok_or_else(|| RegistryError::not_found(format!("Race {} not found", race_id)))?;

        let before = race.start_entries.len();
        race.start_entries
            .retain(|e| e.id.as_ref() != Some(start_entry_id));
        if race.start_entries.len() == before {
            return Err(RegistryError::not_found(format!(
                "Start entry {} not found in race {}",
                start_entry_id, race_id
            )));
        }
        Ok(())
    }

    async fn update_start_time(
        &self,
        event_id: &EventId,
        order: u32,
        new_time: &RaceTime,
    ) -> RegistryResult<()> {
        let mut data = self.data.write();
        Self::check_access(&data)?;
        Self::consume_write(&mut data)?;

        let races = data
            .races
            .get_mut(event_id)
            .ok_or_else(|| RegistryError::not_found(format!("No races in event {}", event_id)))?;
        let anchor = races
            .iter()
            .find(|r| r.order == order)
            .ok_or_else(|| {
                RegistryError::not_found(format!("No race with order {} in event {}", order, event_id))
            })?;

        // Only the time-of-day travels; the date stays the race's own
        let effective =
            RaceTime::new(anchor.start_time.value().date().and_time(new_time.value().time()));
        let delta = effective - anchor.start_time;

        for race in races.iter_mut().filter(|r| r.order >= order) {
            race.start_time = race.start_time + delta;
            for entry in &mut race.start_entries {
                entry.scheduled_start_time = entry.scheduled_start_time + delta;
            }
        }
        Ok(())
    }
}
