//! Bib and start-entry exchange operations.
//!
//! Bibs are unique per event, so a swap can never present two holders of
//! one bib to the record service. Every exchange here is sequenced as
//! clear-then-assign: free a bib first, hand it over afterwards.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::{ContestantId, EventId, RaceId};
use crate::models::StartEntry;
use crate::registry::repository::{EventRegistry, RegistryError, RegistryResult};
use crate::services::error::{EngineError, EngineResult};

/// Outcome of a `swap_bibs` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapBibsOutcome {
    /// Both contestants exchanged bibs.
    Swapped { bib1: i32, bib2: i32 },
    /// Both sides named the same bib; nothing was read or written.
    Unchanged,
    /// No contestant holds this bib; the other side was left as found.
    BibNotFound { bib: i32 },
}

impl std::fmt::Display for SwapBibsOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Swapped { bib1, bib2 } => write!(f, "Bibs swapped: {bib1} <> {bib2}."),
            Self::Unchanged => write!(f, "No change."),
            Self::BibNotFound { bib } => write!(f, "Bib {bib} not found."),
        }
    }
}

/// Exchange the bibs of the two contestants currently holding `bib1` and
/// `bib2`.
///
/// The exchange runs in two phases: the holder of `bib1` is stripped first,
/// freeing that bib, then `bib1` goes to the holder of `bib2` and `bib2` to
/// the stripped contestant. If the second holder turns out not to exist, the
/// first one gets `bib1` back before the call reports
/// [`SwapBibsOutcome::BibNotFound`]; only when that restore write itself
/// fails does the call surface [`EngineError::PartialSwap`].
pub async fn swap_bibs(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    bib1: i32,
    bib2: i32,
) -> EngineResult<SwapBibsOutcome> {
    if bib1 == bib2 {
        return Ok(SwapBibsOutcome::Unchanged);
    }

    let Some(mut contestant1) = registry.contestant_by_bib(event_id, bib1).await? else {
        return Ok(SwapBibsOutcome::BibNotFound { bib: bib1 });
    };

    // Free bib1 so the store never sees two holders of one bib.
    contestant1.bib = None;
    registry.update_contestant(&contestant1).await?;

    let contestant2 = match registry.contestant_by_bib(event_id, bib2).await {
        Ok(Some(contestant2)) => contestant2,
        Ok(None) => {
            // Give bib1 back before reporting the missing side.
            contestant1.bib = Some(bib1);
            if let Err(err) = registry.update_contestant(&contestant1).await {
                return Err(partial_swap(bib1, &contestant1.id, err));
            }
            return Ok(SwapBibsOutcome::BibNotFound { bib: bib2 });
        }
        Err(err) => return Err(partial_swap(bib1, &contestant1.id, err)),
    };

    let mut contestant2 = contestant2;
    contestant2.bib = Some(bib1);
    if let Err(err) = registry.update_contestant(&contestant2).await {
        return Err(partial_swap(bib1, &contestant1.id, err));
    }

    contestant1.bib = Some(bib2);
    if let Err(err) = registry.update_contestant(&contestant1).await {
        return Err(partial_swap(bib2, &contestant1.id, err));
    }

    debug!("Swapped bibs {} and {} in event {}", bib1, bib2, event_id);
    Ok(SwapBibsOutcome::Swapped { bib1, bib2 })
}

fn partial_swap(bib: i32, contestant_id: &ContestantId, source: RegistryError) -> EngineError {
    warn!(
        "Bib swap interrupted, bib {} has no holder (contestant {}): {}",
        bib, contestant_id, source
    );
    EngineError::PartialSwap {
        bib_left_unassigned: bib,
        contestant_id: contestant_id.clone(),
        source,
    }
}

/// Outcome of an `assign_bib` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignBibOutcome {
    /// The contestant now holds the bib.
    Assigned {
        bib: i32,
        contestant_id: ContestantId,
        contestant_name: String,
        /// Previous holder of the bib, stripped to make room.
        freed_holder: Option<ContestantId>,
    },
    /// The target contestant does not exist. A previous holder of the bib
    /// has already been stripped by the time this is known.
    ContestantNotFound {
        contestant_id: ContestantId,
        freed_holder: Option<ContestantId>,
    },
}

impl std::fmt::Display for AssignBibOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned {
                bib,
                contestant_name,
                ..
            } => write!(f, "Bib {bib} assigned to {contestant_name}."),
            Self::ContestantNotFound { contestant_id, .. } => {
                write!(f, "Contestant {contestant_id} not found.")
            }
        }
    }
}

/// Give `new_bib` to one contestant, stripping any current holder first.
///
/// This is the manual seeding flow: the organizer types a bib next to a
/// name and whoever held the number before loses it. The freed holder is
/// reported in the outcome so the console can show who is bib-less now.
pub async fn assign_bib(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    contestant_id: &ContestantId,
    new_bib: i32,
) -> EngineResult<AssignBibOutcome> {
    let freed_holder = match registry.contestant_by_bib(event_id, new_bib).await? {
        Some(mut holder) if holder.id != *contestant_id => {
            holder.bib = None;
            registry.update_contestant(&holder).await?;
            debug!(
                "Freed bib {} from contestant {} in event {}",
                new_bib, holder.id, event_id
            );
            Some(holder.id)
        }
        _ => None,
    };

    let mut contestant = match registry.contestant_by_id(event_id, contestant_id).await {
        Ok(contestant) => contestant,
        Err(RegistryError::NotFound { .. }) => {
            warn!(
                "Contestant {} not found while assigning bib {}",
                contestant_id, new_bib
            );
            return Ok(AssignBibOutcome::ContestantNotFound {
                contestant_id: contestant_id.clone(),
                freed_holder,
            });
        }
        Err(err) => return Err(err.into()),
    };

    contestant.bib = Some(new_bib);
    registry.update_contestant(&contestant).await?;
    Ok(AssignBibOutcome::Assigned {
        bib: new_bib,
        contestant_id: contestant.id,
        contestant_name: contestant.last_name,
        freed_holder,
    })
}

/// Outcome of one slot index within a `swap_start_entries` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSwapOutcome {
    /// Both entries were replaced with identity-exchanged copies.
    Swapped {
        slot_index: usize,
        bib_from: i32,
        bib_to: i32,
    },
    /// One of the races has no entry at this position (smaller heat).
    SkippedMissing { slot_index: usize },
    /// The four-write replacement was interrupted; whatever already landed
    /// is not rolled back.
    PartialFailure { slot_index: usize },
}

impl std::fmt::Display for SlotSwapOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Swapped {
                slot_index,
                bib_from,
                bib_to,
            } => write!(f, "Slot {slot_index}: bibs {bib_from} <> {bib_to}."),
            Self::SkippedMissing { slot_index } => {
                write!(f, "Slot {slot_index}: no entry on one side, skipped.")
            }
            Self::PartialFailure { slot_index } => {
                write!(f, "Slot {slot_index}: swap interrupted mid-way.")
            }
        }
    }
}

/// Exchange the contestant identities of two start lists at the given
/// 0-based slot indexes.
///
/// For each index, entry A (from `from_race_id`) and entry B (from
/// `to_race_id`) at that position are deleted and recreated with `bib`,
/// `name` and `club` exchanged; `startlist_id`, `race_id`,
/// `starting_position` and `scheduled_start_time` stay with their slot.
///
/// Indexes are handled independently and best-effort: a missing entry or a
/// mid-swap write failure only affects that index, and earlier indexes are
/// never rolled back. An unauthorized response aborts the whole call.
pub async fn swap_start_entries(
    registry: &dyn EventRegistry,
    from_race_id: &RaceId,
    to_race_id: &RaceId,
    slot_indexes: &[usize],
) -> EngineResult<Vec<SlotSwapOutcome>> {
    let from_race = registry.race_by_id(from_race_id).await?;
    let to_race = registry.race_by_id(to_race_id).await?;

    let mut outcomes = Vec::with_capacity(slot_indexes.len());
    for &slot_index in slot_indexes {
        let (Some(entry_a), Some(entry_b)) = (
            from_race.start_entries.get(slot_index),
            to_race.start_entries.get(slot_index),
        ) else {
            warn!(
                "No start entry at slot {} in race {} or {}, skipping swap",
                slot_index, from_race_id, to_race_id
            );
            outcomes.push(SlotSwapOutcome::SkippedMissing { slot_index });
            continue;
        };

        match swap_one_slot(registry, entry_a, entry_b).await {
            Ok(()) => {
                debug!(
                    "Swapped slot {} between races {} and {}",
                    slot_index, from_race_id, to_race_id
                );
                outcomes.push(SlotSwapOutcome::Swapped {
                    slot_index,
                    bib_from: entry_a.bib,
                    bib_to: entry_b.bib,
                });
            }
            Err(err) if err.is_unauthorized() => return Err(err.into()),
            Err(err) => {
                warn!(
                    "Swap of slot {} between races {} and {} failed: {}",
                    slot_index, from_race_id, to_race_id, err
                );
                outcomes.push(SlotSwapOutcome::PartialFailure { slot_index });
            }
        }
    }
    Ok(outcomes)
}

/// Delete both entries and recreate them with identities exchanged.
async fn swap_one_slot(
    registry: &dyn EventRegistry,
    entry_a: &StartEntry,
    entry_b: &StartEntry,
) -> RegistryResult<()> {
    let id_a = entry_a
        .id
        .as_ref()
        .ok_or_else(|| RegistryError::internal("Start entry without id"))?;
    let id_b = entry_b
        .id
        .as_ref()
        .ok_or_else(|| RegistryError::internal("Start entry without id"))?;

    let replacement_a = StartEntry {
        id: None,
        startlist_id: entry_a.startlist_id.clone(),
        race_id: entry_a.race_id.clone(),
        bib: entry_b.bib,
        starting_position: entry_a.starting_position,
        scheduled_start_time: entry_a.scheduled_start_time,
        name: entry_b.name.clone(),
        club: entry_b.club.clone(),
    };
    let replacement_b = StartEntry {
        id: None,
        startlist_id: entry_b.startlist_id.clone(),
        race_id: entry_b.race_id.clone(),
        bib: entry_a.bib,
        starting_position: entry_b.starting_position,
        scheduled_start_time: entry_b.scheduled_start_time,
        name: entry_a.name.clone(),
        club: entry_a.club.clone(),
    };

    registry.delete_start_entry(&entry_a.race_id, id_a).await?;
    registry.delete_start_entry(&entry_b.race_id, id_b).await?;
    registry.create_start_entry(&replacement_a).await?;
    registry.create_start_entry(&replacement_b).await?;
    Ok(())
}
