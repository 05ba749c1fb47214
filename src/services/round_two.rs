//! Reshuffling of second-round heats for unranked classes.
//!
//! Round-one heats are drawn, and round two keeps the draw order, so
//! adjacent heats tend to reproduce round-one pairings. Trading a few
//! fixed slots with the previous heat breaks most repeat match-ups
//! without a full re-draw.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::{EventId, RaceId};
use crate::models::RaceRound;
use crate::registry::repository::EventRegistry;
use crate::services::error::EngineResult;
use crate::services::swaps::{swap_start_entries, SlotSwapOutcome};

/// Slot indexes traded with the previous heat. Odd heat numbers give away
/// two slots, even ones three, so consecutive heats exchange different
/// lanes.
const ODD_HEAT_SLOTS: [usize; 2] = [1, 3];
const EVEN_HEAT_SLOTS: [usize; 3] = [0, 2, 4];

/// Aggregated rebalance result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebalanceReport {
    /// Slot moves attempted, two per odd heat and three per even heat.
    pub moves: u32,
    pub slot_outcomes: Vec<SlotSwapOutcome>,
}

impl std::fmt::Display for RebalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.moves > 0 {
            write!(
                f,
                "Round two for unranked classes reshuffled: {} moves.",
                self.moves
            )
        } else {
            write!(f, "No round-two heats to reshuffle.")
        }
    }
}

/// Reshuffle round-two start lists so nobody meets the same heat twice.
///
/// Every race class with `ranking == false` is walked in turn. Each `R2`
/// race except the first trades start-entry slots with the race right
/// before it in the class's plan: indexes `[1, 3]` for odd heat numbers,
/// `[0, 2, 4]` for even ones. Slot trades follow the best-effort semantics
/// of [`swap_start_entries`]; a pair whose races cannot be read is skipped
/// with a warning, and an unauthorized response aborts the whole run.
pub async fn rebalance_round_two(
    registry: &dyn EventRegistry,
    event_id: &EventId,
) -> EngineResult<RebalanceReport> {
    let raceclasses = registry.raceclasses(event_id).await?;

    let mut report = RebalanceReport::default();
    for raceclass in raceclasses.iter().filter(|class| !class.ranking) {
        let races = registry
            .races_by_raceclass(event_id, &raceclass.name)
            .await?;

        // Pair every R2 race with whatever race comes right before it in
        // the class's plan. For the second R2 heat onwards that is the
        // previous R2 heat.
        let mut previous_race_id: Option<&RaceId> = None;
        let mut pairs: Vec<(u32, &RaceId, Option<&RaceId>)> = Vec::new();
        for race in &races {
            if race.round == RaceRound::RoundTwo {
                pairs.push((race.heat, &race.id, previous_race_id));
            }
            previous_race_id = Some(&race.id);
        }

        // The first R2 heat has nothing earlier in its round to trade with.
        for (heat, race_id, previous) in pairs.into_iter().skip(1) {
            let Some(previous) = previous else {
                continue;
            };
            let slots: &[usize] = if heat % 2 == 1 {
                &ODD_HEAT_SLOTS
            } else {
                &EVEN_HEAT_SLOTS
            };

            match swap_start_entries(registry, race_id, previous, slots).await {
                Ok(outcomes) => {
                    report.moves += slots.len() as u32;
                    report.slot_outcomes.extend(outcomes);
                }
                Err(err) if err.is_unauthorized() => return Err(err),
                Err(err) if err.is_not_found() => {
                    warn!(
                        "Round-two pair {} / {} in {} skipped: {}",
                        race_id, previous, raceclass.name, err
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
    Ok(report)
}
