//! Seeding of contestants into qualification heats.
//!
//! Seeding points rank the field (lower is better). The allocator walks the
//! ranked contestants and hands rank `i` the bib currently sitting at slot
//! `i % H` of the class, heat by heat, so the best seeds spread across all
//! heats instead of stacking up in the first one.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::EventId;
use crate::models::{Race, RaceRound};
use crate::registry::repository::{EventRegistry, RegistryError};
use crate::services::error::{EngineError, EngineResult};
use crate::services::swaps::{swap_bibs, SwapBibsOutcome};

/// Running totals of qualification-heat sizes.
///
/// `boundaries[i]` is the number of contestants in heats `1..=i+1`; the
/// length is the number of heats. Classes without qualification races
/// (unranked classes run `R1`/`R2`) produce an empty sequence and cannot
/// be seeded.
pub(crate) fn heat_boundaries(races: &[Race]) -> Vec<u32> {
    let mut boundaries = Vec::new();
    let mut count = 0;
    for race in races {
        if race.round == RaceRound::Qualification {
            count += race.no_of_contestants;
            boundaries.push(count);
        }
    }
    boundaries
}

/// Seeding result for one race class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSeedingOutcome {
    pub raceclass: String,
    /// False when the class has no qualification heats to seed into.
    pub seedable: bool,
    pub swaps: Vec<SwapBibsOutcome>,
    /// Ranks whose target slot or bib could not be resolved.
    pub skipped: u32,
    /// Rendered errors from swaps interrupted mid-write.
    pub failures: Vec<String>,
}

impl std::fmt::Display for ClassSeedingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seedable {
            return write!(f, "{}: no qualification heats to seed.", self.raceclass);
        }
        write!(f, "{}:", self.raceclass)?;
        if self.swaps.is_empty() && self.failures.is_empty() {
            write!(f, " no seeded contestants.")?;
        }
        for swap in &self.swaps {
            write!(f, " {swap}")?;
        }
        if self.skipped > 0 {
            write!(f, " Skipped {} ranks.", self.skipped)?;
        }
        for failure in &self.failures {
            write!(f, " {failure}")?;
        }
        Ok(())
    }
}

/// Aggregated seeding result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedingReport {
    pub classes: Vec<ClassSeedingOutcome>,
}

impl std::fmt::Display for SeedingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.classes.len() > 1 {
            write!(f, "All classes seeded from the loaded seeding points.")
        } else if let Some(class) = self.classes.first() {
            write!(f, "{class}")
        } else {
            write!(f, "No race classes to seed.")
        }
    }
}

/// Assign bibs according to seeding points, low points first.
///
/// With `raceclass = None` every race class of the event is seeded in turn;
/// otherwise exactly the named one. Per class, the contestants are read in
/// the store's native order (which defines the slot list), the seeded subset
/// is ranked by `(seeding_points, id)`, and each rank is moved onto its
/// target slot's bib via [`swap_bibs`].
///
/// An unauthorized response aborts the run; a class that has vanished is
/// skipped with a note in the report.
pub async fn perform_seeding(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    raceclass: Option<&str>,
) -> EngineResult<SeedingReport> {
    let class_names: Vec<String> = match raceclass {
        Some(name) => vec![name.to_string()],
        None => registry
            .raceclasses(event_id)
            .await?
            .into_iter()
            .map(|class| class.name)
            .collect(),
    };

    let mut report = SeedingReport::default();
    for class_name in &class_names {
        match seed_one_class(registry, event_id, class_name).await {
            Ok(outcome) => report.classes.push(outcome),
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err) if err.is_not_found() => {
                warn!("Seeding of {} skipped: {}", class_name, err);
                report.classes.push(ClassSeedingOutcome {
                    raceclass: class_name.clone(),
                    seedable: true,
                    swaps: Vec::new(),
                    skipped: 0,
                    failures: vec![err.to_string()],
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}

async fn seed_one_class(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    raceclass: &str,
) -> EngineResult<ClassSeedingOutcome> {
    // Native order doubles as the slot order: index n owns the bib that
    // marks slot n of the class.
    let contestants = registry
        .contestants_by_raceclass(event_id, raceclass)
        .await?;

    let mut seeded: Vec<_> = contestants
        .iter()
        .filter(|c| c.seeding_points.is_some())
        .collect();
    seeded.sort_by_key(|c| (c.seeding_points, c.id.clone()));

    let races = registry.races_by_raceclass(event_id, raceclass).await?;
    let boundaries = heat_boundaries(&races);
    let no_of_heats = boundaries.len();
    if no_of_heats == 0 {
        debug!("No qualification heats in {}, class not seedable", raceclass);
        return Ok(ClassSeedingOutcome {
            raceclass: raceclass.to_string(),
            seedable: false,
            swaps: Vec::new(),
            skipped: 0,
            failures: Vec::new(),
        });
    }

    let mut swaps = Vec::new();
    let mut skipped = 0;
    let mut failures = Vec::new();
    for (rank, seeded_contestant) in seeded.iter().enumerate() {
        let heat = rank % no_of_heats;
        let position = rank / no_of_heats;
        let slot_index = if heat == 0 {
            position
        } else {
            boundaries[heat - 1] as usize + position
        };

        let Some(target_bib) = contestants.get(slot_index).and_then(|slot| slot.bib) else {
            warn!(
                "Slot {} of raceclass {} has no contestant or no bib, skipping rank {}",
                slot_index, raceclass, rank
            );
            skipped += 1;
            continue;
        };

        // The contestant's bib may have moved in an earlier iteration; use
        // the latest record, not the list snapshot.
        let latest = match registry
            .contestant_by_id(event_id, &seeded_contestant.id)
            .await
        {
            Ok(latest) => latest,
            Err(RegistryError::NotFound { .. }) => {
                warn!(
                    "Contestant {} vanished during seeding of {}, skipping rank {}",
                    seeded_contestant.id, raceclass, rank
                );
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let Some(current_bib) = latest.bib else {
            warn!(
                "Contestant {} has no bib to trade, skipping rank {}",
                latest.id, rank
            );
            skipped += 1;
            continue;
        };

        match swap_bibs(registry, event_id, target_bib, current_bib).await {
            Ok(outcome) => swaps.push(outcome),
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err @ EngineError::PartialSwap { .. }) => {
                failures.push(err.to_string());
            }
            Err(err) if err.is_not_found() => {
                warn!("Swap for rank {} in {} skipped: {}", rank, raceclass, err);
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(ClassSeedingOutcome {
        raceclass: raceclass.to_string(),
        seedable: true,
        swaps,
        skipped,
        failures,
    })
}
