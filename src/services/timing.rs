//! Raceplan timing: inter-round pauses and start-time adjustment.
//!
//! A sprint class runs its rounds back to back, and the gap between the
//! last heat of one round and the first heat of the next is the rest a
//! competitor who advances actually gets. The summary derives those gaps
//! per class; the adjusters push rounds later when the gaps are too small,
//! or re-time a stretch of heats at a fixed interval.

use chrono::Duration;
use log::{debug, warn};

use crate::api::EventId;
use crate::models::{Race, RaceRound, RaceTime, Raceclass};
use crate::registry::repository::{ErrorContext, EventRegistry, RegistryError};
use crate::services::error::EngineResult;

/// Race datatype carrying the sprint round structure.
const INDIVIDUAL_SPRINT: &str = "individual_sprint";

/// Index letters counted when locating a class's first final.
const FINAL_INDEXES: [&str; 5] = ["A", "B", "B2", "B3", "B4"];

/// A rest period under twelve minutes is flagged as a warning in the
/// summary. It does not block any operation.
pub fn check_short_pause(pause: Duration) -> bool {
    pause < Duration::minutes(12)
}

/// Derived inter-round pauses of one race class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceplanClassSummary {
    pub raceclass: String,
    /// Gap between the last first-round heat and the first semifinal heat.
    pub min_pause_semi: Option<Duration>,
    /// Gap before the first final, from the last semifinal heat, or from
    /// the last first-round heat when the class has no semifinals.
    pub min_pause_final: Option<Duration>,
}

impl RaceplanClassSummary {
    /// True when any derived pause is under twelve minutes.
    pub fn has_short_pause(&self) -> bool {
        self.min_pause_semi.is_some_and(check_short_pause)
            || self.min_pause_final.is_some_and(check_short_pause)
    }
}

/// Derive the inter-round pauses of every race class.
///
/// Only `individual_sprint` races count. Per class the scan finds the last
/// first-round start (`Q`/`R1`), the first and last semifinal-round start
/// (`S`/`R2`), and the first final whose index letter is one of `A`, `B`,
/// `B2`, `B3`, `B4`. Classes without any of those races are left out.
pub fn raceplan_summary(races: &[Race], raceclasses: &[Raceclass]) -> Vec<RaceplanClassSummary> {
    let mut summaries = Vec::new();
    for raceclass in raceclasses {
        let mut last_first_round: Option<RaceTime> = None;
        let mut first_semifinal: Option<RaceTime> = None;
        let mut last_semifinal: Option<RaceTime> = None;
        let mut first_final: Option<RaceTime> = None;

        for race in races {
            if race.raceclass != raceclass.name || race.datatype != INDIVIDUAL_SPRINT {
                continue;
            }
            match race.round {
                RaceRound::Qualification | RaceRound::RoundOne => {
                    last_first_round = Some(race.start_time);
                }
                RaceRound::Semifinal | RaceRound::RoundTwo => {
                    if first_semifinal.is_none() {
                        first_semifinal = Some(race.start_time);
                    }
                    last_semifinal = Some(race.start_time);
                }
                RaceRound::Final => {
                    if first_final.is_none() && FINAL_INDEXES.contains(&race.index.as_str()) {
                        first_final = Some(race.start_time);
                    }
                }
            }
        }

        let min_pause_semi = match (first_semifinal, last_first_round) {
            (Some(semi), Some(first_round)) => Some(semi - first_round),
            _ => None,
        };
        let min_pause_final = match (first_final, last_semifinal, last_first_round) {
            (Some(fin), Some(semi), _) => Some(fin - semi),
            (Some(fin), None, Some(first_round)) => Some(fin - first_round),
            _ => None,
        };

        if last_first_round.is_some() || first_semifinal.is_some() || first_final.is_some() {
            summaries.push(RaceplanClassSummary {
                raceclass: raceclass.name.clone(),
                min_pause_semi,
                min_pause_final,
            });
        }
    }
    summaries
}

/// One round gate pushed later to restore a rest period.
#[derive(Debug, Clone)]
pub struct RestTimeAdjustment {
    pub raceclass: String,
    /// Heat code of the moved gate race (`S1`, `R21` or a final).
    pub gate: String,
    pub order: u32,
    pub new_time: RaceTime,
    pub shift: Duration,
}

impl std::fmt::Display for RestTimeAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Moved {} {} (race {}) to {}.",
            self.raceclass,
            self.gate,
            self.order,
            self.new_time.time_of_day()
        )
    }
}

/// Result of a `set_minimum_rest_time` run.
#[derive(Debug, Clone, Default)]
pub struct RestTimeReport {
    pub adjustments: Vec<RestTimeAdjustment>,
    /// Pauses still under twelve minutes after the run.
    pub warnings: Vec<String>,
}

impl std::fmt::Display for RestTimeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.adjustments.is_empty() {
            write!(f, "No changes.")?;
        } else {
            for (i, adjustment) in self.adjustments.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{adjustment}")?;
            }
        }
        for warning in &self.warnings {
            write!(f, " Warning: {warning}")?;
        }
        Ok(())
    }
}

/// Push rounds later until every inter-round pause is at least `min_rest`.
///
/// Race classes are checked in summary order against their *current*
/// pauses: after every write the full race list is re-read and the summary
/// recomputed, so a shift that cascaded into another class is seen before
/// that class is checked. Per violated pause the gate race of the next
/// round (`S1`/`R21` for the semifinal round, the first `F` race for the
/// finals) is moved forward by the missing amount with a single cascading
/// [`update_start_time`](crate::registry::repository::RaceRegistry::update_start_time)
/// call, which preserves the spacing of everything after the gate.
///
/// Pauses that still sit under twelve minutes afterwards are reported as
/// warnings.
pub async fn set_minimum_rest_time(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    min_rest: Duration,
) -> EngineResult<RestTimeReport> {
    let mut races = registry.races_for_event(event_id).await?;
    let raceclasses = registry.raceclasses(event_id).await?;
    let mut summary = raceplan_summary(&races, &raceclasses);

    let class_names: Vec<String> = summary.iter().map(|s| s.raceclass.clone()).collect();
    let mut report = RestTimeReport::default();

    for class_name in &class_names {
        // Current pause, not the one from when the loop started.
        let pause_semi = summary
            .iter()
            .find(|s| s.raceclass == *class_name)
            .and_then(|s| s.min_pause_semi);
        if let Some(pause) = pause_semi {
            if pause < min_rest {
                let shift = min_rest - pause;
                let gate = races.iter().find(|race| {
                    race.raceclass == *class_name
                        && matches!(race.heat_code().as_str(), "S1" | "R21")
                });
                if let Some(gate) = gate {
                    let new_time = gate.start_time + shift;
                    registry
                        .update_start_time(event_id, gate.order, &new_time)
                        .await?;
                    report.adjustments.push(RestTimeAdjustment {
                        raceclass: class_name.clone(),
                        gate: gate.heat_code(),
                        order: gate.order,
                        new_time,
                        shift,
                    });
                    races = registry.races_for_event(event_id).await?;
                    summary = raceplan_summary(&races, &raceclasses);
                }
            }
        }

        let pause_final = summary
            .iter()
            .find(|s| s.raceclass == *class_name)
            .and_then(|s| s.min_pause_final);
        if let Some(pause) = pause_final {
            if pause < min_rest {
                let shift = min_rest - pause;
                let gate = races
                    .iter()
                    .find(|race| race.raceclass == *class_name && race.round == RaceRound::Final);
                if let Some(gate) = gate {
                    let new_time = gate.start_time + shift;
                    registry
                        .update_start_time(event_id, gate.order, &new_time)
                        .await?;
                    report.adjustments.push(RestTimeAdjustment {
                        raceclass: class_name.clone(),
                        gate: gate.heat_code(),
                        order: gate.order,
                        new_time,
                        shift,
                    });
                    races = registry.races_for_event(event_id).await?;
                    summary = raceplan_summary(&races, &raceclasses);
                }
            }
        }
    }

    for entry in &summary {
        if let Some(pause) = entry.min_pause_semi.filter(|p| check_short_pause(*p)) {
            warn!(
                "{}: pause before the semifinal round is {} min",
                entry.raceclass,
                pause.num_minutes()
            );
            report.warnings.push(format!(
                "{}: pause before the semifinal round is {} min.",
                entry.raceclass,
                pause.num_minutes()
            ));
        }
        if let Some(pause) = entry.min_pause_final.filter(|p| check_short_pause(*p)) {
            warn!(
                "{}: pause before the finals is {} min",
                entry.raceclass,
                pause.num_minutes()
            );
            report.warnings.push(format!(
                "{}: pause before the finals is {} min.",
                entry.raceclass,
                pause.num_minutes()
            ));
        }
    }

    Ok(report)
}

/// Result of a `set_heat_interval` run.
#[derive(Debug, Clone)]
pub struct IntervalReport {
    pub first_order: u32,
    pub last_order: u32,
    pub interval: Duration,
    pub races_updated: u32,
}

impl std::fmt::Display for IntervalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.races_updated == 0 {
            return write!(
                f,
                "No races to re-time between orders {} and {}.",
                self.first_order, self.last_order
            );
        }
        let seconds = self.interval.num_seconds();
        write!(
            f,
            "Re-timed {} races after race {} at {}:{:02} min intervals.",
            self.races_updated,
            self.first_order,
            seconds / 60,
            seconds % 60
        )
    }
}

/// Re-time a contiguous stretch of heats at a fixed interval.
///
/// The race with `order == first_order` anchors the walk and keeps its
/// start time. Every race with `first_order < order <= last_order` is then
/// set to the previous race's (new) time plus `interval`, one plain
/// single-race write each; races outside the range never move.
pub async fn set_heat_interval(
    registry: &dyn EventRegistry,
    event_id: &EventId,
    first_order: u32,
    last_order: u32,
    interval: Duration,
) -> EngineResult<IntervalReport> {
    let races = registry.races_for_event(event_id).await?;
    let anchor = races
        .iter()
        .find(|race| race.order == first_order)
        .ok_or_else(|| {
            RegistryError::not_found(format!(
                "No race with order {first_order} in event {event_id}"
            ))
            .with_context(ErrorContext::new("set_heat_interval").with_record("race"))
        })?;

    let mut previous_time = anchor.start_time;
    let mut races_updated = 0;
    for race in races
        .iter()
        .filter(|race| race.order > first_order && race.order <= last_order)
    {
        let mut updated = race.clone();
        updated.start_time = previous_time + interval;
        registry.update_race(&updated).await?;
        previous_time = updated.start_time;
        races_updated += 1;
    }

    debug!(
        "Re-timed {} races after order {} in event {}",
        races_updated, first_order, event_id
    );
    Ok(IntervalReport {
        first_order,
        last_order,
        interval,
        races_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RaceId;

    fn create_test_race(
        raceclass: &str,
        round: RaceRound,
        index: &str,
        heat: u32,
        order: u32,
        start: &str,
    ) -> Race {
        Race {
            id: RaceId::new(format!("race-{order}")),
            event_id: EventId::new("ev-1"),
            raceclass: raceclass.to_string(),
            round,
            index: index.to_string(),
            heat,
            order,
            start_time: RaceTime::parse(start).unwrap(),
            no_of_contestants: 4,
            max_no_of_contestants: 10,
            datatype: "individual_sprint".to_string(),
            start_entries: Vec::new(),
        }
    }

    fn create_test_raceclass(name: &str) -> Raceclass {
        Raceclass {
            id: format!("rc-{name}"),
            event_id: EventId::new("ev-1"),
            name: name.to_string(),
            ageclasses: Vec::new(),
            distance: "Sprint".to_string(),
            group: 1,
            order: 1,
            ranking: true,
            seeding: true,
            no_of_contestants: 8,
        }
    }

    #[test]
    fn test_check_short_pause_boundary() {
        assert!(check_short_pause(Duration::minutes(11)));
        assert!(check_short_pause(Duration::minutes(12) - Duration::seconds(1)));
        assert!(!check_short_pause(Duration::minutes(12)));
        assert!(!check_short_pause(Duration::minutes(25)));
    }

    #[test]
    fn test_summary_with_semifinals() {
        let races = vec![
            create_test_race("J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00"),
            create_test_race("J19", RaceRound::Qualification, "", 2, 2, "2021-08-21T09:10:00"),
            create_test_race("J19", RaceRound::Semifinal, "", 1, 3, "2021-08-21T09:40:00"),
            create_test_race("J19", RaceRound::Semifinal, "", 2, 4, "2021-08-21T09:50:00"),
            create_test_race("J19", RaceRound::Final, "A", 1, 5, "2021-08-21T10:20:00"),
        ];
        let classes = vec![create_test_raceclass("J19")];

        let summary = raceplan_summary(&races, &classes);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].min_pause_semi, Some(Duration::minutes(30)));
        assert_eq!(summary[0].min_pause_final, Some(Duration::minutes(30)));
        assert!(!summary[0].has_short_pause());
    }

    #[test]
    fn test_summary_final_pause_falls_back_without_semifinals() {
        let races = vec![
            create_test_race("G16", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00"),
            create_test_race("G16", RaceRound::Final, "A", 1, 2, "2021-08-21T09:08:00"),
        ];
        let classes = vec![create_test_raceclass("G16")];

        let summary = raceplan_summary(&races, &classes);
        assert_eq!(summary[0].min_pause_semi, None);
        assert_eq!(summary[0].min_pause_final, Some(Duration::minutes(8)));
        assert!(summary[0].has_short_pause());
    }

    #[test]
    fn test_summary_skips_other_datatypes_and_odd_finals() {
        let mut cross_country =
            create_test_race("J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00");
        cross_country.datatype = "interval_start".to_string();
        let races = vec![
            cross_country,
            create_test_race("J19", RaceRound::Final, "C", 1, 2, "2021-08-21T09:30:00"),
            create_test_race("J19", RaceRound::Final, "B2", 2, 3, "2021-08-21T09:45:00"),
        ];
        let classes = vec![create_test_raceclass("J19")];

        // The C final does not count as the first final; without sprint
        // first-round races there is no pause to derive.
        let summary = raceplan_summary(&races, &classes);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].min_pause_semi, None);
        assert_eq!(summary[0].min_pause_final, None);
    }

    #[test]
    fn test_summary_unranked_rounds_count_as_first_and_semi() {
        let races = vec![
            create_test_race("G11", RaceRound::RoundOne, "", 1, 1, "2021-08-21T09:00:00"),
            create_test_race("G11", RaceRound::RoundOne, "", 2, 2, "2021-08-21T09:06:00"),
            create_test_race("G11", RaceRound::RoundTwo, "", 1, 3, "2021-08-21T09:26:00"),
        ];
        let classes = vec![create_test_raceclass("G11")];

        let summary = raceplan_summary(&races, &classes);
        assert_eq!(summary[0].min_pause_semi, Some(Duration::minutes(20)));
        assert_eq!(summary[0].min_pause_final, None);
    }
}
