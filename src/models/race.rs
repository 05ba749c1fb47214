//! Race and start-list records as served by the race record service.

use serde::{Deserialize, Serialize};

use crate::api::{EventId, RaceId, StartEntryId};
use crate::models::time::RaceTime;

/// Round of an individual-sprint race plan.
///
/// Ranked classes run qualification, semifinals and finals; unranked classes
/// run two plain rounds (`R1`, `R2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceRound {
    #[serde(rename = "Q")]
    Qualification,
    #[serde(rename = "R1")]
    RoundOne,
    #[serde(rename = "S")]
    Semifinal,
    #[serde(rename = "R2")]
    RoundTwo,
    #[serde(rename = "F")]
    Final,
}

impl RaceRound {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceRound::Qualification => "Q",
            RaceRound::RoundOne => "R1",
            RaceRound::Semifinal => "S",
            RaceRound::RoundTwo => "R2",
            RaceRound::Final => "F",
        }
    }
}

impl std::fmt::Display for RaceRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One start-list slot in a race.
///
/// The slot half (`startlist_id`, `race_id`, `starting_position`,
/// `scheduled_start_time`) and the contestant half (`bib`, `name`, `club`)
/// are exchanged independently during start-entry swaps. `id` is absent on
/// input and assigned by the race record service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartEntry {
    #[serde(default)]
    pub id: Option<StartEntryId>,
    pub startlist_id: String,
    pub race_id: RaceId,
    pub bib: i32,
    /// 1-based lane position within the heat.
    pub starting_position: u32,
    pub scheduled_start_time: RaceTime,
    pub name: String,
    pub club: String,
}

/// A single race (heat) in the plan.
///
/// `order` is the global schedule key, strictly increasing across the whole
/// event. `start_entries` is populated on single-race reads and may be empty
/// on list reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub event_id: EventId,
    pub raceclass: String,
    pub round: RaceRound,
    /// Final grouping letter (`A`, `B`, `B2`, ...); empty outside finals.
    #[serde(default)]
    pub index: String,
    pub heat: u32,
    pub order: u32,
    pub start_time: RaceTime,
    pub no_of_contestants: u32,
    pub max_no_of_contestants: u32,
    pub datatype: String,
    #[serde(default)]
    pub start_entries: Vec<StartEntry>,
}

impl Race {
    /// Round-and-heat designator (`Q3`, `S1`, `R21`) used to locate the gate
    /// race of a round.
    pub fn heat_code(&self) -> String {
        format!("{}{}", self.round, self.heat)
    }
}
