//! Contestant and race-class records as served by the event record service.

use serde::{Deserialize, Serialize};

use crate::api::{ContestantId, EventId};

/// A registered contestant.
///
/// `bib` and `seeding_points` are nullable on the wire; a contestant with
/// `bib = None` is in the transient "freed" state that only exists between
/// the two writes of a bib swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ContestantId,
    pub event_id: EventId,
    pub bib: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub gender: String,
    pub ageclass: String,
    #[serde(default)]
    pub region: String,
    pub club: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub team: String,
    pub seeding_points: Option<i32>,
    #[serde(default)]
    pub minidrett_id: String,
    #[serde(default)]
    pub registration_date_time: String,
}

impl Contestant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A race class grouping one or more age classes.
///
/// `ranking == false` marks the non-competitive classes whose second round
/// gets rebalanced instead of being seeded by results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raceclass {
    pub id: String,
    pub event_id: EventId,
    pub name: String,
    #[serde(default)]
    pub ageclasses: Vec<String>,
    #[serde(default)]
    pub distance: String,
    pub group: u32,
    pub order: u32,
    pub ranking: bool,
    #[serde(default)]
    pub seeding: bool,
    pub no_of_contestants: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contestant_json() -> &'static str {
        r#"{
            "id": "c-1",
            "event_id": "ev-1",
            "bib": null,
            "first_name": "Kari",
            "last_name": "Nordmann",
            "ageclass": "J 19/20",
            "club": "Kjelsaas IL",
            "seeding_points": 12
        }"#
    }

    #[test]
    fn test_contestant_nullable_bib() {
        let c: Contestant = serde_json::from_str(contestant_json()).unwrap();
        assert_eq!(c.bib, None);
        assert_eq!(c.seeding_points, Some(12));
        assert_eq!(c.full_name(), "Kari Nordmann");
    }

    #[test]
    fn test_contestant_defaults_for_absent_fields() {
        let c: Contestant = serde_json::from_str(contestant_json()).unwrap();
        assert!(c.email.is_empty());
        assert!(c.team.is_empty());
    }

    #[test]
    fn test_raceclass_roundtrip() {
        let rc = Raceclass {
            id: "rc-1".to_string(),
            event_id: crate::api::EventId::new("ev-1"),
            name: "J19".to_string(),
            ageclasses: vec!["J 19/20".to_string()],
            distance: "Sprint".to_string(),
            group: 1,
            order: 1,
            ranking: true,
            seeding: true,
            no_of_contestants: 8,
        };
        let json = serde_json::to_string(&rc).unwrap();
        let back: Raceclass = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "J19");
        assert!(back.ranking);
    }
}
