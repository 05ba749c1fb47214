#[cfg(test)]
mod tests {
    use crate::api::{EventId, RaceId};
    use crate::models::{Race, RaceRound, RaceTime, Raceclass, StartEntry};
    use crate::registry::repositories::LocalRegistry;
    use crate::registry::repository::RaceRegistry;
    use crate::services::round_two::rebalance_round_two;
    use crate::services::swaps::SlotSwapOutcome;

    fn event() -> EventId {
        EventId::new("ev-1")
    }

    fn create_test_raceclass(name: &str, ranking: bool, order: u32) -> Raceclass {
        Raceclass {
            id: format!("rc-{name}"),
            event_id: event(),
            name: name.to_string(),
            ageclasses: vec![name.to_string()],
            distance: "Sprint".to_string(),
            group: 1,
            order,
            ranking,
            seeding: false,
            no_of_contestants: 0,
        }
    }

    fn create_test_race(id: &str, raceclass: &str, round: RaceRound, heat: u32, order: u32) -> Race {
        Race {
            id: RaceId::new(id),
            event_id: event(),
            raceclass: raceclass.to_string(),
            round,
            index: String::new(),
            heat,
            order,
            start_time: RaceTime::parse("2021-08-21T10:00:00").unwrap(),
            no_of_contestants: 5,
            max_no_of_contestants: 10,
            datatype: "individual_sprint".to_string(),
            start_entries: Vec::new(),
        }
    }

    fn create_test_entry(race_id: &str, position: u32, bib: i32) -> StartEntry {
        StartEntry {
            id: None,
            startlist_id: "sl-1".to_string(),
            race_id: RaceId::new(race_id),
            bib,
            starting_position: position,
            scheduled_start_time: RaceTime::parse("2021-08-21T10:00:00").unwrap(),
            name: format!("Contestant {bib}"),
            club: "IL Test".to_string(),
        }
    }

    async fn fill_heat(registry: &LocalRegistry, race_id: &str, first_bib: i32, size: u32) {
        for position in 1..=size {
            registry
                .create_start_entry(&create_test_entry(
                    race_id,
                    position,
                    first_bib + position as i32 - 1,
                ))
                .await
                .unwrap();
        }
    }

    async fn bibs_of(registry: &LocalRegistry, race_id: &str) -> Vec<i32> {
        registry
            .race_by_id(&RaceId::new(race_id))
            .await
            .unwrap()
            .start_entries
            .iter()
            .map(|e| e.bib)
            .collect()
    }

    /// Four round-two heats. The first is left alone; heat 2 trades lanes
    /// 1, 3, 5 with heat 1, heat 3 trades lanes 2, 4 with heat 2, heat 4
    /// trades lanes 1, 3, 5 with heat 3.
    #[tokio::test]
    async fn test_rebalance_four_heats() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G11", false, 1));
        for heat in 1..=4u32 {
            registry.add_race(create_test_race(
                &format!("r1-{heat}"),
                "G11",
                RaceRound::RoundOne,
                heat,
                heat,
            ));
            registry.add_race(create_test_race(
                &format!("r2-{heat}"),
                "G11",
                RaceRound::RoundTwo,
                heat,
                4 + heat,
            ));
        }
        fill_heat(&registry, "r1-4", 1, 5).await;
        fill_heat(&registry, "r2-1", 11, 5).await;
        fill_heat(&registry, "r2-2", 21, 5).await;
        fill_heat(&registry, "r2-3", 31, 5).await;
        fill_heat(&registry, "r2-4", 41, 5).await;

        let report = rebalance_round_two(&registry, &event()).await.unwrap();

        assert_eq!(report.moves, 8);
        assert_eq!(report.slot_outcomes.len(), 8);
        assert!(report
            .slot_outcomes
            .iter()
            .all(|o| matches!(o, SlotSwapOutcome::Swapped { .. })));
        assert_eq!(
            report.to_string(),
            "Round two for unranked classes reshuffled: 8 moves."
        );

        // The round-one heat before the first R2 race is never touched.
        assert_eq!(bibs_of(&registry, "r1-4").await, [1, 2, 3, 4, 5]);
        assert_eq!(bibs_of(&registry, "r2-1").await, [21, 12, 23, 14, 25]);
        assert_eq!(bibs_of(&registry, "r2-2").await, [11, 32, 13, 34, 15]);
        assert_eq!(bibs_of(&registry, "r2-3").await, [41, 22, 43, 24, 45]);
        assert_eq!(bibs_of(&registry, "r2-4").await, [31, 42, 33, 44, 35]);
    }

    #[tokio::test]
    async fn test_rebalance_single_heat_does_nothing() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G11", false, 1));
        registry.add_race(create_test_race("r2-1", "G11", RaceRound::RoundTwo, 1, 1));
        fill_heat(&registry, "r2-1", 11, 5).await;

        let report = rebalance_round_two(&registry, &event()).await.unwrap();

        assert_eq!(report.moves, 0);
        assert_eq!(report.to_string(), "No round-two heats to reshuffle.");
        assert_eq!(bibs_of(&registry, "r2-1").await, [11, 12, 13, 14, 15]);
    }

    #[tokio::test]
    async fn test_rebalance_only_touches_unranked_classes() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G11", false, 1));
        registry.add_raceclass(create_test_raceclass("J19", true, 2));
        registry.add_race(create_test_race("g-1", "G11", RaceRound::RoundTwo, 1, 1));
        registry.add_race(create_test_race("g-2", "G11", RaceRound::RoundTwo, 2, 2));
        registry.add_race(create_test_race("j-1", "J19", RaceRound::RoundTwo, 1, 3));
        registry.add_race(create_test_race("j-2", "J19", RaceRound::RoundTwo, 2, 4));
        fill_heat(&registry, "g-1", 11, 5).await;
        fill_heat(&registry, "g-2", 21, 5).await;
        fill_heat(&registry, "j-1", 31, 5).await;
        fill_heat(&registry, "j-2", 41, 5).await;

        let report = rebalance_round_two(&registry, &event()).await.unwrap();

        assert_eq!(report.moves, 3);
        assert_eq!(bibs_of(&registry, "g-1").await, [21, 12, 23, 14, 25]);
        assert_eq!(bibs_of(&registry, "g-2").await, [11, 22, 13, 24, 15]);
        assert_eq!(bibs_of(&registry, "j-1").await, [31, 32, 33, 34, 35]);
        assert_eq!(bibs_of(&registry, "j-2").await, [41, 42, 43, 44, 45]);
    }

    /// Heats of four still count three attempted moves for an even heat;
    /// the lane that does not exist is skipped, not retargeted.
    #[tokio::test]
    async fn test_rebalance_small_heats_skip_missing_lane() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G12", false, 1));
        registry.add_race(create_test_race("r2-1", "G12", RaceRound::RoundTwo, 1, 1));
        registry.add_race(create_test_race("r2-2", "G12", RaceRound::RoundTwo, 2, 2));
        fill_heat(&registry, "r2-1", 11, 4).await;
        fill_heat(&registry, "r2-2", 21, 4).await;

        let report = rebalance_round_two(&registry, &event()).await.unwrap();

        assert_eq!(report.moves, 3);
        assert_eq!(
            report.slot_outcomes.last(),
            Some(&SlotSwapOutcome::SkippedMissing { slot_index: 4 })
        );
        assert_eq!(bibs_of(&registry, "r2-1").await, [21, 12, 23, 14]);
        assert_eq!(bibs_of(&registry, "r2-2").await, [11, 22, 13, 24]);
    }

    #[tokio::test]
    async fn test_rebalance_unauthorized_aborts() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G11", false, 1));
        registry.set_authorized(false);

        let err = rebalance_round_two(&registry, &event()).await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
