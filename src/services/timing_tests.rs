#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::api::{EventId, RaceId};
    use crate::models::{Race, RaceRound, RaceTime, Raceclass};
    use crate::registry::repositories::LocalRegistry;
    use crate::registry::repository::RaceRegistry;
    use crate::services::timing::{set_heat_interval, set_minimum_rest_time};

    fn event() -> EventId {
        EventId::new("ev-1")
    }

    fn create_test_raceclass(name: &str, order: u32) -> Raceclass {
        Raceclass {
            id: format!("rc-{name}"),
            event_id: event(),
            name: name.to_string(),
            ageclasses: vec![name.to_string()],
            distance: "Sprint".to_string(),
            group: 1,
            order,
            ranking: true,
            seeding: true,
            no_of_contestants: 0,
        }
    }

    fn create_test_race(
        id: &str,
        raceclass: &str,
        round: RaceRound,
        index: &str,
        heat: u32,
        order: u32,
        start: &str,
    ) -> Race {
        Race {
            id: RaceId::new(id),
            event_id: event(),
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

    async fn start_times(registry: &LocalRegistry) -> Vec<String> {
        registry
            .races_for_event(&event())
            .await
            .unwrap()
            .iter()
            .map(|r| r.start_time.time_of_day())
            .collect()
    }

    #[tokio::test]
    async fn test_set_heat_interval_retimes_range() {
        let registry = LocalRegistry::new();
        for order in 1..=5u32 {
            registry.add_race(create_test_race(
                &format!("r{order}"),
                "J19",
                RaceRound::Qualification,
                "",
                order,
                order,
                &format!("2021-08-21T09:{:02}:00", (order - 1) * 10),
            ));
        }

        let report = set_heat_interval(&registry, &event(), 2, 4, Duration::minutes(2))
            .await
            .unwrap();

        assert_eq!(report.races_updated, 2);
        assert_eq!(
            report.to_string(),
            "Re-timed 2 races after race 2 at 2:00 min intervals."
        );
        // The anchor keeps its time; races outside the range never move.
        assert_eq!(
            start_times(&registry).await,
            ["09:00:00", "09:10:00", "09:12:00", "09:14:00", "09:40:00"]
        );
    }

    #[tokio::test]
    async fn test_set_heat_interval_empty_range() {
        let registry = LocalRegistry::new();
        registry.add_race(create_test_race(
            "r2",
            "J19",
            RaceRound::Qualification,
            "",
            2,
            2,
            "2021-08-21T09:10:00",
        ));

        let report = set_heat_interval(&registry, &event(), 2, 2, Duration::minutes(2))
            .await
            .unwrap();

        assert_eq!(report.races_updated, 0);
        assert_eq!(
            report.to_string(),
            "No races to re-time between orders 2 and 2."
        );
    }

    #[tokio::test]
    async fn test_set_heat_interval_unknown_anchor() {
        let registry = LocalRegistry::new();
        registry.add_race(create_test_race(
            "r1",
            "J19",
            RaceRound::Qualification,
            "",
            1,
            1,
            "2021-08-21T09:00:00",
        ));

        let err = set_heat_interval(&registry, &event(), 9, 10, Duration::minutes(2))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    /// Two classes interleaved in the global order. Fixing the first
    /// class's pauses cascades into the second class's races, so the
    /// second class must be judged on the shifted times and needs no
    /// adjustment of its own.
    #[tokio::test]
    async fn test_set_minimum_rest_time_judges_classes_on_shifted_times() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("J19", 1));
        registry.add_raceclass(create_test_raceclass("G16", 2));
        registry.add_race(create_test_race(
            "j-q", "J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00",
        ));
        registry.add_race(create_test_race(
            "g-q", "G16", RaceRound::Qualification, "", 1, 2, "2021-08-21T09:10:00",
        ));
        registry.add_race(create_test_race(
            "j-s", "J19", RaceRound::Semifinal, "", 1, 3, "2021-08-21T09:20:00",
        ));
        registry.add_race(create_test_race(
            "g-s", "G16", RaceRound::Semifinal, "", 1, 4, "2021-08-21T09:30:00",
        ));
        registry.add_race(create_test_race(
            "j-f", "J19", RaceRound::Final, "A", 1, 5, "2021-08-21T09:40:00",
        ));
        registry.add_race(create_test_race(
            "g-f", "G16", RaceRound::Final, "A", 1, 6, "2021-08-21T09:50:00",
        ));

        let report = set_minimum_rest_time(&registry, &event(), Duration::minutes(25))
            .await
            .unwrap();

        assert_eq!(report.adjustments.len(), 2);
        assert_eq!(report.adjustments[0].raceclass, "J19");
        assert_eq!(report.adjustments[0].gate, "S1");
        assert_eq!(report.adjustments[0].order, 3);
        assert_eq!(report.adjustments[0].shift, Duration::minutes(5));
        assert_eq!(report.adjustments[1].raceclass, "J19");
        assert_eq!(report.adjustments[1].gate, "F1");
        assert_eq!(report.adjustments[1].order, 5);
        assert_eq!(report.adjustments[1].shift, Duration::minutes(5));
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.to_string(),
            "Moved J19 S1 (race 3) to 09:25:00. Moved J19 F1 (race 5) to 09:50:00."
        );

        assert_eq!(
            start_times(&registry).await,
            [
                "09:00:00", "09:10:00", "09:25:00", "09:35:00", "09:50:00", "10:00:00"
            ]
        );
    }

    #[tokio::test]
    async fn test_set_minimum_rest_time_gate_for_unranked_round_two() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("G11", 1));
        registry.add_race(create_test_race(
            "r1", "G11", RaceRound::RoundOne, "", 1, 1, "2021-08-21T09:00:00",
        ));
        registry.add_race(create_test_race(
            "r2", "G11", RaceRound::RoundTwo, "", 1, 2, "2021-08-21T09:05:00",
        ));

        let report = set_minimum_rest_time(&registry, &event(), Duration::minutes(15))
            .await
            .unwrap();

        assert_eq!(report.adjustments.len(), 1);
        assert_eq!(report.adjustments[0].gate, "R21");
        assert_eq!(report.adjustments[0].shift, Duration::minutes(10));
        assert_eq!(start_times(&registry).await, ["09:00:00", "09:15:00"]);
    }

    #[tokio::test]
    async fn test_set_minimum_rest_time_no_changes() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("J19", 1));
        registry.add_race(create_test_race(
            "q", "J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00",
        ));
        registry.add_race(create_test_race(
            "s", "J19", RaceRound::Semifinal, "", 1, 2, "2021-08-21T09:20:00",
        ));

        let report = set_minimum_rest_time(&registry, &event(), Duration::minutes(10))
            .await
            .unwrap();

        assert!(report.adjustments.is_empty());
        assert_eq!(report.to_string(), "No changes.");
        assert_eq!(start_times(&registry).await, ["09:00:00", "09:20:00"]);
    }

    /// A pause that satisfies the requested minimum but sits under twelve
    /// minutes is reported, not fixed.
    #[tokio::test]
    async fn test_set_minimum_rest_time_warns_on_short_pause() {
        let registry = LocalRegistry::new();
        registry.add_raceclass(create_test_raceclass("J19", 1));
        registry.add_race(create_test_race(
            "q", "J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00",
        ));
        registry.add_race(create_test_race(
            "s", "J19", RaceRound::Semifinal, "", 1, 2, "2021-08-21T09:08:00",
        ));

        let report = set_minimum_rest_time(&registry, &event(), Duration::minutes(5))
            .await
            .unwrap();

        assert!(report.adjustments.is_empty());
        assert_eq!(
            report.warnings,
            ["J19: pause before the semifinal round is 8 min."]
        );
        assert_eq!(
            report.to_string(),
            "No changes. Warning: J19: pause before the semifinal round is 8 min."
        );
    }

    #[tokio::test]
    async fn test_set_minimum_rest_time_unauthorized_aborts() {
        let registry = LocalRegistry::new();
        registry.set_authorized(false);

        let err = set_minimum_rest_time(&registry, &event(), Duration::minutes(10))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
