//! Example walking through a full raceplan session
//!
//! This example shows how to use the raceplan engine to:
//! 1. Populate the in-memory registry with an event
//! 2. Seed the ranked classes from loaded seeding points
//! 3. Reshuffle round two of the unranked classes
//! 4. Re-time the heats at a uniform interval
//! 5. Enforce a minimum rest period between rounds
//!
//! To run this example:
//! ```bash
//! cargo run --example seed_and_schedule
//! ```

use chrono::Duration;

use raceplan_engine::registry::{ContestantRegistry, LocalRegistry, RaceRegistry};
use raceplan_engine::services::{
    perform_seeding, raceplan_summary, rebalance_round_two, set_heat_interval,
    set_minimum_rest_time,
};
use raceplan_engine::{Contestant, ContestantId, EventId, Race, RaceId, RaceRound, RaceTime};
use raceplan_engine::{Raceclass, StartEntry};

fn raceclass(event_id: &EventId, name: &str, ageclass: &str, ranking: bool, order: u32) -> Raceclass {
    Raceclass {
        id: format!("rc-{name}"),
        event_id: event_id.clone(),
        name: name.to_string(),
        ageclasses: vec![ageclass.to_string()],
        distance: "Sprint".to_string(),
        group: 1,
        order,
        ranking,
        seeding: ranking,
        no_of_contestants: 0,
    }
}

fn contestant(
    event_id: &EventId,
    id: &str,
    name: (&str, &str),
    ageclass: &str,
    bib: i32,
    points: Option<i32>,
) -> Contestant {
    Contestant {
        id: ContestantId::new(id),
        event_id: event_id.clone(),
        bib: Some(bib),
        first_name: name.0.to_string(),
        last_name: name.1.to_string(),
        birth_date: String::new(),
        gender: String::new(),
        ageclass: ageclass.to_string(),
        region: "Oslo".to_string(),
        club: "IL Demo".to_string(),
        email: String::new(),
        team: String::new(),
        seeding_points: points,
        minidrett_id: String::new(),
        registration_date_time: String::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn race(
    event_id: &EventId,
    id: &str,
    raceclass: &str,
    round: RaceRound,
    index: &str,
    heat: u32,
    order: u32,
    start: &str,
) -> anyhow::Result<Race> {
    Ok(Race {
        id: RaceId::new(id),
        event_id: event_id.clone(),
        raceclass: raceclass.to_string(),
        round,
        index: index.to_string(),
        heat,
        order,
        start_time: RaceTime::parse(start)?,
        no_of_contestants: 4,
        max_no_of_contestants: 10,
        datatype: "individual_sprint".to_string(),
        start_entries: Vec::new(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let event_id = EventId::new("ragdesprinten-2021");
    let registry = LocalRegistry::new();

    // Step 1: Populate the registry
    println!("=== Raceplan Engine Walkthrough ===\n");
    println!("1. Populating registry for event '{}'...", event_id);

    registry.add_raceclass(raceclass(&event_id, "K-J19", "K 19", true, 1));
    registry.add_raceclass(raceclass(&event_id, "G11", "G 11", false, 2));

    let girls = [
        ("c-1", ("Anna", "Solberg"), Some(14)),
        ("c-2", ("Berit", "Dahl"), Some(7)),
        ("c-3", ("Camilla", "Lund"), Some(22)),
        ("c-4", ("Dina", "Aas"), Some(3)),
        ("c-5", ("Eva", "Moen"), None),
        ("c-6", ("Frida", "Berg"), None),
        ("c-7", ("Guro", "Vik"), None),
        ("c-8", ("Hanna", "Holt"), None),
    ];
    for (i, (id, name, points)) in girls.into_iter().enumerate() {
        registry.add_contestant(contestant(
            &event_id,
            id,
            name,
            "K 19",
            101 + i as i32,
            points,
        ));
    }

    // K-J19 runs Q -> S -> F, two qualification heats of four.
    registry.add_race(race(&event_id, "kj-q1", "K-J19", RaceRound::Qualification, "", 1, 1, "2021-08-21T09:00:00")?);
    registry.add_race(race(&event_id, "kj-q2", "K-J19", RaceRound::Qualification, "", 2, 2, "2021-08-21T09:07:00")?);
    registry.add_race(race(&event_id, "kj-s1", "K-J19", RaceRound::Semifinal, "", 1, 3, "2021-08-21T09:13:00")?);
    registry.add_race(race(&event_id, "kj-s2", "K-J19", RaceRound::Semifinal, "", 2, 4, "2021-08-21T09:21:00")?);
    registry.add_race(race(&event_id, "kj-fa", "K-J19", RaceRound::Final, "A", 1, 5, "2021-08-21T09:28:00")?);

    // G11 runs two drawn rounds, R1 -> R2.
    registry.add_race(race(&event_id, "g11-r1-1", "G11", RaceRound::RoundOne, "", 1, 6, "2021-08-21T09:33:00")?);
    registry.add_race(race(&event_id, "g11-r1-2", "G11", RaceRound::RoundOne, "", 2, 7, "2021-08-21T09:39:00")?);
    registry.add_race(race(&event_id, "g11-r2-1", "G11", RaceRound::RoundTwo, "", 1, 8, "2021-08-21T09:45:00")?);
    registry.add_race(race(&event_id, "g11-r2-2", "G11", RaceRound::RoundTwo, "", 2, 9, "2021-08-21T09:51:00")?);

    let heat_one = ["Jon Haug", "Kai Moe", "Lars Eng", "Mats Ruud", "Nils Foss"];
    let heat_two = ["Odd Lien", "Per Strand", "Rolf Bakke", "Stein Vold", "Tor Hagen"];
    for (race_id, names, first_bib) in [("g11-r2-1", heat_one, 11), ("g11-r2-2", heat_two, 21)] {
        for (i, name) in names.into_iter().enumerate() {
            registry
                .create_start_entry(&StartEntry {
                    id: None,
                    startlist_id: "sl-g11".to_string(),
                    race_id: RaceId::new(race_id),
                    bib: first_bib + i as i32,
                    starting_position: i as u32 + 1,
                    scheduled_start_time: RaceTime::parse("2021-08-21T09:45:00")?,
                    name: name.to_string(),
                    club: "IL Demo".to_string(),
                })
                .await?;
        }
    }
    println!("   2 race classes, 8 contestants, 9 races\n");

    // Step 2: Seed the ranked classes
    println!("2. Seeding from loaded seeding points...");
    let seeding = perform_seeding(&registry, &event_id, None).await?;
    for class in &seeding.classes {
        println!("   {class}");
    }
    println!();

    // Step 3: Reshuffle round two of the unranked classes
    println!("3. Reshuffling round two for unranked classes...");
    let rebalance = rebalance_round_two(&registry, &event_id).await?;
    println!("   {rebalance}\n");

    // Step 4: Re-time all heats at a uniform six minute interval
    println!("4. Re-timing heats at a 6 minute interval...");
    let interval = set_heat_interval(&registry, &event_id, 1, 9, Duration::minutes(6)).await?;
    println!("   {interval}\n");

    // Step 5: Enforce a fifteen minute rest between rounds
    println!("5. Enforcing a 15 minute rest period...");
    let races = registry.races_for_event(&event_id).await?;
    let classes = registry.raceclasses(&event_id).await?;
    for entry in raceplan_summary(&races, &classes) {
        let minutes = |pause: Option<Duration>| {
            pause.map_or("-".to_string(), |p| format!("{} min", p.num_minutes()))
        };
        println!(
            "   {}: pause before semifinals {}, before finals {}",
            entry.raceclass,
            minutes(entry.min_pause_semi),
            minutes(entry.min_pause_final),
        );
    }
    let rest = set_minimum_rest_time(&registry, &event_id, Duration::minutes(15)).await?;
    println!("   {rest}\n");

    // Final schedule
    println!("Final schedule:");
    for race in registry.races_for_event(&event_id).await? {
        println!(
            "   {:>2}. {} {:<5} {}",
            race.order,
            race.start_time.time_of_day(),
            race.heat_code(),
            race.raceclass,
        );
    }

    println!("\n=== Walkthrough Complete ===");
    Ok(())
}
