//! Service layer implementing the engine operations.
//!
//! This module contains the operations the event console calls: heat
//! seeding, bib and start-entry swaps, round-two rebalancing and raceplan
//! timing. Services orchestrate registry calls and implement the
//! competition logic; all record reads and writes go through the
//! [`EventRegistry`](crate::registry::repository::EventRegistry) trait.

pub mod error;

pub mod round_two;

pub mod seeding;

pub mod swaps;

pub mod timing;

// The service tests drive the operations against the in-memory registry.
#[cfg(all(test, feature = "local-registry"))]
#[path = "round_two_tests.rs"]
mod round_two_tests;
#[cfg(all(test, feature = "local-registry"))]
#[path = "timing_tests.rs"]
mod timing_tests;

pub use error::{EngineError, EngineResult};
pub use round_two::rebalance_round_two;
pub use seeding::perform_seeding;
pub use swaps::{assign_bib, swap_bibs, swap_start_entries};
pub use timing::{
    check_short_pause, raceplan_summary, set_heat_interval, set_minimum_rest_time,
};
