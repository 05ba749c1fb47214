//! # Raceplan Engine
//!
//! Heat seeding and raceplan timing engine for sprint competitions.
//!
//! This crate provides the scheduling core of a ski-sprint event administration
//! system: it distributes contestants into qualification heats by seeding rank,
//! re-shuffles second-round pairings so round-one opponents are unlikely to meet
//! again, and recomputes start times so every competitor gets a minimum rest
//! period between rounds. The browser-facing console calls into this crate; all
//! contestant and race records live in external record services reached through
//! the registry abstraction.
//!
//! ## Features
//!
//! - **Heat Seeding**: Rank-based distribution of seeded contestants across
//!   qualification heats via pairwise bib swaps
//! - **Round-Two Rebalancing**: Start-entry shuffling between consecutive heats
//!   for unranked classes
//! - **Schedule Timing**: Minimum rest-time enforcement and uniform heat
//!   intervals over the race plan
//! - **Registry Abstraction**: Async traits over the contestant and race record
//!   services, with in-memory and REST backends
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and operation report types
//! - [`models`]: Domain entities (contestants, race classes, races, start entries)
//! - [`registry`]: Record-store traits, backends, factory, and configuration
//! - [`services`]: The engine operations (seeding, swaps, rebalancing, timing)

pub mod api;

pub mod models;
pub mod registry;

pub mod services;

pub use api::{ContestantId, EventId, RaceId, StartEntryId};
pub use models::{Contestant, Race, RaceRound, RaceTime, Raceclass, StartEntry};
pub use registry::{EventRegistry, RegistryError, RegistryResult};
pub use services::EngineError;
