//! Public API surface for the engine.
//!
//! This file consolidates the identifier newtypes and re-exports the
//! operation report types. The identifier newtypes serialize as plain
//! JSON strings.

pub use crate::services::round_two::RebalanceReport;
pub use crate::services::seeding::ClassSeedingOutcome;
pub use crate::services::seeding::SeedingReport;
pub use crate::services::swaps::AssignBibOutcome;
pub use crate::services::swaps::SlotSwapOutcome;
pub use crate::services::swaps::SwapBibsOutcome;
pub use crate::services::timing::IntervalReport;
pub use crate::services::timing::RaceplanClassSummary;
pub use crate::services::timing::RestTimeReport;

use serde::{Deserialize, Serialize};

/// Event identifier issued by the event record service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Contestant identifier issued by the event record service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContestantId(pub String);

/// Race identifier issued by the race record service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceId(pub String);

/// Start-entry identifier issued by the race record service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartEntryId(pub String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        EventId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl ContestantId {
    pub fn new(value: impl Into<String>) -> Self {
        ContestantId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl RaceId {
    pub fn new(value: impl Into<String>) -> Self {
        RaceId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl StartEntryId {
    pub fn new(value: impl Into<String>) -> Self {
        StartEntryId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ContestantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for RaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for StartEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId(value.to_string())
    }
}
impl From<&str> for ContestantId {
    fn from(value: &str) -> Self {
        ContestantId(value.to_string())
    }
}
impl From<&str> for RaceId {
    fn from(value: &str) -> Self {
        RaceId(value.to_string())
    }
}
impl From<&str> for StartEntryId {
    fn from(value: &str) -> Self {
        StartEntryId(value.to_string())
    }
}
