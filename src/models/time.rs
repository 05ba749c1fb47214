use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use serde::*;

/// Wall-clock start time of a race.
///
/// The record services run on naive local timestamps in
/// `%Y-%m-%dT%H:%M:%S` format; no timezone is ever attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceTime(NaiveDateTime);

impl RaceTime {
    /// Create a new race time.
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Inner timestamp.
    pub fn value(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse from the record services' wire format (`2021-08-21T09:00:00`).
    pub fn parse(s: &str) -> Result<Self> {
        let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .with_context(|| format!("Invalid race time '{s}'"))?;
        Ok(Self(dt))
    }

    /// Time-of-day rendering (`09:00:00`), used by the start-time update call.
    pub fn time_of_day(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl std::fmt::Display for RaceTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl From<NaiveDateTime> for RaceTime {
    fn from(value: NaiveDateTime) -> Self {
        RaceTime(value)
    }
}

impl std::ops::Add<Duration> for RaceTime {
    type Output = RaceTime;

    fn add(self, rhs: Duration) -> RaceTime {
        RaceTime(self.0 + rhs)
    }
}

impl std::ops::Sub<RaceTime> for RaceTime {
    type Output = Duration;

    fn sub(self, rhs: RaceTime) -> Duration {
        self.0 - rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::RaceTime;
    use chrono::Duration;

    #[test]
    fn test_parse_wire_format() {
        let t = RaceTime::parse("2021-08-21T09:00:00").unwrap();
        assert_eq!(t.to_string(), "2021-08-21T09:00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RaceTime::parse("09:00").is_err());
        assert!(RaceTime::parse("2021-08-21 09:00:00").is_err());
    }

    #[test]
    fn test_time_of_day() {
        let t = RaceTime::parse("2021-08-21T09:30:15").unwrap();
        assert_eq!(t.time_of_day(), "09:30:15");
    }

    #[test]
    fn test_add_duration() {
        let t = RaceTime::parse("2021-08-21T09:00:00").unwrap();
        let shifted = t + Duration::minutes(150);
        assert_eq!(shifted.to_string(), "2021-08-21T11:30:00");
    }

    #[test]
    fn test_difference() {
        let a = RaceTime::parse("2021-08-21T09:00:00").unwrap();
        let b = RaceTime::parse("2021-08-21T09:10:30").unwrap();
        assert_eq!(b - a, Duration::seconds(630));
    }

    #[test]
    fn test_ordering() {
        let a = RaceTime::parse("2021-08-21T09:00:00").unwrap();
        let b = RaceTime::parse("2021-08-21T10:00:00").unwrap();

        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn test_serde_roundtrip() {
        let t = RaceTime::parse("2021-08-21T09:00:00").unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"2021-08-21T09:00:00\"");

        let back: RaceTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
