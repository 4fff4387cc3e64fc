//! Time of day for scheduled triggers, written `HH:MM` in the task file.

use std::{fmt, str::FromStr};

use jiff::civil::Time;
use serde::{Deserialize, Serialize};

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(Time);

impl TimeOfDay {
    /// Build from hour (0-23) and minute (0-59).
    pub fn new(hour: i8, minute: i8) -> Result<Self, InvalidTimeOfDay> {
        Time::new(hour, minute, 0, 0)
            .map(Self)
            .map_err(|_| InvalidTimeOfDay(format!("{hour}:{minute:02}")))
    }

    /// The civil time this represents.
    pub fn time(self) -> Time {
        self.0
    }
}

/// A time string that isn't `H:MM` / `HH:MM` within range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct InvalidTimeOfDay(String);

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTimeOfDay(s.to_string());
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if !(1..=2).contains(&hour.len()) || minute.len() != 2 || !digits(hour) || !digits(minute) {
            return Err(invalid());
        }
        let hour: i8 = hour.parse().map_err(|_| invalid())?;
        let minute: i8 = minute.parse().map_err(|_| invalid())?;

        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InvalidTimeOfDay;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!("09:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 0).unwrap());
        assert_eq!("9:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 0).unwrap());
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59");
        assert_eq!("00:00".parse::<TimeOfDay>().unwrap().to_string(), "00:00");
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        for bad in [
            "24:00", "12:60", "-1:00", "0900", "9", "9:5", "ab:cd", "", "09:00:00", "+9:00", "09:+5",
        ] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn orders_by_time() {
        let early: TimeOfDay = "08:59".parse().unwrap();
        let late: TimeOfDay = "09:00".parse().unwrap();
        assert!(early < late);
    }

    #[test]
    fn deserializes_from_json_string() {
        let t: TimeOfDay = serde_json::from_str(r#""18:45""#).unwrap();
        assert_eq!(t.time(), Time::new(18, 45, 0, 0).unwrap());

        let err = serde_json::from_str::<TimeOfDay>(r#""25:00""#).unwrap_err();
        assert!(err.to_string().contains("expected HH:MM"));
    }
}
