use std::{fmt, str::FromStr};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HOUR_OPTIONS: [u8; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
pub const MINUTE_OPTIONS: [u8; 2] = [0, 30];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{value} is not a valid {kind} option")]
pub struct InvalidOption {
    pub kind: &'static str,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hours(u8);

impl Hours {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn options() -> impl Iterator<Item = Hours> {
        HOUR_OPTIONS.into_iter().map(Hours)
    }
}

impl TryFrom<u8> for Hours {
    type Error = InvalidOption;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if HOUR_OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidOption {
                kind: "hours",
                value,
            })
        }
    }
}

impl From<Hours> for u8 {
    fn from(value: Hours) -> Self {
        value.0
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 hour")
        } else {
            write!(f, "{} hours", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Minutes(u8);

impl Minutes {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn options() -> impl Iterator<Item = Minutes> {
        MINUTE_OPTIONS.into_iter().map(Minutes)
    }
}

impl TryFrom<u8> for Minutes {
    type Error = InvalidOption;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if MINUTE_OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidOption {
                kind: "minutes",
                value,
            })
        }
    }
}

impl From<Minutes> for u8 {
    fn from(value: Minutes) -> Self {
        value.0
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.0)
    }
}

/// How the alert is delivered when the interval elapses.
///
/// Stored records keep the original Portuguese identifiers, English names are
/// accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    #[serde(rename = "silencioso", alias = "silent")]
    Silent,
    #[serde(rename = "vibração", alias = "vibrate")]
    Vibrate,
    #[serde(rename = "som", alias = "sound")]
    Sound,
}

impl AlertType {
    pub const ALL: [AlertType; 3] = [AlertType::Silent, AlertType::Vibrate, AlertType::Sound];

    pub fn label(self) -> &'static str {
        match self {
            AlertType::Silent => "Silent",
            AlertType::Vibrate => "Vibration",
            AlertType::Sound => "Sound",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown alert type '{0}'")]
pub struct UnknownAlertType(pub String);

impl FromStr for AlertType {
    type Err = UnknownAlertType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "silencioso" => Ok(AlertType::Silent),
            "vibrate" | "vibration" | "vibração" => Ok(AlertType::Vibrate),
            "sound" | "som" => Ok(AlertType::Sound),
            _ => Err(UnknownAlertType(s.to_owned())),
        }
    }
}

pub fn calculate_interval_seconds(hours: u32, minutes: u32) -> u32 {
    hours * 3600 + minutes * 60
}

/// Fixed, strictly positive time between two alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmInterval(u32);

impl AlarmInterval {
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        (seconds > 0).then_some(Self(seconds))
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    pub fn as_time_delta(self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmConfig {
    pub hours: Hours,
    pub minutes: Minutes,
    pub alert_type: AlertType,
    pub is_active: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            hours: Hours(1),
            minutes: Minutes(0),
            alert_type: AlertType::Vibrate,
            is_active: false,
        }
    }
}

impl AlarmConfig {
    pub fn interval(&self) -> AlarmInterval {
        let seconds = calculate_interval_seconds(
            u32::from(self.hours.get()),
            u32::from(self.minutes.get()),
        );
        // Hours are never zero, so neither is the interval.
        AlarmInterval(seconds)
    }
}
