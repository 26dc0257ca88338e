use crate::error::{NiyyahError, Result};
use chrono::Timelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time within one day, stored as minutes since midnight.
///
/// The value is always in `0..=1439`; every constructor enforces that, so the
/// resolver and projector can treat any `TimeOfDay` as in range.
///
/// On the wire it is the string `"HH:MM"`. The backend emits `"HH:MM:SS"`,
/// so a trailing seconds field is accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap())
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(NiyyahError::InvalidTime(minutes.to_string()));
        }
        Ok(TimeOfDay(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(NiyyahError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }

    /// Parse `"HH:MM"` or `"HH:MM:SS"`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || NiyyahError::InvalidTime(s.to_string());
        let caps = time_re().captures(s.trim()).ok_or_else(invalid)?;
        let hour: u16 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u16 = caps[2].parse().map_err(|_| invalid())?;
        if let Some(sec) = caps.get(3) {
            let sec: u16 = sec.as_str().parse().map_err(|_| invalid())?;
            if sec > 59 {
                return Err(invalid());
            }
        }
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    /// Current local wall-clock time, truncated to the minute.
    pub fn now() -> Self {
        Self::from(chrono::Local::now().time())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight when
    /// `later` is numerically earlier.
    pub fn minutes_until(self, later: TimeOfDay) -> u16 {
        if later.0 >= self.0 {
            later.0 - self.0
        } else {
            MINUTES_PER_DAY - self.0 + later.0
        }
    }
}

impl From<chrono::NaiveTime> for TimeOfDay {
    fn from(t: chrono::NaiveTime) -> Self {
        // NaiveTime hour/minute are always in range.
        TimeOfDay((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = NiyyahError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = NiyyahError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
