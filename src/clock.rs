use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Labels stop short of the second midnight.
pub const MAX_HOURS: u32 = 48;

/// Parse an "HH:MM" label into minutes since midnight of the logical day.
/// Hours may run past 23 ("25:30" is 1530) to express after-midnight play,
/// up to [`MAX_HOURS`].
pub fn time_to_minutes(label: &str) -> Result<u32> {
    let malformed = || ScheduleError::MalformedTime(label.to_string());
    let (hours, minutes) = label.trim().split_once(':').ok_or_else(malformed)?;
    if hours.is_empty()
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    if hours >= MAX_HOURS || minutes >= 60 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes as a zero-padded "HH:MM" label. Hours are not folded back
/// into 0..24, so this is the exact inverse of [`time_to_minutes`].
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Round to the nearest multiple of `grid`; halves round up.
pub fn snap(minutes: u32, grid: u32) -> u32 {
    if grid == 0 {
        return minutes;
    }
    minutes.saturating_add(grid / 2) / grid * grid
}

/// The label one hour later, with the same no-wrap convention.
pub fn increment_by_hour(label: &str) -> Result<String> {
    SlotTime::parse(label).map(|t| t.plus_hour().to_string())
}

/// A time of day in minutes, carried through serde as an "HH:MM" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u32);

impl SlotTime {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn parse(label: &str) -> Result<Self> {
        time_to_minutes(label).map(Self)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub const fn plus_hour(self) -> Self {
        Self(self.0.saturating_add(60))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time(self.0))
    }
}

impl TryFrom<String> for SlotTime {
    type Error = ScheduleError;

    fn try_from(label: String) -> Result<Self> {
        Self::parse(&label)
    }
}

impl From<SlotTime> for String {
    fn from(time: SlotTime) -> Self {
        time.to_string()
    }
}
