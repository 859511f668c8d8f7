//! Working day domain model for the work-hours tracker.
//!
//! # Invariants
//! - `end` is strictly later than `start` on the same day.
//! - `total_hours` is derived from `start`/`end`, never supplied by callers.

use crate::model::owner::OwnerTag;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type WorkingDayId = Uuid;

/// Minute step offered by the register form.
pub const MINUTE_STEP: u8 = 5;

/// Time of day with minute precision, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingDayValidationError {
    NilId,
    InvalidClockTime(String),
    EndNotAfterStart { start: ClockTime, end: ClockTime },
}

impl Display for WorkingDayValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "working day id must not be nil"),
            Self::InvalidClockTime(value) => {
                write!(f, "invalid clock time `{value}`; expected HH:MM")
            }
            Self::EndNotAfterStart { start, end } => {
                write!(f, "end time {end} must be later than start time {start}")
            }
        }
    }
}

impl Error for WorkingDayValidationError {}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, WorkingDayValidationError> {
        if hour > 23 || minute > 59 {
            return Err(WorkingDayValidationError::InvalidClockTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = WorkingDayValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkingDayValidationError::InvalidClockTime(value.to_string());
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.trim().parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.trim().parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = WorkingDayValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Hour choices for the register form (`00`..`23`).
pub fn hour_options() -> Vec<String> {
    (0..24).map(|hour| format!("{hour:02}")).collect()
}

/// Minute choices for the register form (`00`, `05`, ..., `55`).
pub fn minute_options() -> Vec<String> {
    (0..60)
        .step_by(usize::from(MINUTE_STEP))
        .map(|minute| format!("{minute:02}"))
        .collect()
}

/// One registered working day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingDay {
    pub id: WorkingDayId,
    pub owner: OwnerTag,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub total_hours: f64,
}

impl WorkingDay {
    pub fn new(
        owner: OwnerTag,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self, WorkingDayValidationError> {
        let total_hours = compute_total_hours(start, end)?;
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            date,
            start,
            end,
            total_hours,
        })
    }

    pub fn validate(&self) -> Result<(), WorkingDayValidationError> {
        if self.id.is_nil() {
            return Err(WorkingDayValidationError::NilId);
        }
        compute_total_hours(self.start, self.end)?;
        Ok(())
    }

    pub fn duration(&self) -> HoursMinutes {
        HoursMinutes::from_hours(self.total_hours)
    }
}

/// Hours between `start` and `end`; rejects empty or reversed ranges.
pub fn compute_total_hours(
    start: ClockTime,
    end: ClockTime,
) -> Result<f64, WorkingDayValidationError> {
    let start_minutes = start.minutes_since_midnight();
    let end_minutes = end.minutes_since_midnight();
    if end_minutes <= start_minutes {
        return Err(WorkingDayValidationError::EndNotAfterStart { start, end });
    }
    Ok(f64::from(end_minutes - start_minutes) / 60.0)
}

/// Fractional hours split for display, e.g. `8시간 30분`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

impl HoursMinutes {
    pub fn from_hours(hours: f64) -> Self {
        let total_minutes = (hours.max(0.0) * 60.0).round() as u32;
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }
}

impl Display for HoursMinutes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}시간 {}분", self.hours, self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_parses_and_renders_padded() {
        let time: ClockTime = "9:05".parse().unwrap();
        assert_eq!(time.to_string(), "09:05");
        assert_eq!(time.minutes_since_midnight(), 545);
    }

    #[test]
    fn clock_time_rejects_out_of_range_values() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("10:60".parse::<ClockTime>().is_err());
        assert!("1000".parse::<ClockTime>().is_err());
    }

    #[test]
    fn total_hours_is_derived_from_times() {
        let start = ClockTime::new(9, 0).unwrap();
        let end = ClockTime::new(17, 30).unwrap();
        assert_eq!(compute_total_hours(start, end).unwrap(), 8.5);
    }

    #[test]
    fn end_must_be_after_start() {
        let time = ClockTime::new(9, 0).unwrap();
        assert!(matches!(
            compute_total_hours(time, time),
            Err(WorkingDayValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn form_options_cover_the_day_in_five_minute_steps() {
        let hours = hour_options();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours.first().map(String::as_str), Some("00"));
        let minutes = minute_options();
        assert_eq!(minutes.len(), 12);
        assert_eq!(minutes.last().map(String::as_str), Some("55"));
    }

    #[test]
    fn hours_minutes_rounds_without_sixty_minutes() {
        assert_eq!(HoursMinutes::from_hours(8.5).to_string(), "8시간 30분");
        let almost = HoursMinutes::from_hours(1.9999);
        assert_eq!(almost, HoursMinutes { hours: 2, minutes: 0 });
    }
}
