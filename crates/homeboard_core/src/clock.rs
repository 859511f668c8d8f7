//! Clock widget text.

use crate::calendar::korean_weekday;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Rendered clock card for one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockFace {
    /// `HH:MM:SS`, 24-hour.
    pub time: String,
    /// `M월 d일 (요일)`, e.g. `10월 19일 (월)`.
    pub date: String,
    /// `YYYY년 M월 d일 (요일)`.
    pub long_date: String,
}

impl ClockFace {
    /// Formats a local wall-clock time.
    pub fn at(local: NaiveDateTime) -> Self {
        let weekday = korean_weekday(local.weekday());
        Self {
            time: format!(
                "{:02}:{:02}:{:02}",
                local.hour(),
                local.minute(),
                local.second()
            ),
            date: format!("{}월 {}일 ({weekday})", local.month(), local.day()),
            long_date: format!(
                "{}년 {}월 {}일 ({weekday})",
                local.year(),
                local.month(),
                local.day()
            ),
        }
    }

    pub fn now() -> Self {
        Self::at(chrono::Local::now().naive_local())
    }
}
