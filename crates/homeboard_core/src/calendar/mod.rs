//! Calendar bookkeeping shared by dashboard widgets.
//!
//! # Responsibility
//! - Build Sunday-first month grids for the work and tuition calendars.
//! - Navigate school weeks (Monday to Friday) for the meal widget.
//!
//! # Invariants
//! - A month grid contains every day of the displayed month exactly once and
//!   starts on a Sunday and ends on a Saturday, except where the padding
//!   would leave chrono's date range.
//! - A school week is always five consecutive dates, Monday to Friday.
//! - Date arithmetic is checked; out-of-range input is a `CalendarError`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of school days shown by the meal widget.
pub const SCHOOL_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth { year: i32, month: u32 },
    WeekOutOfRange { offset: i32 },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => write!(f, "invalid month {year}-{month:02}"),
            Self::WeekOutOfRange { offset } => {
                write!(f, "school week offset {offset} is outside the supported date range")
            }
        }
    }
}

impl Error for CalendarError {}

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Whether the date belongs to the displayed month (not padding).
    pub in_month: bool,
    pub is_today: bool,
    /// Widget-specific highlight (working day, tuition due day, ...).
    pub marked: bool,
}

/// First day of the month, or an error for an invalid month.
pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

/// Last day of the month, or an error for an invalid month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    first_day_of_month(year, month)?;
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or(CalendarError::InvalidMonth { year, month })
}

/// Moves `(year, month)` by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let shifted_year = index.div_euclid(12) as i32;
    let shifted_month = index.rem_euclid(12) as u32 + 1;
    (shifted_year, shifted_month)
}

/// Sunday-first grid for the given month, padded with neighbour days.
///
/// No cell is `marked`; callers highlight cells for their own widget.
pub fn month_grid(year: i32, month: u32, today: NaiveDate) -> Result<Vec<CalendarDay>, CalendarError> {
    let first = first_day_of_month(year, month)?;
    let last = last_day_of_month(year, month)?;
    let leading = i64::from(first.weekday().num_days_from_sunday());
    let trailing = 6 - i64::from(last.weekday().num_days_from_sunday());
    let grid_start = first
        .checked_sub_signed(Duration::days(leading))
        .unwrap_or(NaiveDate::MIN);
    let grid_end = last
        .checked_add_signed(Duration::days(trailing))
        .unwrap_or(NaiveDate::MAX);

    let mut days = Vec::with_capacity(42);
    let mut cursor = Some(grid_start);
    while let Some(date) = cursor.filter(|date| *date <= grid_end) {
        days.push(CalendarDay {
            date,
            in_month: date.year() == year && date.month() == month,
            is_today: date == today,
            marked: false,
        });
        cursor = date.succ_opt();
    }
    Ok(days)
}

/// Five school days (Monday to Friday) shown by the meal widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolWeek {
    pub days: [NaiveDate; SCHOOL_DAYS],
}

impl SchoolWeek {
    pub fn monday(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn friday(&self) -> NaiveDate {
        self.days[SCHOOL_DAYS - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Heading such as `3월 2주차 (3/9 ~ 3/13)`.
    pub fn label(&self) -> String {
        let monday = self.monday();
        let friday = self.friday();
        format!(
            "{}월 {}주차 ({}/{} ~ {}/{})",
            monday.month(),
            week_of_month(monday),
            monday.month(),
            monday.day(),
            friday.month(),
            friday.day()
        )
    }
}

/// School week `offset` weeks away from the week anchored on `today`.
///
/// Weekdays anchor on their own week; Saturday and Sunday anchor on the
/// upcoming week, since that is the next week with school meals.
///
/// # Errors
/// - `WeekOutOfRange` when the week would fall outside chrono's date range.
pub fn school_week(today: NaiveDate, offset: i32) -> Result<SchoolWeek, CalendarError> {
    let out_of_range = CalendarError::WeekOutOfRange { offset };
    let back_to_monday = match today.weekday() {
        Weekday::Sat => -2,
        Weekday::Sun => -1,
        other => i64::from(other.num_days_from_monday()),
    };
    let monday = today
        .checked_sub_signed(Duration::days(back_to_monday))
        .and_then(|anchor| anchor.checked_add_signed(Duration::weeks(i64::from(offset))))
        .ok_or(out_of_range)?;

    let mut days = [monday; SCHOOL_DAYS];
    for (index, day) in days.iter_mut().enumerate() {
        *day = monday
            .checked_add_signed(Duration::days(index as i64))
            .ok_or(out_of_range)?;
    }
    Ok(SchoolWeek { days })
}

/// 1-based week index of `date` inside its month, weeks starting Sunday.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_offset = date
        .with_day(1)
        .map_or(0, |first| first.weekday().num_days_from_sunday());
    (date.day() + first_offset + 6) / 7
}

/// Korean one-letter weekday name (`월`, `화`, ...).
pub fn korean_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}
