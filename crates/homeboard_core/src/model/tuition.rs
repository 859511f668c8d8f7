//! Tuition fee and payment records.
//!
//! # Invariants
//! - `amount` is a positive number of won.
//! - `due_day` is a day-of-month in `1..=31`; months shorter than the due
//!   day simply have no due date.
//! - A payment is keyed by `(fee_id, year, month)`.

use crate::model::now_epoch_ms;
use crate::model::owner::OwnerTag;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TuitionFeeId = Uuid;

pub const MIN_DUE_DAY: u8 = 1;
pub const MAX_DUE_DAY: u8 = 31;

/// A recurring academy fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionFee {
    pub id: TuitionFeeId,
    pub owner: OwnerTag,
    pub academy_name: String,
    /// Whole won.
    pub amount: u64,
    pub due_day: u8,
    pub is_monthly: bool,
    pub created_at: i64,
}

/// Record that one month of a fee was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionPayment {
    pub fee_id: TuitionFeeId,
    pub year: i32,
    pub month: u32,
    pub paid_at: i64,
}

/// Payment state of one fee in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    /// Due date still ahead (or absent in that month).
    Upcoming,
    DueToday,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuitionValidationError {
    NilId,
    BlankAcademyName,
    ZeroAmount,
    DueDayOutOfRange(u8),
    MonthOutOfRange(u32),
}

impl Display for TuitionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "tuition fee id must not be nil"),
            Self::BlankAcademyName => write!(f, "academy name must not be blank"),
            Self::ZeroAmount => write!(f, "tuition amount must be greater than zero"),
            Self::DueDayOutOfRange(day) => write!(
                f,
                "due day {day} is out of range {MIN_DUE_DAY}..={MAX_DUE_DAY}"
            ),
            Self::MonthOutOfRange(month) => write!(f, "month {month} is out of range 1..=12"),
        }
    }
}

impl Error for TuitionValidationError {}

impl TuitionFee {
    /// Creates a monthly fee with a generated id.
    pub fn new(
        owner: OwnerTag,
        academy_name: &str,
        amount: u64,
        due_day: u8,
    ) -> Result<Self, TuitionValidationError> {
        let fee = Self {
            id: Uuid::new_v4(),
            owner,
            academy_name: academy_name.trim().to_string(),
            amount,
            due_day,
            is_monthly: true,
            created_at: now_epoch_ms(),
        };
        fee.validate()?;
        Ok(fee)
    }

    pub fn validate(&self) -> Result<(), TuitionValidationError> {
        if self.id.is_nil() {
            return Err(TuitionValidationError::NilId);
        }
        if self.academy_name.trim().is_empty() {
            return Err(TuitionValidationError::BlankAcademyName);
        }
        if self.amount == 0 {
            return Err(TuitionValidationError::ZeroAmount);
        }
        validate_due_day(self.due_day)
    }

    /// Due date inside the given month, if that month has the due day.
    pub fn due_date_in(&self, year: i32, month: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, u32::from(self.due_day))
    }

    /// Payment state for `year`/`month` relative to `today`.
    pub fn status_for(&self, year: i32, month: u32, paid: bool, today: NaiveDate) -> PaymentStatus {
        if paid {
            return PaymentStatus::Paid;
        }
        match self.due_date_in(year, month) {
            Some(due) if due == today => PaymentStatus::DueToday,
            Some(due) if due < today => PaymentStatus::Overdue,
            _ => PaymentStatus::Upcoming,
        }
    }
}

impl TuitionPayment {
    pub fn new(fee_id: TuitionFeeId, year: i32, month: u32) -> Result<Self, TuitionValidationError> {
        validate_month(month)?;
        Ok(Self {
            fee_id,
            year,
            month,
            paid_at: now_epoch_ms(),
        })
    }
}

pub fn validate_due_day(due_day: u8) -> Result<(), TuitionValidationError> {
    if !(MIN_DUE_DAY..=MAX_DUE_DAY).contains(&due_day) {
        return Err(TuitionValidationError::DueDayOutOfRange(due_day));
    }
    Ok(())
}

pub fn validate_month(month: u32) -> Result<(), TuitionValidationError> {
    if !(1..=12).contains(&month) {
        return Err(TuitionValidationError::MonthOutOfRange(month));
    }
    Ok(())
}

/// Due day picked through a date picker: the date's day-of-month.
pub fn due_day_from_date(date: NaiveDate) -> u8 {
    // day() is always 1..=31
    date.day() as u8
}

/// Parses free-form amount input by keeping digits only.
///
/// Returns `None` when no digits remain or the value overflows.
pub fn parse_amount_input(input: &str) -> Option<u64> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Formats won with thousands separators (`1200000` -> `1,200,000`).
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerTag {
        OwnerTag::new("mom").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_fee_validates_fields() {
        assert_eq!(
            TuitionFee::new(owner(), " ", 1000, 5).unwrap_err(),
            TuitionValidationError::BlankAcademyName
        );
        assert_eq!(
            TuitionFee::new(owner(), "piano", 0, 5).unwrap_err(),
            TuitionValidationError::ZeroAmount
        );
        assert_eq!(
            TuitionFee::new(owner(), "piano", 1000, 32).unwrap_err(),
            TuitionValidationError::DueDayOutOfRange(32)
        );
        let fee = TuitionFee::new(owner(), " piano ", 150_000, 10).unwrap();
        assert_eq!(fee.academy_name, "piano");
        assert!(fee.is_monthly);
    }

    #[test]
    fn amount_input_keeps_digits_only() {
        assert_eq!(parse_amount_input("₩1,200,000"), Some(1_200_000));
        assert_eq!(parse_amount_input("abc"), None);
        assert_eq!(parse_amount_input("99999999999999999999999"), None);
    }

    #[test]
    fn won_formatting_groups_thousands() {
        assert_eq!(format_won(0), "0");
        assert_eq!(format_won(999), "999");
        assert_eq!(format_won(1000), "1,000");
        assert_eq!(format_won(1_200_000), "1,200,000");
    }

    #[test]
    fn due_date_is_absent_in_short_months() {
        let fee = TuitionFee::new(owner(), "math", 100, 31).unwrap();
        assert_eq!(fee.due_date_in(2026, 4), None);
        assert_eq!(fee.due_date_in(2026, 5), Some(date(2026, 5, 31)));
    }

    #[test]
    fn status_tracks_due_date_relative_to_today() {
        let fee = TuitionFee::new(owner(), "math", 100, 10).unwrap();
        let today = date(2026, 3, 10);
        assert_eq!(fee.status_for(2026, 3, true, today), PaymentStatus::Paid);
        assert_eq!(fee.status_for(2026, 3, false, today), PaymentStatus::DueToday);
        assert_eq!(fee.status_for(2026, 2, false, today), PaymentStatus::Overdue);
        assert_eq!(fee.status_for(2026, 4, false, today), PaymentStatus::Upcoming);
    }

    #[test]
    fn payment_rejects_invalid_month() {
        let fee = TuitionFee::new(owner(), "math", 100, 10).unwrap();
        assert_eq!(
            TuitionPayment::new(fee.id, 2026, 13).unwrap_err(),
            TuitionValidationError::MonthOutOfRange(13)
        );
    }

    #[test]
    fn due_day_comes_from_picked_date() {
        assert_eq!(due_day_from_date(date(2026, 10, 25)), 25);
    }
}
