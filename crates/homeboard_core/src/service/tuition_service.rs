//! Tuition tracker use-case service.
//!
//! # Responsibility
//! - Register, edit, list and delete monthly academy fees.
//! - Track per-month payments and derive payment status.
//! - Highlight due days on the month calendar.
//!
//! # Invariants
//! - A calendar day is highlighted iff it lies in the displayed month and
//!   some fee's `due_day` equals its day-of-month.
//! - Fee edits, deletes and payments only reach the caller's own fees;
//!   another owner's fee reads as `FeeNotFound`.

use crate::calendar::{first_day_of_month, month_grid, CalendarDay, CalendarError};
use crate::model::owner::OwnerTag;
use crate::model::tuition::{
    validate_month, PaymentStatus, TuitionFee, TuitionFeeId, TuitionPayment,
    TuitionValidationError,
};
use crate::repo::tuition_repo::TuitionRepository;
use crate::repo::RepoError;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TuitionServiceError {
    InvalidInput(TuitionValidationError),
    Calendar(CalendarError),
    FeeNotFound(TuitionFeeId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for TuitionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::FeeNotFound(id) => write!(f, "tuition fee not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent tuition state: {details}"),
        }
    }
}

impl Error for TuitionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TuitionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::FeeNotFound(id),
            RepoError::TuitionValidation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TuitionValidationError> for TuitionServiceError {
    fn from(value: TuitionValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<CalendarError> for TuitionServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

pub type TuitionServiceResult<T> = Result<T, TuitionServiceError>;

/// One fee's state in a given month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeMonthStatus {
    pub fee: TuitionFee,
    /// `None` when the month has no such day (e.g. 31st in April).
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

pub struct TuitionService<R: TuitionRepository> {
    repo: R,
}

impl<R: TuitionRepository> TuitionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register(
        &self,
        owner: &OwnerTag,
        academy_name: &str,
        amount: u64,
        due_day: u8,
    ) -> TuitionServiceResult<TuitionFee> {
        let fee = TuitionFee::new(owner.clone(), academy_name, amount, due_day)?;
        let id = self.repo.create_fee(&fee)?;
        self.read_back(id, "registered fee not found in read-back")
    }

    /// Replaces academy name, amount and due day of one of the owner's fees.
    pub fn update(
        &self,
        owner: &OwnerTag,
        id: TuitionFeeId,
        academy_name: &str,
        amount: u64,
        due_day: u8,
    ) -> TuitionServiceResult<TuitionFee> {
        let mut fee = self.owned_fee(owner, id)?;
        fee.academy_name = academy_name.trim().to_string();
        fee.amount = amount;
        fee.due_day = due_day;
        fee.validate()?;
        self.repo.update_fee(&fee)?;
        self.read_back(id, "updated fee not found in read-back")
    }

    pub fn get(&self, id: TuitionFeeId) -> TuitionServiceResult<Option<TuitionFee>> {
        Ok(self.repo.get_fee(id)?)
    }

    /// Lists the owner's fees, newest registration first.
    pub fn list(&self, owner: &OwnerTag) -> TuitionServiceResult<Vec<TuitionFee>> {
        Ok(self.repo.list_fees(owner)?)
    }

    /// Deletes a fee together with its payment history.
    pub fn delete(&self, owner: &OwnerTag, id: TuitionFeeId) -> TuitionServiceResult<()> {
        self.repo.delete_fee(owner, id)?;
        Ok(())
    }

    /// Sum of all monthly fee amounts of the owner.
    pub fn monthly_total(&self, owner: &OwnerTag) -> TuitionServiceResult<u64> {
        Ok(self
            .repo
            .list_fees(owner)?
            .iter()
            .filter(|fee| fee.is_monthly)
            .map(|fee| fee.amount)
            .sum())
    }

    /// Records that `fee_id` was paid for `year`/`month`. Idempotent.
    pub fn mark_paid(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
        year: i32,
        month: u32,
    ) -> TuitionServiceResult<()> {
        let payment = TuitionPayment::new(fee_id, year, month)?;
        self.repo.record_payment(owner, &payment)?;
        Ok(())
    }

    /// Removes a payment record; returns whether one existed.
    pub fn unmark_paid(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
        year: i32,
        month: u32,
    ) -> TuitionServiceResult<bool> {
        validate_month(month)?;
        Ok(self.repo.remove_payment(owner, fee_id, year, month)?)
    }

    pub fn payments(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
    ) -> TuitionServiceResult<Vec<TuitionPayment>> {
        Ok(self.repo.list_payments(owner, fee_id)?)
    }

    /// Payment status of one fee for `year`/`month` as seen on `today`.
    pub fn payment_status(
        &self,
        owner: &OwnerTag,
        fee_id: TuitionFeeId,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> TuitionServiceResult<PaymentStatus> {
        validate_month(month)?;
        let fee = self.owned_fee(owner, fee_id)?;
        let paid = self
            .repo
            .list_payments(owner, fee_id)?
            .iter()
            .any(|payment| payment.year == year && payment.month == month);
        Ok(fee.status_for(year, month, paid, today))
    }

    /// Status of every fee of the owner for `year`/`month`.
    pub fn month_overview(
        &self,
        owner: &OwnerTag,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> TuitionServiceResult<Vec<FeeMonthStatus>> {
        first_day_of_month(year, month)?;
        let paid: HashSet<TuitionFeeId> = self
            .repo
            .list_payments_in_month(owner, year, month)?
            .into_iter()
            .map(|payment| payment.fee_id)
            .collect();

        Ok(self
            .repo
            .list_fees(owner)?
            .into_iter()
            .map(|fee| {
                let status = fee.status_for(year, month, paid.contains(&fee.id), today);
                FeeMonthStatus {
                    due_date: fee.due_date_in(year, month),
                    status,
                    fee,
                }
            })
            .collect())
    }

    /// Month grid with the owner's tuition due days highlighted.
    pub fn due_calendar(
        &self,
        owner: &OwnerTag,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> TuitionServiceResult<Vec<CalendarDay>> {
        let mut grid = month_grid(year, month, today)?;
        let fees = self.repo.list_fees(owner)?;
        mark_due_days(&mut grid, &fees);
        Ok(grid)
    }

    fn owned_fee(&self, owner: &OwnerTag, id: TuitionFeeId) -> TuitionServiceResult<TuitionFee> {
        self.repo
            .get_fee(id)?
            .filter(|fee| &fee.owner == owner)
            .ok_or(TuitionServiceError::FeeNotFound(id))
    }

    fn read_back(&self, id: TuitionFeeId, details: &'static str) -> TuitionServiceResult<TuitionFee> {
        self.repo
            .get_fee(id)?
            .ok_or(TuitionServiceError::InconsistentState(details))
    }
}

/// Highlights in-month cells whose day-of-month is some fee's due day.
///
/// Every other cell is cleared, including padding cells of neighbour months.
pub fn mark_due_days(grid: &mut [CalendarDay], fees: &[TuitionFee]) {
    let due_days: HashSet<u32> = fees.iter().map(|fee| u32::from(fee.due_day)).collect();
    for cell in grid {
        cell.marked = cell.in_month && due_days.contains(&cell.date.day());
    }
}
