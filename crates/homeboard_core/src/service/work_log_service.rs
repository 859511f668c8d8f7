//! Work-hours tracker use-case service.
//!
//! # Responsibility
//! - Register, edit, list and delete working days.
//! - Summarize hours and mark working days on a month calendar.
//!
//! # Invariants
//! - `total_hours` is always recomputed from start/end times.
//! - Edits keep the row id and owner of the original record.
//! - Edits and deletes only reach the caller's own rows; another owner's
//!   row reads as `WorkingDayNotFound`.

use crate::calendar::{month_grid, CalendarDay, CalendarError};
use crate::model::owner::OwnerTag;
use crate::model::working_day::{
    compute_total_hours, ClockTime, HoursMinutes, WorkingDay, WorkingDayId,
    WorkingDayValidationError,
};
use crate::repo::working_day_repo::WorkingDayRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WorkLogError {
    InvalidInput(WorkingDayValidationError),
    Calendar(CalendarError),
    WorkingDayNotFound(WorkingDayId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for WorkLogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::WorkingDayNotFound(id) => write!(f, "working day not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent working day state: {details}")
            }
        }
    }
}

impl Error for WorkLogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for WorkLogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::WorkingDayNotFound(id),
            RepoError::WorkingDayValidation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

impl From<WorkingDayValidationError> for WorkLogError {
    fn from(value: WorkingDayValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<CalendarError> for WorkLogError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

pub type WorkLogResult<T> = Result<T, WorkLogError>;

/// Totals shown at the top of the work screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkSummary {
    pub total_hours: f64,
    pub day_count: usize,
}

impl WorkSummary {
    pub fn from_days(days: &[WorkingDay]) -> Self {
        Self {
            total_hours: days.iter().map(|day| day.total_hours).sum(),
            day_count: days.len(),
        }
    }

    pub fn duration(&self) -> HoursMinutes {
        HoursMinutes::from_hours(self.total_hours)
    }
}

pub struct WorkLogService<R: WorkingDayRepository> {
    repo: R,
}

impl<R: WorkingDayRepository> WorkLogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one working day; end must be later than start.
    pub fn register(
        &self,
        owner: &OwnerTag,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> WorkLogResult<WorkingDay> {
        let day = WorkingDay::new(owner.clone(), date, start, end)?;
        let id = self.repo.create_working_day(&day)?;
        self.read_back(id, "registered working day not found in read-back")
    }

    /// Replaces date and times of one of the owner's working days.
    pub fn update(
        &self,
        owner: &OwnerTag,
        id: WorkingDayId,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> WorkLogResult<WorkingDay> {
        let mut day = self
            .repo
            .get_working_day(id)?
            .filter(|day| &day.owner == owner)
            .ok_or(WorkLogError::WorkingDayNotFound(id))?;
        day.total_hours = compute_total_hours(start, end)?;
        day.date = date;
        day.start = start;
        day.end = end;
        self.repo.update_working_day(&day)?;
        self.read_back(id, "updated working day not found in read-back")
    }

    pub fn get(&self, id: WorkingDayId) -> WorkLogResult<Option<WorkingDay>> {
        Ok(self.repo.get_working_day(id)?)
    }

    /// Lists the owner's working days, newest date first.
    pub fn list(&self, owner: &OwnerTag) -> WorkLogResult<Vec<WorkingDay>> {
        Ok(self.repo.list_working_days(owner)?)
    }

    pub fn delete(&self, owner: &OwnerTag, id: WorkingDayId) -> WorkLogResult<()> {
        self.repo.delete_working_day(owner, id)?;
        Ok(())
    }

    /// Total hours and number of days across all of the owner's records.
    pub fn summary(&self, owner: &OwnerTag) -> WorkLogResult<WorkSummary> {
        let days = self.repo.list_working_days(owner)?;
        Ok(WorkSummary::from_days(&days))
    }

    /// Month grid with every date that has a working day marked.
    ///
    /// Padding cells from neighbour months are marked too, matching what
    /// the grid shows.
    pub fn month_calendar(
        &self,
        owner: &OwnerTag,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> WorkLogResult<Vec<CalendarDay>> {
        let mut grid = month_grid(year, month, today)?;
        let (Some(first), Some(last)) = (grid.first(), grid.last()) else {
            return Ok(grid);
        };

        let worked: HashSet<NaiveDate> = self
            .repo
            .list_working_days_between(owner, first.date, last.date)?
            .into_iter()
            .map(|day| day.date)
            .collect();
        for cell in &mut grid {
            cell.marked = worked.contains(&cell.date);
        }
        Ok(grid)
    }

    fn read_back(&self, id: WorkingDayId, details: &'static str) -> WorkLogResult<WorkingDay> {
        self.repo
            .get_working_day(id)?
            .ok_or(WorkLogError::InconsistentState(details))
    }
}
