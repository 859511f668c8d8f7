//! Working day repository contract and SQLite implementation.
//!
//! # Invariants
//! - Dates are stored as `YYYY-MM-DD`, times as `HH:MM`.
//! - `total_hours` is persisted from the validated model, never from input.
//! - Updates and deletes only match rows of the given owner.

use crate::model::now_epoch_ms;
use crate::model::owner::OwnerTag;
use crate::model::working_day::{ClockTime, WorkingDay, WorkingDayId};
use crate::repo::{ensure_connection_ready, parse_owner, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const DATE_FORMAT: &str = "%Y-%m-%d";

const WORKING_DAY_SELECT_SQL: &str = "SELECT
    uuid,
    owner,
    work_date,
    start_time,
    end_time,
    total_hours
FROM working_days";

/// Repository interface for working day records.
pub trait WorkingDayRepository {
    fn create_working_day(&self, day: &WorkingDay) -> RepoResult<WorkingDayId>;
    /// Matches on id and `day.owner`; a foreign row is `NotFound`.
    fn update_working_day(&self, day: &WorkingDay) -> RepoResult<()>;
    fn get_working_day(&self, id: WorkingDayId) -> RepoResult<Option<WorkingDay>>;
    /// Newest date first.
    fn list_working_days(&self, owner: &OwnerTag) -> RepoResult<Vec<WorkingDay>>;
    /// Inclusive date range, oldest first.
    fn list_working_days_between(
        &self,
        owner: &OwnerTag,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<WorkingDay>>;
    fn delete_working_day(&self, owner: &OwnerTag, id: WorkingDayId) -> RepoResult<()>;
}

/// SQLite-backed working day repository.
pub struct SqliteWorkingDayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkingDayRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_days(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<WorkingDay>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            days.push(parse_working_day_row(row)?);
        }
        Ok(days)
    }
}

impl WorkingDayRepository for SqliteWorkingDayRepository<'_> {
    fn create_working_day(&self, day: &WorkingDay) -> RepoResult<WorkingDayId> {
        day.validate()?;

        self.conn.execute(
            "INSERT INTO working_days (
                uuid,
                owner,
                work_date,
                start_time,
                end_time,
                total_hours,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                day.id.to_string(),
                day.owner.as_str(),
                day.date.format(DATE_FORMAT).to_string(),
                day.start.to_string(),
                day.end.to_string(),
                day.total_hours,
                now_epoch_ms(),
            ],
        )?;

        Ok(day.id)
    }

    fn update_working_day(&self, day: &WorkingDay) -> RepoResult<()> {
        day.validate()?;

        let changed = self.conn.execute(
            "UPDATE working_days
             SET
                work_date = ?2,
                start_time = ?3,
                end_time = ?4,
                total_hours = ?5
             WHERE uuid = ?1 AND owner = ?6;",
            params![
                day.id.to_string(),
                day.date.format(DATE_FORMAT).to_string(),
                day.start.to_string(),
                day.end.to_string(),
                day.total_hours,
                day.owner.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(day.id));
        }
        Ok(())
    }

    fn get_working_day(&self, id: WorkingDayId) -> RepoResult<Option<WorkingDay>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKING_DAY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_working_day_row(row)?));
        }
        Ok(None)
    }

    fn list_working_days(&self, owner: &OwnerTag) -> RepoResult<Vec<WorkingDay>> {
        self.query_days(
            &format!(
                "{WORKING_DAY_SELECT_SQL}
                 WHERE owner = ?1
                 ORDER BY work_date DESC, start_time DESC;"
            ),
            [owner.as_str()],
        )
    }

    fn list_working_days_between(
        &self,
        owner: &OwnerTag,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<WorkingDay>> {
        self.query_days(
            &format!(
                "{WORKING_DAY_SELECT_SQL}
                 WHERE owner = ?1
                   AND work_date BETWEEN ?2 AND ?3
                 ORDER BY work_date ASC, start_time ASC;"
            ),
            params![
                owner.as_str(),
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string(),
            ],
        )
    }

    fn delete_working_day(&self, owner: &OwnerTag, id: WorkingDayId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM working_days WHERE uuid = ?1 AND owner = ?2;",
            params![id.to_string(), owner.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_working_day_row(row: &Row<'_>) -> RepoResult<WorkingDay> {
    let uuid_text: String = row.get("uuid")?;
    let date_text: String = row.get("work_date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in working_days.work_date"
        ))
    })?;

    let day = WorkingDay {
        id: parse_uuid(&uuid_text, "working_days.uuid")?,
        owner: parse_owner(row.get("owner")?, "working_days.owner")?,
        date,
        start: parse_clock(row.get("start_time")?, "working_days.start_time")?,
        end: parse_clock(row.get("end_time")?, "working_days.end_time")?,
        total_hours: row.get("total_hours")?,
    };
    day.validate()?;
    Ok(day)
}

fn parse_clock(value: String, column: &str) -> RepoResult<ClockTime> {
    value
        .parse()
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{value}` in {column}")))
}
