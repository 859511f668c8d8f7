//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define one data-access contract per dashboard table family.
//! - Keep SQL details out of services and view state.
//!
//! # Invariants
//! - Write paths validate the model before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Mutations addressing a missing row return `RepoError::NotFound`.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::owner::OwnerTag;
use crate::model::todo::TodoValidationError;
use crate::model::tuition::TuitionValidationError;
use crate::model::working_day::WorkingDayValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod todo_repo;
pub mod tuition_repo;
pub mod working_day_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every dashboard repository.
#[derive(Debug)]
pub enum RepoError {
    TodoValidation(TodoValidationError),
    WorkingDayValidation(WorkingDayValidationError),
    TuitionValidation(TuitionValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TodoValidation(err) => write!(f, "{err}"),
            Self::WorkingDayValidation(err) => write!(f, "{err}"),
            Self::TuitionValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TodoValidation(err) => Some(err),
            Self::WorkingDayValidation(err) => Some(err),
            Self::TuitionValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::TodoValidation(value)
    }
}

impl From<WorkingDayValidationError> for RepoError {
    fn from(value: WorkingDayValidationError) -> Self {
        Self::WorkingDayValidation(value)
    }
}

impl From<TuitionValidationError> for RepoError {
    fn from(value: TuitionValidationError) -> Self {
        Self::TuitionValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that did not go through `open_db*`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let version = schema_version(conn)?;
    if version < latest_version() {
        return Err(RepoError::InvalidData(format!(
            "connection schema version {version} is older than required {}",
            latest_version()
        )));
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_owner(value: String, column: &str) -> RepoResult<OwnerTag> {
    OwnerTag::new(value)
        .map_err(|err| RepoError::InvalidData(format!("{err} in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
