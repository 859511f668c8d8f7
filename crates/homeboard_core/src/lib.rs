//! Core domain logic for the family dashboard.
//! This crate is the single source of truth for widget invariants.

pub mod board;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod http;
pub mod logging;
pub mod meal;
pub mod model;
pub mod repo;
pub mod service;
pub mod weather;

pub use board::todo_board::{BoardError, BoardResult, EditSession, TodoBoard};
pub use calendar::{month_grid, school_week, shift_month, CalendarDay, CalendarError, SchoolWeek};
pub use clock::ClockFace;
pub use config::{ConfigError, DashboardConfig, MealConfig, WeatherConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use http::FetchError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use meal::{load_meal_week, MealDay, MealSource, MealWeek, NeisMealClient, Nutrition};
pub use model::owner::{OwnerTag, OwnerTagError};
pub use model::todo::{Todo, TodoFilter, TodoId, TodoValidationError};
pub use model::tuition::{PaymentStatus, TuitionFee, TuitionFeeId, TuitionPayment};
pub use model::working_day::{ClockTime, HoursMinutes, WorkingDay, WorkingDayId};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::tuition_repo::{SqliteTuitionRepository, TuitionRepository};
pub use repo::working_day_repo::{SqliteWorkingDayRepository, WorkingDayRepository};
pub use repo::{RepoError, RepoResult};
pub use service::todo_service::{TodoService, TodoServiceError};
pub use service::tuition_service::{FeeMonthStatus, TuitionService, TuitionServiceError};
pub use service::work_log_service::{WorkLogError, WorkLogService, WorkSummary};
pub use weather::{load_weather, OpenWeatherClient, WeatherPanel, WeatherReport, WeatherSource};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
