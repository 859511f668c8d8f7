//! FFI use-case API for Flutter-facing dashboard calls.
//!
//! # Responsibility
//! - Expose one function per widget action to Dart via FRB.
//! - Flatten core types into plain envelopes (strings, numbers, lists).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every todo mutation returns the authoritative list for its owner.
//! - Each call opens its own connection; no state survives between calls.

use chrono::{Datelike, Local, NaiveDate};
use homeboard_core::db::open_db;
use homeboard_core::model::tuition::{format_won, parse_amount_input};
use homeboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, load_meal_week,
    load_weather, ping as ping_inner, CalendarDay, ClockFace, ClockTime, DashboardConfig, MealDay,
    MealWeek, NeisMealClient, OpenWeatherClient, OwnerTag, SchoolWeek, SqliteTodoRepository,
    SqliteTuitionRepository, SqliteWorkingDayRepository, Todo, TodoBoard, TodoFilter,
    TuitionService, WeatherPanel, WorkLogService, WorkingDay,
};
use log::warn;
use rusqlite::Connection;
use std::sync::OnceLock;
use uuid::Uuid;

static CONFIG: OnceLock<Result<DashboardConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Todo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
}

/// Todo list envelope returned by every todo call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    /// Items passing `filter`, most recent first.
    pub items: Vec<TodoItemView>,
    /// Incomplete items across all filters.
    pub active_count: u32,
    /// Empty on success; user-visible text otherwise.
    pub message: String,
}

/// Lists an owner's todos; `filter` is `all|active|completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list(owner: String, filter: String) -> TodoListResponse {
    with_todo_board(&owner, &filter, |_| Ok(()))
}

/// Adds a todo and returns the refreshed list.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(owner: String, filter: String, text: String) -> TodoListResponse {
    with_todo_board(&owner, &filter, |board| {
        board.add(&text).map(|_| ()).map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(owner: String, filter: String, todo_id: String) -> TodoListResponse {
    with_todo_board(&owner, &filter, |board| {
        let id = parse_id(&todo_id)?;
        board.toggle(id).map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_update(owner: String, filter: String, todo_id: String, text: String) -> TodoListResponse {
    with_todo_board(&owner, &filter, |board| {
        let id = parse_id(&todo_id)?;
        board.update_text(id, &text).map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(owner: String, filter: String, todo_id: String) -> TodoListResponse {
    with_todo_board(&owner, &filter, |board| {
        let id = parse_id(&todo_id)?;
        board.delete(id).map_err(|err| err.to_string())
    })
}

// ---------------------------------------------------------------------------
// Work log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WorkingDayView {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start: String,
    pub end: String,
    pub total_hours: f64,
    /// e.g. `8시간 30분`
    pub duration_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkLogResponse {
    pub ok: bool,
    /// Newest date first.
    pub days: Vec<WorkingDayView>,
    pub total_hours: f64,
    pub day_count: u32,
    pub total_label: String,
    pub message: String,
}

/// Registers a working day; `date` is `YYYY-MM-DD`, times are `HH:MM`.
#[flutter_rust_bridge::frb(sync)]
pub fn work_register(owner: String, date: String, start: String, end: String) -> WorkLogResponse {
    with_work_log(&owner, |service, owner| {
        let date = parse_date(&date)?;
        let start = parse_clock(&start)?;
        let end = parse_clock(&end)?;
        service
            .register(owner, date, start, end)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn work_update(
    owner: String,
    day_id: String,
    date: String,
    start: String,
    end: String,
) -> WorkLogResponse {
    with_work_log(&owner, |service, owner| {
        let id = parse_id(&day_id)?;
        let date = parse_date(&date)?;
        let start = parse_clock(&start)?;
        let end = parse_clock(&end)?;
        service
            .update(owner, id, date, start, end)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn work_list(owner: String) -> WorkLogResponse {
    with_work_log(&owner, |_, _| Ok(()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn work_delete(owner: String, day_id: String) -> WorkLogResponse {
    with_work_log(&owner, |service, owner| {
        let id = parse_id(&day_id)?;
        service.delete(owner, id).map_err(|err| err.to_string())
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCellView {
    pub date: String,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub marked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarResponse {
    pub ok: bool,
    /// Sunday-first, whole weeks.
    pub cells: Vec<CalendarCellView>,
    pub message: String,
}

/// Month grid with the owner's working days marked.
#[flutter_rust_bridge::frb(sync)]
pub fn work_month_calendar(owner: String, year: i32, month: u32) -> CalendarResponse {
    calendar_response(with_connection(|conn| {
        let owner = parse_owner(&owner)?;
        let repo = SqliteWorkingDayRepository::try_new(conn).map_err(|err| err.to_string())?;
        WorkLogService::new(repo)
            .month_calendar(&owner, year, month, today())
            .map_err(|err| err.to_string())
    }))
}

// ---------------------------------------------------------------------------
// Tuition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuitionFeeView {
    pub id: String,
    pub academy_name: String,
    pub amount: u64,
    /// e.g. `1,200,000`
    pub amount_label: String,
    pub due_day: u8,
    /// `paid|upcoming|due_today|overdue` for the current month.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuitionListResponse {
    pub ok: bool,
    /// Newest registration first.
    pub fees: Vec<TuitionFeeView>,
    pub monthly_total: u64,
    pub monthly_total_label: String,
    pub message: String,
}

/// Registers a fee; `amount_input` may carry `₩` and commas.
#[flutter_rust_bridge::frb(sync)]
pub fn tuition_register(
    owner: String,
    academy_name: String,
    amount_input: String,
    due_day: u8,
) -> TuitionListResponse {
    with_tuition(&owner, |service, owner| {
        let amount = parse_amount_input(&amount_input)
            .ok_or_else(|| format!("invalid amount: `{amount_input}`"))?;
        service
            .register(owner, &academy_name, amount, due_day)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tuition_update(
    owner: String,
    fee_id: String,
    academy_name: String,
    amount_input: String,
    due_day: u8,
) -> TuitionListResponse {
    with_tuition(&owner, |service, owner| {
        let id = parse_id(&fee_id)?;
        let amount = parse_amount_input(&amount_input)
            .ok_or_else(|| format!("invalid amount: `{amount_input}`"))?;
        service
            .update(owner, id, &academy_name, amount, due_day)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tuition_list(owner: String) -> TuitionListResponse {
    with_tuition(&owner, |_, _| Ok(()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn tuition_delete(owner: String, fee_id: String) -> TuitionListResponse {
    with_tuition(&owner, |service, owner| {
        let id = parse_id(&fee_id)?;
        service.delete(owner, id).map_err(|err| err.to_string())
    })
}

/// Marks (`paid=true`) or unmarks one month of a fee as paid.
#[flutter_rust_bridge::frb(sync)]
pub fn tuition_set_paid(
    owner: String,
    fee_id: String,
    year: i32,
    month: u32,
    paid: bool,
) -> TuitionListResponse {
    with_tuition(&owner, |service, owner| {
        let id = parse_id(&fee_id)?;
        let result = if paid {
            service.mark_paid(owner, id, year, month)
        } else {
            service.unmark_paid(owner, id, year, month).map(|_| ())
        };
        result.map_err(|err| err.to_string())
    })
}

/// Month grid with tuition due days highlighted.
#[flutter_rust_bridge::frb(sync)]
pub fn tuition_due_calendar(owner: String, year: i32, month: u32) -> CalendarResponse {
    calendar_response(with_connection(|conn| {
        let owner = parse_owner(&owner)?;
        let repo = SqliteTuitionRepository::try_new(conn).map_err(|err| err.to_string())?;
        TuitionService::new(repo)
            .due_calendar(&owner, year, month, today())
            .map_err(|err| err.to_string())
    }))
}

// ---------------------------------------------------------------------------
// Remote widgets and clock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MealDayView {
    pub date: String,
    /// Korean weekday letter.
    pub weekday: String,
    pub is_today: bool,
    pub available: bool,
    pub dishes: Vec<String>,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub vitamin_a: f64,
    pub thiamine: f64,
    pub riboflavin: f64,
    pub vitamin_c: f64,
    pub calcium: f64,
    pub iron: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealWeekResponse {
    pub label: String,
    /// Five entries, Monday to Friday; empty only when `offset` leaves the
    /// supported date range.
    pub days: Vec<MealDayView>,
    /// Set when the provider could not be reached or the week is invalid.
    pub message: Option<String>,
}

/// School-meal week `offset` weeks from the current one.
///
/// # FFI contract
/// - Blocking network call (bounded by a timeout); call off the UI thread.
/// - An out-of-range `offset` returns no days and a message, without any
///   request.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_week(offset: i32) -> MealWeekResponse {
    let today = today();
    let week = match homeboard_core::school_week(today, offset) {
        Ok(week) => week,
        Err(err) => {
            warn!("event=ffi_meal module=ffi status=error offset={offset} error={err}");
            return MealWeekResponse {
                label: String::new(),
                days: Vec::new(),
                message: Some(err.to_string()),
            };
        }
    };

    let client = dashboard_config().and_then(|config| {
        NeisMealClient::new(config.meal.clone()).map_err(|err| err.to_string())
    });
    let loaded = match client {
        Ok(client) => load_meal_week(&client, today, offset)
            .unwrap_or_else(|err| unavailable_meal_week(week, err.to_string())),
        Err(message) => unavailable_meal_week(week, message),
    };
    meal_week_response(loaded, today)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResponse {
    pub ok: bool,
    pub title: String,
    pub emoji: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub description: String,
    pub message: String,
    pub hint: Option<String>,
}

/// Current weather for the configured coordinates.
///
/// # FFI contract
/// - Blocking network call unless the API key is missing.
#[flutter_rust_bridge::frb(sync)]
pub fn weather() -> WeatherResponse {
    let panel = match dashboard_config()
        .and_then(|config| OpenWeatherClient::new(config.weather.clone()).map_err(|e| e.to_string()))
    {
        Ok(client) => load_weather(&client),
        Err(message) => WeatherPanel::Unavailable {
            message,
            hint: None,
        },
    };
    weather_response(panel)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockResponse {
    pub time: String,
    pub date: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn clock_now() -> ClockResponse {
    let face = ClockFace::now();
    ClockResponse {
        time: face.time,
        date: face.date,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dashboard_config() -> Result<&'static DashboardConfig, String> {
    CONFIG
        .get_or_init(|| DashboardConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let config = dashboard_config()?;
    let conn = open_db(&config.db_path).map_err(|err| format!("database open failed: {err}"))?;
    f(&conn)
}

fn with_todo_board(
    owner: &str,
    filter: &str,
    action: impl FnOnce(&mut TodoBoard<SqliteTodoRepository<'_>>) -> Result<(), String>,
) -> TodoListResponse {
    let outcome = with_connection(|conn| {
        let owner = parse_owner(owner)?;
        let filter: TodoFilter = filter.parse().map_err(|err| format!("{err}"))?;
        let repo = SqliteTodoRepository::try_new(conn).map_err(|err| err.to_string())?;
        let mut board = TodoBoard::load(repo, owner).map_err(|err| err.to_string())?;
        board.set_filter(filter);

        let result = action(&mut board);
        let items = board.visible().into_iter().map(todo_view).collect();
        let active_count = board.active_count() as u32;
        Ok(match result {
            Ok(()) => TodoListResponse {
                ok: true,
                items,
                active_count,
                message: String::new(),
            },
            Err(err) => TodoListResponse {
                ok: false,
                items,
                active_count,
                message: board.last_error().map(str::to_string).unwrap_or(err),
            },
        })
    });

    outcome.unwrap_or_else(|message| {
        warn!("event=ffi_todo module=ffi status=error error={message}");
        TodoListResponse {
            ok: false,
            items: Vec::new(),
            active_count: 0,
            message,
        }
    })
}

fn with_work_log(
    owner: &str,
    action: impl FnOnce(
        &WorkLogService<SqliteWorkingDayRepository<'_>>,
        &OwnerTag,
    ) -> Result<(), String>,
) -> WorkLogResponse {
    let mut failure = None;
    let outcome = with_connection(|conn| {
        let owner = parse_owner(owner)?;
        let repo = SqliteWorkingDayRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = WorkLogService::new(repo);
        failure = action(&service, &owner).err();
        let days = service.list(&owner).map_err(|err| err.to_string())?;
        let summary = service.summary(&owner).map_err(|err| err.to_string())?;
        Ok((days, summary))
    });

    match outcome {
        Ok((days, summary)) => WorkLogResponse {
            ok: failure.is_none(),
            days: days.iter().map(working_day_view).collect(),
            total_hours: summary.total_hours,
            day_count: summary.day_count as u32,
            total_label: summary.duration().to_string(),
            message: failure.unwrap_or_default(),
        },
        Err(message) => {
            warn!("event=ffi_work module=ffi status=error error={message}");
            WorkLogResponse {
                ok: false,
                days: Vec::new(),
                total_hours: 0.0,
                day_count: 0,
                total_label: String::new(),
                message,
            }
        }
    }
}

fn with_tuition(
    owner: &str,
    action: impl FnOnce(&TuitionService<SqliteTuitionRepository<'_>>, &OwnerTag) -> Result<(), String>,
) -> TuitionListResponse {
    let mut failure = None;
    let now = today();
    let outcome = with_connection(|conn| {
        let owner = parse_owner(owner)?;
        let repo = SqliteTuitionRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = TuitionService::new(repo);
        failure = action(&service, &owner).err();
        let overview = service
            .month_overview(&owner, now.year(), now.month(), now)
            .map_err(|err| err.to_string())?;
        let total = service.monthly_total(&owner).map_err(|err| err.to_string())?;
        Ok((overview, total))
    });

    match outcome {
        Ok((overview, total)) => TuitionListResponse {
            ok: failure.is_none(),
            fees: overview
                .into_iter()
                .map(|entry| TuitionFeeView {
                    id: entry.fee.id.to_string(),
                    amount_label: format_won(entry.fee.amount),
                    academy_name: entry.fee.academy_name,
                    amount: entry.fee.amount,
                    due_day: entry.fee.due_day,
                    status: payment_status_label(entry.status).to_string(),
                })
                .collect(),
            monthly_total: total,
            monthly_total_label: format_won(total),
            message: failure.unwrap_or_default(),
        },
        Err(message) => {
            warn!("event=ffi_tuition module=ffi status=error error={message}");
            TuitionListResponse {
                ok: false,
                fees: Vec::new(),
                monthly_total: 0,
                monthly_total_label: String::new(),
                message,
            }
        }
    }
}

fn calendar_response(outcome: Result<Vec<CalendarDay>, String>) -> CalendarResponse {
    match outcome {
        Ok(grid) => CalendarResponse {
            ok: true,
            cells: grid
                .into_iter()
                .map(|cell| CalendarCellView {
                    date: cell.date.to_string(),
                    day: cell.date.day(),
                    in_month: cell.in_month,
                    is_today: cell.is_today,
                    marked: cell.marked,
                })
                .collect(),
            message: String::new(),
        },
        Err(message) => CalendarResponse {
            ok: false,
            cells: Vec::new(),
            message,
        },
    }
}

fn unavailable_meal_week(week: SchoolWeek, message: String) -> MealWeek {
    MealWeek {
        label: week.label(),
        days: week.days.iter().copied().map(MealDay::placeholder).collect(),
        week,
        error: Some(message),
    }
}

fn meal_week_response(week: MealWeek, today: NaiveDate) -> MealWeekResponse {
    MealWeekResponse {
        label: week.label,
        days: week
            .days
            .into_iter()
            .map(|day| MealDayView {
                date: day.date.to_string(),
                weekday: homeboard_core::calendar::korean_weekday(day.date.weekday()).to_string(),
                is_today: day.date == today,
                available: day.available,
                dishes: day.dishes,
                calories: day.nutrition.calories,
                carbs: day.nutrition.carbs,
                protein: day.nutrition.protein,
                fat: day.nutrition.fat,
                vitamin_a: day.nutrition.vitamin_a,
                thiamine: day.nutrition.thiamine,
                riboflavin: day.nutrition.riboflavin,
                vitamin_c: day.nutrition.vitamin_c,
                calcium: day.nutrition.calcium,
                iron: day.nutrition.iron,
            })
            .collect(),
        message: week.error,
    }
}

fn weather_response(panel: WeatherPanel) -> WeatherResponse {
    let title = homeboard_core::weather::WEATHER_TITLE.to_string();
    match panel {
        WeatherPanel::Report(report) => WeatherResponse {
            ok: true,
            title,
            emoji: report.emoji().to_string(),
            temperature: report.temperature,
            feels_like: report.feels_like,
            humidity: report.humidity,
            description: report.description,
            message: String::new(),
            hint: None,
        },
        WeatherPanel::Unavailable { message, hint } => WeatherResponse {
            ok: false,
            title,
            emoji: String::new(),
            temperature: 0.0,
            feels_like: 0.0,
            humidity: 0,
            description: String::new(),
            message,
            hint,
        },
    }
}

fn todo_view(todo: &Todo) -> TodoItemView {
    TodoItemView {
        id: todo.id.to_string(),
        text: todo.text.clone(),
        completed: todo.completed,
        created_at: todo.created_at,
    }
}

fn working_day_view(day: &WorkingDay) -> WorkingDayView {
    WorkingDayView {
        id: day.id.to_string(),
        date: day.date.to_string(),
        start: day.start.to_string(),
        end: day.end.to_string(),
        total_hours: day.total_hours,
        duration_label: day.duration().to_string(),
    }
}

fn payment_status_label(status: homeboard_core::PaymentStatus) -> &'static str {
    use homeboard_core::PaymentStatus;
    match status {
        PaymentStatus::Paid => "paid",
        PaymentStatus::Upcoming => "upcoming",
        PaymentStatus::DueToday => "due_today",
        PaymentStatus::Overdue => "overdue",
    }
}

fn parse_owner(raw: &str) -> Result<OwnerTag, String> {
    OwnerTag::new(raw).map_err(|err| err.to_string())
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id: `{raw}`"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date: `{raw}` (expected YYYY-MM-DD)"))
}

fn parse_clock(raw: &str) -> Result<ClockTime, String> {
    raw.parse::<ClockTime>().map_err(|err| err.to_string())
}
