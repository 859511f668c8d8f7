//! Terminal front end for the family dashboard.
//!
//! # Responsibility
//! - Drive every widget use case from a shell against the same database
//!   the app uses.
//! - Keep output line-oriented so it can be grepped.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use homeboard_core::calendar::korean_weekday;
use homeboard_core::db::open_db;
use homeboard_core::model::tuition::{format_won, parse_amount_input};
use homeboard_core::{
    default_log_level, init_logging, load_meal_week, load_weather, CalendarDay, ClockFace,
    ClockTime, DashboardConfig, NeisMealClient, OpenWeatherClient, OwnerTag, PaymentStatus,
    SqliteTodoRepository, SqliteTuitionRepository, SqliteWorkingDayRepository, TodoBoard,
    TodoFilter, TuitionService, WeatherPanel, WorkLogService,
};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "homeboard", author, version, about = "Family dashboard from the terminal")]
struct Cli {
    /// Whose records to work with.
    #[arg(long, global = true, default_value = "family")]
    owner: String,
    /// Write rolling log files into this directory.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the core library links.
    Ping,
    #[command(subcommand)]
    Todo(TodoCommand),
    #[command(subcommand)]
    Work(WorkCommand),
    #[command(subcommand)]
    Tuition(TuitionCommand),
    /// School meals for one week.
    Meal {
        /// Weeks away from the current school week.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Current weather.
    Weather,
    /// Current time and date.
    Clock,
}

#[derive(Subcommand, Debug)]
enum TodoCommand {
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    Add {
        text: String,
    },
    Toggle {
        id: Uuid,
    },
    Edit {
        id: Uuid,
        text: String,
    },
    Rm {
        id: Uuid,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for TodoFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => TodoFilter::All,
            FilterArg::Active => TodoFilter::Active,
            FilterArg::Completed => TodoFilter::Completed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum WorkCommand {
    /// Register a working day, e.g. `work add 2026-10-19 09:00 17:30`.
    Add {
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    },
    List,
    Rm {
        id: Uuid,
    },
    /// Month calendar with worked days marked.
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum TuitionCommand {
    /// Register a monthly fee; amount accepts `₩` and commas.
    Add {
        academy: String,
        amount: String,
        due_day: u8,
    },
    List,
    Rm {
        id: Uuid,
    },
    /// Mark a month as paid (this month when omitted).
    Paid {
        id: Uuid,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Remove the payment instead.
        #[arg(long, default_value_t = false)]
        undo: bool,
    },
    /// Month calendar with due days marked.
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(dir) = cli.log_dir.as_deref() {
        init_logging(default_log_level(), dir).map_err(|err| err.to_string())?;
    }
    let config = DashboardConfig::from_env().map_err(|err| err.to_string())?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Ping => {
            println!("homeboard_core ping={}", homeboard_core::ping());
            println!("homeboard_core version={}", homeboard_core::core_version());
            Ok(())
        }
        Command::Todo(command) => run_todo(&config, owner(&cli.owner)?, command),
        Command::Work(command) => run_work(&config, &owner(&cli.owner)?, command, today),
        Command::Tuition(command) => run_tuition(&config, &owner(&cli.owner)?, command, today),
        Command::Meal { offset } => {
            let client = NeisMealClient::new(config.meal).map_err(|err| err.to_string())?;
            let week = load_meal_week(&client, today, offset).map_err(|err| err.to_string())?;
            println!("{}", week.label);
            if let Some(error) = &week.error {
                println!("! {error}");
            }
            for day in &week.days {
                let marker = if day.date == today { "*" } else { " " };
                println!(
                    "{marker}{} ({}) {}",
                    day.date.format("%m/%d"),
                    korean_weekday(day.date.weekday()),
                    day.dishes.join(", ")
                );
                if day.available {
                    println!("    {:.1} kcal", day.nutrition.calories);
                }
            }
            Ok(())
        }
        Command::Weather => {
            let panel = match OpenWeatherClient::new(config.weather) {
                Ok(client) => load_weather(&client),
                Err(err) => return Err(err.to_string()),
            };
            println!("{}", homeboard_core::weather::WEATHER_TITLE);
            match panel {
                WeatherPanel::Report(report) => {
                    println!("{} {}", report.emoji(), report.description);
                    println!(
                        "{:.1}°C (체감 {:.1}°C) 습도 {}%",
                        report.temperature, report.feels_like, report.humidity
                    );
                }
                WeatherPanel::Unavailable { message, hint } => {
                    println!("{message}");
                    if let Some(hint) = hint {
                        println!("{hint}");
                    }
                }
            }
            Ok(())
        }
        Command::Clock => {
            let face = ClockFace::now();
            println!("{}", face.time);
            println!("{}", face.long_date);
            Ok(())
        }
    }
}

fn run_todo(config: &DashboardConfig, owner: OwnerTag, command: TodoCommand) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteTodoRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut board = TodoBoard::load(repo, owner).map_err(|err| err.to_string())?;

    let outcome = match command {
        TodoCommand::List { filter } => {
            board.set_filter(filter.into());
            Ok(())
        }
        TodoCommand::Add { text } => board.add(&text).map(|id| println!("added {id}")),
        TodoCommand::Toggle { id } => board.toggle(id),
        TodoCommand::Edit { id, text } => board
            .begin_edit(id)
            .and_then(|()| board.set_draft(text))
            .and_then(|()| board.save_edit()),
        TodoCommand::Rm { id } => board.delete(id),
    };

    print_board(&board);
    outcome.map_err(|err| board.last_error().map(str::to_string).unwrap_or_else(|| err.to_string()))
}

fn print_board(board: &TodoBoard<SqliteTodoRepository<'_>>) {
    let visible = board.visible();
    if visible.is_empty() {
        println!("{}", board.filter().empty_message());
    }
    for todo in visible {
        let mark = if todo.completed { "x" } else { " " };
        println!("[{mark}] {} {}", todo.id, todo.text);
    }
    println!("남은 할 일 {}개", board.active_count());
}

fn run_work(
    config: &DashboardConfig,
    owner: &OwnerTag,
    command: WorkCommand,
    today: NaiveDate,
) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteWorkingDayRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = WorkLogService::new(repo);

    match command {
        WorkCommand::Add { date, start, end } => {
            let day = service
                .register(owner, date, start, end)
                .map_err(|err| err.to_string())?;
            println!("added {} {} {}-{} ({})", day.id, day.date, day.start, day.end, day.duration());
        }
        WorkCommand::List => {
            for day in service.list(owner).map_err(|err| err.to_string())? {
                println!("{} {} {}-{} {}", day.id, day.date, day.start, day.end, day.duration());
            }
            let summary = service.summary(owner).map_err(|err| err.to_string())?;
            println!("총 {}일 {}", summary.day_count, summary.duration());
        }
        WorkCommand::Rm { id } => service.delete(owner, id).map_err(|err| err.to_string())?,
        WorkCommand::Month { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let grid = service
                .month_calendar(owner, year, month, today)
                .map_err(|err| err.to_string())?;
            print_calendar(year, month, &grid);
        }
    }
    Ok(())
}

fn run_tuition(
    config: &DashboardConfig,
    owner: &OwnerTag,
    command: TuitionCommand,
    today: NaiveDate,
) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteTuitionRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = TuitionService::new(repo);

    match command {
        TuitionCommand::Add {
            academy,
            amount,
            due_day,
        } => {
            let amount =
                parse_amount_input(&amount).ok_or_else(|| format!("invalid amount: `{amount}`"))?;
            let fee = service
                .register(owner, &academy, amount, due_day)
                .map_err(|err| err.to_string())?;
            println!("added {} {} ₩{} 매월 {}일", fee.id, fee.academy_name, format_won(fee.amount), fee.due_day);
        }
        TuitionCommand::List => {
            let overview = service
                .month_overview(owner, today.year(), today.month(), today)
                .map_err(|err| err.to_string())?;
            for entry in overview {
                println!(
                    "{} {} ₩{} 매월 {}일 {}",
                    entry.fee.id,
                    entry.fee.academy_name,
                    format_won(entry.fee.amount),
                    entry.fee.due_day,
                    status_label(entry.status)
                );
            }
            let total = service.monthly_total(owner).map_err(|err| err.to_string())?;
            println!("월 합계 ₩{}", format_won(total));
        }
        TuitionCommand::Rm { id } => service.delete(owner, id).map_err(|err| err.to_string())?,
        TuitionCommand::Paid {
            id,
            year,
            month,
            undo,
        } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            if undo {
                service
                    .unmark_paid(owner, id, year, month)
                    .map_err(|err| err.to_string())?;
            } else {
                service
                    .mark_paid(owner, id, year, month)
                    .map_err(|err| err.to_string())?;
            }
        }
        TuitionCommand::Month { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let grid = service
                .due_calendar(owner, year, month, today)
                .map_err(|err| err.to_string())?;
            print_calendar(year, month, &grid);
        }
    }
    Ok(())
}

fn status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "납부 완료",
        PaymentStatus::Upcoming => "예정",
        PaymentStatus::DueToday => "오늘 납부",
        PaymentStatus::Overdue => "미납",
    }
}

/// Prints a Sunday-first grid; marked days get `*`, today gets brackets.
fn print_calendar(year: i32, month: u32, grid: &[CalendarDay]) {
    println!("{year}년 {month}월");
    println!(" 일  월  화  수  목  금  토");
    for week in grid.chunks(7) {
        let line: Vec<String> = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    return "    ".to_string();
                }
                let mark = if cell.marked { '*' } else { ' ' };
                if cell.is_today {
                    format!("[{:>2}]", cell.date.day())
                } else {
                    format!("{:>2}{mark} ", cell.date.day())
                }
            })
            .collect();
        println!("{}", line.join("").trim_end());
    }
}

fn owner(raw: &str) -> Result<OwnerTag, String> {
    OwnerTag::new(raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_meal_offset_parses() {
        let cli = Cli::try_parse_from(["homeboard", "meal", "--offset", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Meal { offset: -1 }));
    }

    #[test]
    fn work_add_parses_date_and_times() {
        let cli =
            Cli::try_parse_from(["homeboard", "work", "add", "2026-10-19", "09:00", "17:30"])
                .unwrap();
        match cli.command {
            Command::Work(WorkCommand::Add { date, start, end }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
                assert_eq!(start.to_string(), "09:00");
                assert_eq!(end.to_string(), "17:30");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_clock_time_is_rejected() {
        assert!(Cli::try_parse_from(["homeboard", "work", "add", "2026-10-19", "9am", "17:30"])
            .is_err());
    }

    #[test]
    fn owner_is_global() {
        let cli = Cli::try_parse_from(["homeboard", "todo", "list", "--owner", "mom"]).unwrap();
        assert_eq!(cli.owner, "mom");
    }
}
