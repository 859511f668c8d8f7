//! Environment-driven dashboard settings.
//!
//! # Responsibility
//! - Resolve database path, weather coordinates and meal school codes.
//! - Fill defaults so a bare environment still yields a usable config.
//!
//! # Invariants
//! - Blank values behave exactly like unset keys.
//! - API keys are never logged.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "HOMEBOARD_DB_PATH";
pub const ENV_WEATHER_API_KEY: &str = "HOMEBOARD_WEATHER_API_KEY";
pub const ENV_WEATHER_LAT: &str = "HOMEBOARD_WEATHER_LAT";
pub const ENV_WEATHER_LON: &str = "HOMEBOARD_WEATHER_LON";
pub const ENV_MEAL_OFFICE_CODE: &str = "HOMEBOARD_MEAL_OFFICE_CODE";
pub const ENV_MEAL_SCHOOL_CODE: &str = "HOMEBOARD_MEAL_SCHOOL_CODE";
pub const ENV_MEAL_API_KEY: &str = "HOMEBOARD_MEAL_API_KEY";

const DEFAULT_DB_FILE_NAME: &str = "homeboard.sqlite3";
const DEFAULT_LAT: f64 = 37.3217;
const DEFAULT_LON: f64 = 127.0950;
const DEFAULT_OFFICE_CODE: &str = "J10";
const DEFAULT_SCHOOL_CODE: &str = "7751034";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    OutOfRange { key: &'static str, value: f64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a decimal number, got `{value}`")
            }
            Self::OutOfRange { key, value } => write!(f, "{key} is out of range: {value}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealConfig {
    /// Regional education office code (`ATPT_OFCDC_SC_CODE`).
    pub office_code: String,
    /// School code (`SD_SCHUL_CODE`).
    pub school_code: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub db_path: PathBuf,
    pub weather: WeatherConfig,
    pub meal: MealConfig,
}

impl DashboardConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, one call per key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let db_path = value(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let weather = WeatherConfig {
            api_key: value(ENV_WEATHER_API_KEY),
            lat: coordinate(ENV_WEATHER_LAT, value(ENV_WEATHER_LAT), DEFAULT_LAT, 90.0)?,
            lon: coordinate(ENV_WEATHER_LON, value(ENV_WEATHER_LON), DEFAULT_LON, 180.0)?,
        };

        let meal = MealConfig {
            office_code: value(ENV_MEAL_OFFICE_CODE)
                .unwrap_or_else(|| DEFAULT_OFFICE_CODE.to_string()),
            school_code: value(ENV_MEAL_SCHOOL_CODE)
                .unwrap_or_else(|| DEFAULT_SCHOOL_CODE.to_string()),
            api_key: value(ENV_MEAL_API_KEY),
        };

        Ok(Self {
            db_path,
            weather,
            meal,
        })
    }
}

fn coordinate(
    key: &'static str,
    raw: Option<String>,
    default: f64,
    limit: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed: f64 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw.clone() })?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(ConfigError::OutOfRange { key, value: parsed });
    }
    Ok(parsed)
}
