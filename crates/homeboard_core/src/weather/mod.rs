//! Weather widget.
//!
//! # Invariants
//! - `load_weather` never fails; errors become a panel message.
//! - The API key is required before any request is made.

pub mod client;
pub mod model;

use crate::http::FetchError;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use client::{parse_weather_response, OpenWeatherClient};
pub use model::{icon_emoji, WeatherReport};

/// Card title of the weather widget.
pub const WEATHER_TITLE: &str = "용인시 수지구 날씨";

pub trait WeatherSource {
    fn current_weather(&self) -> Result<WeatherReport, FetchError>;
}

impl<S: WeatherSource + ?Sized> WeatherSource for &S {
    fn current_weather(&self) -> Result<WeatherReport, FetchError> {
        (**self).current_weather()
    }
}

/// What the weather card renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherPanel {
    Report(WeatherReport),
    Unavailable { message: String, hint: Option<String> },
}

impl WeatherPanel {
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Unavailable { .. } => None,
        }
    }
}

pub fn load_weather<S: WeatherSource>(source: &S) -> WeatherPanel {
    match source.current_weather() {
        Ok(report) => {
            info!(
                "event=weather_load module=weather status=ok icon={}",
                report.icon
            );
            WeatherPanel::Report(report)
        }
        Err(err) => {
            warn!("event=weather_load module=weather status=error error={err}");
            let hint = matches!(
                err,
                FetchError::MissingApiKey(_) | FetchError::Status { status: 401, .. }
            )
            .then(|| "OpenWeatherMap API 키를 확인해주세요.".to_string());
            WeatherPanel::Unavailable {
                message: "날씨 정보를 가져올 수 없습니다.".to_string(),
                hint,
            }
        }
    }
}
