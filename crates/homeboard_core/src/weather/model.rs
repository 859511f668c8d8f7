use serde::{Deserialize, Serialize};

/// Fallback for icon codes the table does not know.
pub const UNKNOWN_ICON: &str = "🌈";

/// Current conditions as shown on the weather card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// °C
    pub temperature: f64,
    /// °C
    pub feels_like: f64,
    /// %
    pub humidity: u8,
    pub description: String,
    /// Provider icon code such as `10d`.
    pub icon: String,
}

impl WeatherReport {
    pub fn emoji(&self) -> &'static str {
        icon_emoji(&self.icon)
    }
}

/// Maps provider icon codes (`01d`, `10n`, ...) to an emoji.
pub fn icon_emoji(code: &str) -> &'static str {
    match code.trim() {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10n" => "🌧️",
        "10d" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "🌨️",
        "50d" | "50n" => "🌫️",
        _ => UNKNOWN_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::icon_emoji;

    #[test]
    fn day_and_night_codes_differ_where_expected() {
        assert_eq!(icon_emoji("01d"), "☀️");
        assert_eq!(icon_emoji("01n"), "🌙");
        assert_eq!(icon_emoji("10d"), "🌦️");
        assert_eq!(icon_emoji("10n"), "🌧️");
        assert_eq!(icon_emoji("04n"), "☁️");
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(icon_emoji(""), "🌈");
        assert_eq!(icon_emoji("99d"), "🌈");
    }
}
