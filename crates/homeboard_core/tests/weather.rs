use homeboard_core::weather::parse_weather_response;
use homeboard_core::{load_weather, FetchError, WeatherPanel, WeatherReport, WeatherSource};

struct FixtureSource(&'static str);

impl WeatherSource for FixtureSource {
    fn current_weather(&self) -> Result<WeatherReport, FetchError> {
        parse_weather_response(self.0)
    }
}

struct FailingSource(fn() -> FetchError);

impl WeatherSource for FailingSource {
    fn current_weather(&self) -> Result<WeatherReport, FetchError> {
        Err((self.0)())
    }
}

const CLEAR_NIGHT: &str = r#"{
  "coord":{"lon":127.095,"lat":37.3217},
  "weather":[{"id":800,"main":"Clear","description":"맑음","icon":"01n"}],
  "main":{"temp":12.34,"feels_like":11.02,"temp_min":10.0,"temp_max":14.0,"pressure":1020,"humidity":47},
  "name":"Suji-gu","cod":200
}"#;

#[test]
fn report_panel_carries_conditions() {
    let panel = load_weather(&FixtureSource(CLEAR_NIGHT));

    let report = panel.report().unwrap();
    assert_eq!(report.temperature, 12.34);
    assert_eq!(report.feels_like, 11.02);
    assert_eq!(report.humidity, 47);
    assert_eq!(report.description, "맑음");
    assert_eq!(report.emoji(), "🌙");
}

#[test]
fn missing_key_panel_hints_at_configuration() {
    let panel = load_weather(&FailingSource(|| FetchError::MissingApiKey("OpenWeatherMap")));

    match panel {
        WeatherPanel::Unavailable { message, hint } => {
            assert_eq!(message, "날씨 정보를 가져올 수 없습니다.");
            assert_eq!(hint.as_deref(), Some("OpenWeatherMap API 키를 확인해주세요."));
        }
        other => panic!("unexpected panel: {other:?}"),
    }
}

#[test]
fn other_failures_have_no_hint() {
    let panel = load_weather(&FailingSource(|| FetchError::Decode("truncated".to_string())));

    assert!(panel.report().is_none());
    assert!(matches!(
        panel,
        WeatherPanel::Unavailable { hint: None, .. }
    ));
}

#[test]
fn unknown_icon_falls_back_to_rainbow() {
    let body = r#"{"weather":[{"description":"?","icon":"77x"}],
                   "main":{"temp":1.0,"feels_like":1.0,"humidity":100}}"#;
    let report = parse_weather_response(body).unwrap();
    assert_eq!(report.emoji(), "🌈");
}
