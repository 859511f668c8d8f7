use chrono::{Datelike, Duration, NaiveDate, Weekday};
use homeboard_core::meal::parse::parse_meal_response;
use homeboard_core::meal::NO_MEAL_PLACEHOLDER;
use homeboard_core::{load_meal_week, CalendarError, FetchError, MealDay, MealSource};
use std::cell::RefCell;

/// Serves a canned provider payload and records requested ranges.
struct FixtureSource {
    body: &'static str,
    requests: RefCell<Vec<(NaiveDate, NaiveDate)>>,
}

impl FixtureSource {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl MealSource for FixtureSource {
    fn fetch_meals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<MealDay>, FetchError> {
        self.requests.borrow_mut().push((from, to));
        parse_meal_response(self.body)
    }
}

struct DownSource;

impl MealSource for DownSource {
    fn fetch_meals(&self, _from: NaiveDate, _to: NaiveDate) -> Result<Vec<MealDay>, FetchError> {
        Err(FetchError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

const WEEK_FIXTURE: &str = r#"{"mealServiceDietInfo":[
  {"head":[{"list_total_count":2},{"RESULT":{"CODE":"INFO-000","MESSAGE":"정상 처리되었습니다."}}]},
  {"row":[
    {"MLSV_YMD":"20261019","MMEAL_SC_NM":"중식","DDISH_NM":"기장밥<br/>돈육김치찌개 (5.9.10.)<br/>깍두기",
     "CAL_INFO":"789.5 Kcal","NTR_INFO":"탄수화물(g) : 110.2<br/>단백질(g) : 31.0<br/>철분(mg) : 4.1"},
    {"MLSV_YMD":"20261021","MMEAL_SC_NM":"중식","DDISH_NM":"카레라이스<br/>요구르트",
     "CAL_INFO":"701 Kcal","NTR_INFO":""}
  ]}
]}"#;

const NO_DATA_FIXTURE: &str =
    r#"{"RESULT":{"CODE":"INFO-200","MESSAGE":"해당하는 데이터가 없습니다."}}"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn week_has_five_days_with_placeholders_for_gaps() {
    let source = FixtureSource::new(WEEK_FIXTURE);
    let week = load_meal_week(&source, date(2026, 10, 21), 0).unwrap();

    assert_eq!(week.days.len(), 5);
    assert_eq!(week.label, "10월 4주차 (10/19 ~ 10/23)");
    assert!(week.error.is_none());
    assert_eq!(
        source.requests.borrow().as_slice(),
        &[(date(2026, 10, 19), date(2026, 10, 23))]
    );

    let monday = &week.days[0];
    assert_eq!(monday.dishes, vec!["기장밥", "돈육김치찌개 (5.9.10.)", "깍두기"]);
    assert_eq!(monday.nutrition.calories, 789.5);
    assert_eq!(monday.nutrition.carbs, 110.2);
    assert_eq!(monday.nutrition.iron, 4.1);

    let tuesday = week.day(date(2026, 10, 20)).unwrap();
    assert!(!tuesday.available);
    assert_eq!(tuesday.dishes, vec![NO_MEAL_PLACEHOLDER]);

    assert_eq!(week.days[2].nutrition.calories, 701.0);
}

#[test]
fn navigation_always_yields_monday_to_friday() {
    let source = FixtureSource::new(NO_DATA_FIXTURE);
    let start = date(2026, 10, 17);

    for day_offset in 0..10 {
        let today = start + Duration::days(day_offset);
        for week_offset in -3..=3 {
            let week = load_meal_week(&source, today, week_offset).unwrap();
            let dates: Vec<NaiveDate> = week.days.iter().map(|day| day.date).collect();
            assert_eq!(dates.len(), 5);
            assert_eq!(dates[0].weekday(), Weekday::Mon);
            assert_eq!(dates[4].weekday(), Weekday::Fri);
            for pair in dates.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
            assert_eq!(week.week.days.to_vec(), dates);
        }
    }
}

#[test]
fn weekend_shows_the_coming_week() {
    let source = FixtureSource::new(NO_DATA_FIXTURE);
    let week = load_meal_week(&source, date(2026, 10, 25), 0).unwrap();
    assert_eq!(week.days[0].date, date(2026, 10, 26));

    let previous = load_meal_week(&source, date(2026, 10, 25), -1).unwrap();
    assert_eq!(previous.days[0].date, date(2026, 10, 19));
}

#[test]
fn fetch_failure_yields_placeholders_and_message() {
    let week = load_meal_week(&DownSource, date(2026, 10, 21), 1).unwrap();

    assert_eq!(week.days.len(), 5);
    assert_eq!(week.days[0].date, date(2026, 10, 26));
    assert!(week.days.iter().all(|day| !day.available));
    assert!(week
        .days
        .iter()
        .all(|day| day.dishes == vec![NO_MEAL_PLACEHOLDER.to_string()]));
    let message = week.error.unwrap();
    assert!(message.contains("급식 정보를 가져오는데 실패했습니다"));
    assert!(message.contains("503"));
}

#[test]
fn offset_beyond_the_calendar_is_an_error_without_fetching() {
    let source = FixtureSource::new(r#"{"RESULT":{"CODE":"INFO-200","MESSAGE":"없음"}}"#);

    let err = load_meal_week(&source, date(2026, 10, 21), i32::MAX).unwrap_err();

    assert_eq!(err, CalendarError::WeekOutOfRange { offset: i32::MAX });
    assert!(source.requests.borrow().is_empty());
}
