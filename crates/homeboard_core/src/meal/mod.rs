//! School-meal widget.
//!
//! # Responsibility
//! - Fetch one school week of meals from the provider.
//! - Always hand the view five days, Monday to Friday.
//!
//! # Invariants
//! - `MealWeek::days` has exactly five entries matching `MealWeek::week`.
//! - A fetch failure yields placeholder days plus an error message, never
//!   an `Err`; only a week outside the date range is an `Err`.

pub mod client;
pub mod model;
pub mod parse;

use crate::calendar::{school_week, CalendarError, SchoolWeek};
use crate::http::FetchError;
use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use client::NeisMealClient;
pub use model::{MealDay, Nutrition, NO_MEAL_PLACEHOLDER};

/// Anything that can list meals for an inclusive date range.
pub trait MealSource {
    fn fetch_meals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<MealDay>, FetchError>;
}

impl<S: MealSource + ?Sized> MealSource for &S {
    fn fetch_meals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<MealDay>, FetchError> {
        (**self).fetch_meals(from, to)
    }
}

/// What the meal widget renders for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealWeek {
    pub week: SchoolWeek,
    /// Heading such as `10월 4주차 (10/19 ~ 10/23)`.
    pub label: String,
    pub days: Vec<MealDay>,
    pub error: Option<String>,
}

impl MealWeek {
    pub fn day(&self, date: NaiveDate) -> Option<&MealDay> {
        self.days.iter().find(|day| day.date == date)
    }
}

/// Loads the school week `offset` weeks away from the one anchored on `today`.
///
/// # Errors
/// - `WeekOutOfRange` when `offset` leaves the calendar; nothing is fetched.
pub fn load_meal_week<S: MealSource>(
    source: &S,
    today: NaiveDate,
    offset: i32,
) -> Result<MealWeek, CalendarError> {
    let week = school_week(today, offset)?;
    let label = week.label();

    match source.fetch_meals(week.monday(), week.friday()) {
        Ok(meals) => {
            let days = assemble_week(&week, meals);
            info!(
                "event=meal_week module=meal status=ok monday={} days_with_meals={}",
                week.monday(),
                days.iter().filter(|day| day.available).count()
            );
            Ok(MealWeek {
                week,
                label,
                days,
                error: None,
            })
        }
        Err(err) => {
            warn!(
                "event=meal_week module=meal status=error monday={} error={}",
                week.monday(),
                err
            );
            Ok(MealWeek {
                days: week.days.iter().copied().map(MealDay::placeholder).collect(),
                week,
                label,
                error: Some(format!("급식 정보를 가져오는데 실패했습니다. ({err})")),
            })
        }
    }
}

/// Picks one meal per school day; lunch wins over other meals of a day.
fn assemble_week(week: &SchoolWeek, meals: Vec<MealDay>) -> Vec<MealDay> {
    week.days
        .iter()
        .map(|date| {
            let lunch = meals.iter().find(|meal| meal.date == *date && meal.is_lunch());
            lunch
                .or_else(|| meals.iter().find(|meal| meal.date == *date))
                .cloned()
                .unwrap_or_else(|| MealDay::placeholder(*date))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::model::Nutrition;

    fn meal(date: NaiveDate, name: Option<&str>, dish: &str) -> MealDay {
        MealDay {
            date,
            meal_name: name.map(str::to_string),
            dishes: vec![dish.to_string()],
            nutrition: Nutrition::default(),
            available: true,
        }
    }

    #[test]
    fn lunch_is_preferred_over_other_meals() {
        let week = school_week(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), 0).unwrap();
        let monday = week.monday();
        let days = assemble_week(
            &week,
            vec![
                meal(monday, Some("조식"), "토스트"),
                meal(monday, Some("중식"), "비빔밥"),
            ],
        );
        assert_eq!(days[0].dishes, vec!["비빔밥"]);
        assert!(!days[1].available);
    }

    #[test]
    fn meals_outside_the_week_are_ignored() {
        let week = school_week(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), 0).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        let days = assemble_week(&week, vec![meal(saturday, None, "떡볶이")]);
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|day| !day.available));
    }
}
