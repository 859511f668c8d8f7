use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dish line shown for a school day without meal data.
pub const NO_MEAL_PLACEHOLDER: &str = "급식 정보 없음";

/// Nutrition facts of one meal. Unknown values stay `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    /// kcal
    pub calories: f64,
    /// g
    pub carbs: f64,
    /// g
    pub protein: f64,
    /// g
    pub fat: f64,
    /// R.E
    pub vitamin_a: f64,
    /// mg
    pub thiamine: f64,
    /// mg
    pub riboflavin: f64,
    /// mg
    pub vitamin_c: f64,
    /// mg
    pub calcium: f64,
    /// mg
    pub iron: f64,
}

/// One day's meal as shown on the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
    pub date: NaiveDate,
    /// Meal name reported by the provider (`중식`, `석식`, ...).
    pub meal_name: Option<String>,
    pub dishes: Vec<String>,
    pub nutrition: Nutrition,
    /// `false` for placeholder days.
    pub available: bool,
}

impl MealDay {
    /// Placeholder for a date the provider has nothing for.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            meal_name: None,
            dishes: vec![NO_MEAL_PLACEHOLDER.to_string()],
            nutrition: Nutrition::default(),
            available: false,
        }
    }

    pub fn is_lunch(&self) -> bool {
        self.meal_name.as_deref() == Some("중식")
    }
}
