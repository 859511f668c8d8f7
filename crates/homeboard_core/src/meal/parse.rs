//! Decoding of school-meal provider payloads.
//!
//! Payload shape (success):
//! `{"mealServiceDietInfo":[{"head":[...]},{"row":[{"MLSV_YMD":"20261019",...}]}]}`
//!
//! Payload shape (no data or failure):
//! `{"RESULT":{"CODE":"INFO-200","MESSAGE":"해당하는 데이터가 없습니다."}}`

use crate::http::FetchError;
use crate::meal::model::{MealDay, Nutrition};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

const CODE_OK: &str = "INFO-000";
const CODE_NO_DATA: &str = "INFO-200";
const LINE_BREAK: &str = "<br/>";

static FIRST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "RESULT")]
    result: Option<ResultCode>,
    #[serde(rename = "mealServiceDietInfo", default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct ResultCode {
    #[serde(rename = "CODE")]
    code: String,
    #[serde(rename = "MESSAGE", default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    row: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "MLSV_YMD")]
    date: String,
    #[serde(rename = "MMEAL_SC_NM")]
    meal_name: Option<String>,
    #[serde(rename = "DDISH_NM", default)]
    dishes: String,
    #[serde(rename = "NTR_INFO", default)]
    nutrition: String,
    #[serde(rename = "CAL_INFO", default)]
    calories: String,
}

/// Decodes a provider response body into meal days.
///
/// # Errors
/// - Body is not the expected JSON.
/// - A row carries a malformed date.
/// - Result code other than success or "no data".
pub fn parse_meal_response(body: &str) -> Result<Vec<MealDay>, FetchError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;

    if let Some(result) = envelope.result {
        return match result.code.as_str() {
            CODE_NO_DATA | CODE_OK => Ok(Vec::new()),
            _ => Err(FetchError::Api {
                code: result.code,
                message: result.message,
            }),
        };
    }

    envelope
        .sections
        .into_iter()
        .flat_map(|section| section.row)
        .map(|row| {
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y%m%d").map_err(|err| {
                FetchError::Decode(format!("bad MLSV_YMD `{}`: {err}", row.date))
            })?;
            let mut nutrition = parse_nutrition(&row.nutrition);
            nutrition.calories = first_number(&row.calories).unwrap_or(0.0);
            Ok(MealDay {
                date,
                meal_name: row.meal_name.filter(|name| !name.trim().is_empty()),
                dishes: parse_dishes(&row.dishes),
                nutrition,
                available: true,
            })
        })
        .collect()
}

/// Splits a `<br/>`-separated dish list; blank entries are dropped.
pub fn parse_dishes(raw: &str) -> Vec<String> {
    raw.split(LINE_BREAK)
        .map(str::trim)
        .filter(|dish| !dish.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads `label(unit) : value` lines into [`Nutrition`].
///
/// Calories are not part of this field; see `CAL_INFO`.
pub fn parse_nutrition(raw: &str) -> Nutrition {
    let mut nutrition = Nutrition::default();
    for line in raw.split(LINE_BREAK) {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let Some(value) = first_number(value) else {
            continue;
        };
        let label = label.trim();
        let slot = if label.contains("탄수화물") {
            &mut nutrition.carbs
        } else if label.contains("단백질") {
            &mut nutrition.protein
        } else if label.contains("지방") {
            &mut nutrition.fat
        } else if label.contains("비타민A") {
            &mut nutrition.vitamin_a
        } else if label.contains("티아민") {
            &mut nutrition.thiamine
        } else if label.contains("리보플라빈") {
            &mut nutrition.riboflavin
        } else if label.contains("비타민C") {
            &mut nutrition.vitamin_c
        } else if label.contains("칼슘") {
            &mut nutrition.calcium
        } else if label.contains("철분") {
            &mut nutrition.iron
        } else {
            continue;
        };
        *slot = value;
    }
    nutrition
}

fn first_number(raw: &str) -> Option<f64> {
    FIRST_NUMBER_RE
        .find(raw)
        .and_then(|found| found.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTR_INFO: &str = "탄수화물(g) : 101.7<br/>단백질(g) : 32.4<br/>지방(g) : 18.9<br/>\
비타민A(R.E) : 188.5<br/>티아민(mg) : 0.3<br/>리보플라빈(mg) : 0.5<br/>\
비타민C(mg) : 12.1<br/>칼슘(mg) : 250.2<br/>철분(mg) : 3.8";

    #[test]
    fn dishes_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_dishes(" 쌀밥 <br/>미역국 (5.6.)<br/> <br/>김치"),
            vec!["쌀밥", "미역국 (5.6.)", "김치"]
        );
        assert!(parse_dishes("").is_empty());
    }

    #[test]
    fn nutrition_matches_korean_labels() {
        let nutrition = parse_nutrition(NTR_INFO);
        assert_eq!(nutrition.carbs, 101.7);
        assert_eq!(nutrition.protein, 32.4);
        assert_eq!(nutrition.fat, 18.9);
        assert_eq!(nutrition.vitamin_a, 188.5);
        assert_eq!(nutrition.thiamine, 0.3);
        assert_eq!(nutrition.riboflavin, 0.5);
        assert_eq!(nutrition.vitamin_c, 12.1);
        assert_eq!(nutrition.calcium, 250.2);
        assert_eq!(nutrition.iron, 3.8);
        assert_eq!(nutrition.calories, 0.0);
    }

    #[test]
    fn nutrition_skips_unknown_and_malformed_lines() {
        let nutrition = parse_nutrition("나트륨(mg) : 900<br/>단백질(g)<br/>지방(g) : -");
        assert_eq!(nutrition, Nutrition::default());
    }

    #[test]
    fn rows_become_meal_days() {
        let body = r#"{"mealServiceDietInfo":[
            {"head":[{"list_total_count":1},{"RESULT":{"CODE":"INFO-000","MESSAGE":"ok"}}]},
            {"row":[{"MLSV_YMD":"20261019","MMEAL_SC_NM":"중식",
                     "DDISH_NM":"쌀밥<br/>미역국","NTR_INFO":"단백질(g) : 30.5",
                     "CAL_INFO":"812.3 Kcal"}]}
        ]}"#;
        let days = parse_meal_response(body).unwrap();
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(day.is_lunch());
        assert!(day.available);
        assert_eq!(day.dishes, vec!["쌀밥", "미역국"]);
        assert_eq!(day.nutrition.calories, 812.3);
        assert_eq!(day.nutrition.protein, 30.5);
    }

    #[test]
    fn no_data_result_is_empty() {
        let body = r#"{"RESULT":{"CODE":"INFO-200","MESSAGE":"해당하는 데이터가 없습니다."}}"#;
        assert!(parse_meal_response(body).unwrap().is_empty());
    }

    #[test]
    fn other_result_codes_are_errors() {
        let body = r#"{"RESULT":{"CODE":"ERROR-300","MESSAGE":"필수 값이 누락되어 있습니다."}}"#;
        match parse_meal_response(body) {
            Err(FetchError::Api { code, .. }) => assert_eq!(code, "ERROR-300"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        assert!(matches!(
            parse_meal_response("<html>"),
            Err(FetchError::Decode(_))
        ));
        let bad_date = r#"{"mealServiceDietInfo":[{"row":[{"MLSV_YMD":"2026-10-19"}]}]}"#;
        assert!(matches!(
            parse_meal_response(bad_date),
            Err(FetchError::Decode(_))
        ));
    }
}
