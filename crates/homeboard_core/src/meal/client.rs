use crate::config::MealConfig;
use crate::http::{blocking_client, build_url, get_text, FetchError};
use crate::meal::model::MealDay;
use crate::meal::parse::parse_meal_response;
use crate::meal::MealSource;
use chrono::NaiveDate;
use reqwest::blocking::Client;

pub const NEIS_MEAL_ENDPOINT: &str = "https://open.neis.go.kr/hub/mealServiceDietInfo";
const PAGE_SIZE: &str = "100";

/// School-meal provider client (NEIS open API).
pub struct NeisMealClient {
    client: Client,
    config: MealConfig,
}

impl NeisMealClient {
    pub fn new(config: MealConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: blocking_client()?,
            config,
        })
    }

    fn query(&self, from: NaiveDate, to: NaiveDate) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("Type", "json".to_string()),
            ("pIndex", "1".to_string()),
            ("pSize", PAGE_SIZE.to_string()),
            ("ATPT_OFCDC_SC_CODE", self.config.office_code.clone()),
            ("SD_SCHUL_CODE", self.config.school_code.clone()),
            ("MLSV_FROM_YMD", from.format("%Y%m%d").to_string()),
            ("MLSV_TO_YMD", to.format("%Y%m%d").to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            params.push(("KEY", key.clone()));
        }
        params
    }
}

impl MealSource for NeisMealClient {
    fn fetch_meals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<MealDay>, FetchError> {
        let url = build_url(NEIS_MEAL_ENDPOINT, &self.query(from, to))?;
        let body = get_text(&self.client, url, "meal")?;
        parse_meal_response(&body)
    }
}
