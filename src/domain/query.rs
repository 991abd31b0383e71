use chrono::NaiveDate;

use super::Gazetteer;
use crate::nlp::{detect_day_offset, extract_city, is_rain_query, normalize, CityMatch};

/// Everything the pipeline reads from one incoming message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub raw: String,
    pub normalized: String,
    pub city: Option<CityMatch>,
    pub day_offset: i64,
    pub is_rain_query: bool,
}

impl ParsedQuery {
    pub fn parse(message: &str, gazetteer: &Gazetteer, today: NaiveDate) -> Self {
        Self {
            raw: message.to_string(),
            normalized: normalize(message),
            city: extract_city(message, gazetteer),
            day_offset: detect_day_offset(message, today),
            is_rain_query: is_rain_query(message),
        }
    }
}
