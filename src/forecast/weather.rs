//! Weather forecast integration (OpenWeather 5 day / 3 hour feed)
//!
//! Fetches the 3-hourly forecast list for a city and reduces it to the single
//! slot the chat pipeline reasons about.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use super::ForecastProvider;
use crate::config::ProviderConfig;
use crate::domain::{Clock, ForecastSnapshot, UNKNOWN_DESCRIPTION};
use crate::error::ForecastError;
use crate::nlp::normalize::capitalize;

/// The feed has one entry every 3 hours.
pub const SLOTS_PER_DAY: usize = 8;

const UNKNOWN_PROVIDER_ERROR: &str = "Lỗi không xác định từ API.";
const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OpenWeather-compatible forecast client with timeout and transient retry.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
    clock: Arc<dyn Clock>,
}

impl OpenWeatherClient {
    pub fn new(cfg: &ProviderConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("rain-assistant/0.1"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;

        let backoff = Duration::from_millis(cfg.retry_backoff_ms);
        let policy = ExponentialBackoff::builder()
            .retry_bounds(backoff, backoff * 4)
            .build_with_max_retries(cfg.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(policy))
            .build();

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            units: cfg.units.clone(),
            lang: cfg.lang.clone(),
            clock,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    async fn fetch_forecast(
        &self,
        city: &str,
        day_offset: i64,
    ) -> Result<ForecastSnapshot, ForecastError> {
        debug!(city, day_offset, "fetching forecast");

        let response = self
            .client
            .get(self.forecast_url())
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ForecastError::Transport(describe_middleware_error(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<RawErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| UNKNOWN_PROVIDER_ERROR.to_string());
            warn!(city, status = status.as_u16(), %message, "forecast provider returned error");
            return Err(ForecastError::Provider {
                city: city.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawForecastResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::Decode(e.to_string()))?;

        let today = self.clock.today();
        let target_date = ChronoDuration::try_days(day_offset)
            .and_then(|d| today.checked_add_signed(d))
            .unwrap_or(today);

        let slots: Vec<Option<NaiveDateTime>> = raw.list.iter().map(RawEntry::timestamp).collect();
        let index = select_slot_index(&slots, target_date, day_offset).ok_or_else(|| {
            ForecastError::NoData {
                city: city.to_string(),
            }
        })?;

        info!(city, %target_date, entries = raw.list.len(), index, "forecast slot selected");
        Ok(raw.list[index].to_snapshot(city, target_date))
    }
}

/// Pick the forecast entry for `target`: the entry stamped at 12:00 on that
/// date, otherwise entry `day_offset * 8` clamped to the list. Negative
/// offsets clamp to the first entry. `None` only for an empty list.
pub fn select_slot_index(
    slots: &[Option<NaiveDateTime>],
    target: NaiveDate,
    day_offset: i64,
) -> Option<usize> {
    let last = slots.len().checked_sub(1)?;
    let noon = NaiveTime::from_hms_opt(12, 0, 0)?;

    let exact = slots
        .iter()
        .position(|s| matches!(s, Some(ts) if ts.date() == target && ts.time() == noon));

    Some(exact.unwrap_or_else(|| {
        let offset = usize::try_from(day_offset.max(0)).unwrap_or(usize::MAX);
        offset.saturating_mul(SLOTS_PER_DAY).min(last)
    }))
}

fn describe_middleware_error(err: reqwest_middleware::Error) -> String {
    match err {
        // Drop the URL: it carries the API key.
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        reqwest_middleware::Error::Middleware(e) => e.to_string(),
    }
}

// OpenWeather response structures. Every sub-object is optional so a
// partial entry still yields a snapshot.
#[derive(Debug, Deserialize)]
struct RawErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawForecastResponse {
    #[serde(default)]
    list: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    dt_txt: Option<String>,
    weather: Vec<RawWeather>,
    main: RawMain,
    wind: RawWind,
    clouds: RawClouds,
    rain: RawRain,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWind {
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawClouds {
    all: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRain {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

impl RawEntry {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.dt_txt
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, SLOT_FORMAT).ok())
    }

    fn to_snapshot(&self, city: &str, target_date: NaiveDate) -> ForecastSnapshot {
        let description = self
            .weather
            .first()
            .and_then(|w| w.description.as_deref())
            .filter(|d| !d.trim().is_empty())
            .map(capitalize)
            .unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string());

        ForecastSnapshot {
            city: city.to_string(),
            target_date,
            slot: self.timestamp(),
            description,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_percent: self.main.humidity,
            wind_speed_ms: self.wind.speed,
            cloud_cover_percent: self.clouds.all,
            rain_3h_mm: self.rain.three_hours.unwrap_or(0.0),
        }
    }
}
