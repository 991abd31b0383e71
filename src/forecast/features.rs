//! Feature engineering for the rain model
//!
//! Maps a forecast snapshot onto the model's columns. No rainfall history is
//! available at inference time, so every history and rolling-mean column
//! receives the same proxy value derived from the snapshot.

use chrono::Datelike;

use crate::domain::ForecastSnapshot;
use crate::ml::{FeatureName, FeatureVector};

/// Proxy for a reported zero: saturated air under full overcast.
pub const SATURATED_PROXY_MM: f64 = 1.0;
/// Proxy for a reported zero: humid or mostly cloudy.
pub const DAMP_PROXY_MM: f64 = 0.2;

/// Rainfall proxy for the snapshot.
///
/// A non-zero provider rain figure is used as is. A zero is replaced by
/// [`SATURATED_PROXY_MM`] when humidity and cloud cover both exceed 90%, by
/// [`DAMP_PROXY_MM`] when humidity exceeds 80% or cloud cover exceeds 75%,
/// and stays 0 otherwise.
pub fn rain_proxy(snapshot: &ForecastSnapshot) -> f64 {
    let api_rain = snapshot.rain_3h_mm;
    if api_rain != 0.0 {
        return api_rain;
    }

    let humidity = snapshot.humidity_percent.unwrap_or(0.0);
    let cloud = snapshot.cloud_cover_percent.unwrap_or(0.0);
    if humidity > 90.0 && cloud > 90.0 {
        SATURATED_PROXY_MM
    } else if humidity > 80.0 || cloud > 75.0 {
        DAMP_PROXY_MM
    } else {
        0.0
    }
}

/// Build the model input for `province_code` from a snapshot. Calendar
/// columns come from the snapshot's target date; missing weather fields are 0.
/// Temperature range, season, wind direction and region are not derived and
/// stay 0.
pub fn build_features(province_code: u32, snapshot: &ForecastSnapshot) -> FeatureVector {
    let proxy = rain_proxy(snapshot);
    let date = snapshot.target_date;

    FeatureVector::from_fn(|name| match name {
        FeatureName::Province => f64::from(province_code),
        FeatureName::Year => f64::from(date.year()),
        FeatureName::Month => f64::from(date.month()),
        FeatureName::Day => f64::from(date.day()),
        FeatureName::Wind => snapshot.wind_speed_ms.unwrap_or(0.0),
        FeatureName::Humidity => snapshot.humidity_percent.unwrap_or(0.0),
        FeatureName::Cloud => snapshot.cloud_cover_percent.unwrap_or(0.0),
        FeatureName::AvgTemp => snapshot.temperature_c.unwrap_or(0.0),
        FeatureName::Rain1
        | FeatureName::Rain2
        | FeatureName::Rain3
        | FeatureName::Rain7
        | FeatureName::RainMean3d
        | FeatureName::RainMean7d
        | FeatureName::RainMean10d
        | FeatureName::RainMean14d => proxy,
        FeatureName::TempRange
        | FeatureName::Season
        | FeatureName::WindDirection
        | FeatureName::Region => 0.0,
    })
}
