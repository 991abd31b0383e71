use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Description shown when the provider omits the weather text.
pub const UNKNOWN_DESCRIPTION: &str = "Không rõ";

/// Model estimates at or below this are treated as dry.
pub const DRY_THRESHOLD_MM: f64 = 0.1;

/// One normalized forecast slot for a (city, target date) lookup.
///
/// Numeric fields the provider omitted stay `None`; the feature builder reads
/// them as 0 and the composer renders them as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSnapshot {
    pub city: String,
    pub target_date: NaiveDate,
    /// Timestamp of the provider slot that was selected, when it carried one.
    pub slot: Option<NaiveDateTime>,
    pub description: String,
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
    /// Provider rainfall for the 3-hour slot; 0 when absent.
    pub rain_3h_mm: f64,
}

/// Final rainfall figure after reconciling the model with the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainEstimate {
    pub mm: f64,
    /// Raw model output in millimeters, before any override.
    pub model_mm: f64,
    /// Set when the provider's rain figure replaced a near-zero model output.
    pub overridden: bool,
}

impl RainEstimate {
    pub fn is_dry(&self) -> bool {
        self.mm <= DRY_THRESHOLD_MM
    }
}
