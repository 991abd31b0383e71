pub mod features;
pub mod weather;

use async_trait::async_trait;

use crate::domain::ForecastSnapshot;
use crate::error::ForecastError;

pub use features::{build_features, rain_proxy};
pub use weather::{select_slot_index, OpenWeatherClient};

/// Source of forecast snapshots for a city, `day_offset` days from today.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(
        &self,
        city: &str,
        day_offset: i64,
    ) -> Result<ForecastSnapshot, ForecastError>;
}
