//! Reply composition.
//!
//! Pure formatting: every decision about which source to show is taken from
//! the [`ReplyInput`] variant and the estimate's magnitude.

use crate::domain::{ForecastSnapshot, RainEstimate};
use crate::error::{ForecastError, PredictionError};

pub const HEAVY_RAIN_MM: f64 = 20.0;
pub const SHOWERS_MM: f64 = 5.0;
/// Provider rain at or above this is reported as moderate or heavy.
const API_HEAVY_RAIN_MM: f64 = 10.0;

const SEPARATOR: &str = "\n\n---\n\n";

/// Outcome of the pipeline, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyInput {
    /// No place name could be resolved from the message.
    MissingCity,
    /// Non-rain question: the provider forecast only.
    Forecast {
        city: String,
        day_offset: i64,
        forecast: Result<ForecastSnapshot, ForecastError>,
    },
    /// Rain question the model could not answer; the provider forecast is
    /// appended as fallback.
    RainUnavailable {
        city: String,
        day_offset: i64,
        error: PredictionError,
        forecast: Result<ForecastSnapshot, ForecastError>,
    },
    /// Rain question with a model estimate. `forecast` is the snapshot the
    /// estimate was built from.
    RainEstimated {
        city: String,
        day_offset: i64,
        estimate: RainEstimate,
        forecast: ForecastSnapshot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainTier {
    Heavy,
    Showers,
    Light,
    Dry,
}

impl RainTier {
    pub fn of(mm: f64) -> Self {
        if mm >= HEAVY_RAIN_MM {
            RainTier::Heavy
        } else if mm >= SHOWERS_MM {
            RainTier::Showers
        } else if mm > crate::domain::DRY_THRESHOLD_MM {
            RainTier::Light
        } else {
            RainTier::Dry
        }
    }
}

/// "hôm nay", "ngày mai", "3 ngày tới"; past dates read "2 ngày trước".
pub fn day_label(day_offset: i64) -> String {
    match day_offset {
        0 => "hôm nay".to_string(),
        1 => "ngày mai".to_string(),
        n if n < 0 => format!("{} ngày trước", n.unsigned_abs()),
        n => format!("{n} ngày tới"),
    }
}

pub fn compose(input: &ReplyInput) -> String {
    match input {
        ReplyInput::MissingCity => {
            "📍 Vui lòng nhập tên địa điểm (ví dụ: Huế, Đà Nẵng, Hà Nội) để tôi tra cứu nhé!"
                .to_string()
        }
        ReplyInput::Forecast {
            city,
            day_offset,
            forecast,
        } => render_forecast(city, *day_offset, forecast),
        ReplyInput::RainUnavailable {
            city,
            day_offset,
            error,
            forecast,
        } => format!(
            "{}{SEPARATOR}Tuy nhiên, đây là dự báo thời tiết chung từ API:\n\n{}",
            explain_prediction_error(city, error),
            render_forecast(city, *day_offset, forecast)
        ),
        ReplyInput::RainEstimated {
            city,
            day_offset,
            estimate,
            forecast,
        } => {
            let message = rain_message(city, *day_offset, estimate.mm);
            if estimate.is_dry() {
                format!(
                    "{message}{SEPARATOR}**Để có thêm thông tin, đây là dự báo chi tiết từ API:**\n\n{}",
                    render_forecast(city, *day_offset, &Ok(forecast.clone()))
                )
            } else {
                message
            }
        }
    }
}

fn rain_message(city: &str, day_offset: i64, mm: f64) -> String {
    let label = day_label(day_offset);
    match RainTier::of(mm) {
        RainTier::Heavy => format!(
            "🌧️ Mưa rất lớn có thể xảy ra ở {city} {label}: khoảng {mm:.1} mm. Bạn nên chuẩn bị kỹ càng!"
        ),
        RainTier::Showers => {
            format!("🌦️ Có khả năng mưa rào ở {city} {label}: khoảng {mm:.1} mm.")
        }
        RainTier::Light => format!(
            "🌤️ Có thể có mưa nhẹ không đáng kể ở {city} {label}: khoảng {mm:.1} mm."
        ),
        RainTier::Dry => format!(
            "☀️ Trời khô ráo, mô hình dự đoán lượng mưa tại {city} {label} là {mm:.2} mm."
        ),
    }
}

fn explain_prediction_error(city: &str, error: &PredictionError) -> String {
    match error {
        PredictionError::UnmappedCity(_) => format!(
            "⚠️ Rất tiếc, tôi chưa có dữ liệu để dự đoán mưa cho **{city}** bằng mô hình ML."
        ),
        PredictionError::Forecast(ForecastError::NoData { .. }) => {
            format!("❌ Không có dữ liệu dự báo cho **{city}** để làm đầu vào cho mô hình.")
        }
        PredictionError::Forecast(_) => format!(
            "❌ Không thể lấy dữ liệu thời tiết cho **{city}** để làm đầu vào cho mô hình."
        ),
        PredictionError::Model(reason) => format!("⚠️ Lỗi khi dự đoán bằng mô hình: {reason}"),
    }
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// Provider forecast as shown to the user, or the reason it is missing.
pub fn render_forecast(
    city: &str,
    day_offset: i64,
    forecast: &Result<ForecastSnapshot, ForecastError>,
) -> String {
    let snapshot = match forecast {
        Ok(snapshot) => snapshot,
        Err(ForecastError::Provider { message, .. }) => {
            return format!(
                "❌ Không thể lấy dữ liệu thời tiết cho **{city}**. Lý do: {message}"
            )
        }
        Err(ForecastError::NoData { .. }) => {
            return format!("❌ Không có dữ liệu dự báo cho **{city}**.")
        }
        Err(e) => return format!("⚠️ Lỗi khi xử lý dữ liệu thời tiết: {e}"),
    };

    let rain = snapshot.rain_3h_mm;
    let verdict = if rain == 0.0 {
        "☀️ Không có dấu hiệu mưa."
    } else if rain < API_HEAVY_RAIN_MM {
        "🌦️ Có thể có mưa nhẹ."
    } else {
        "🌧️ Có mưa vừa hoặc lớn, hãy chuẩn bị áo mưa."
    };

    format!(
        "📍 **Thời tiết tại {city} ({label}):**\n\
         - 🌤️ Trạng thái: {description}\n\
         - 🌡️ Nhiệt độ: {temp}°C (cảm giác: {feels}°C)\n\
         - 💧 Độ ẩm: {humidity}%\n\
         - 🌬️ Gió: {wind} m/s\n\
         - ☔ Lượng mưa API dự báo: {rain} mm\n\
         \n{verdict}",
        label = day_label(day_offset),
        description = snapshot.description,
        temp = or_na(snapshot.temperature_c),
        feels = or_na(snapshot.feels_like_c),
        humidity = or_na(snapshot.humidity_percent),
        wind = or_na(snapshot.wind_speed_ms),
    )
}
