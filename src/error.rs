//! Typed failures of the chat pipeline.
//!
//! Forecast and prediction failures are never shown raw to the user: the
//! composer turns each kind into an explanation and, where possible, pairs it
//! with the provider forecast.

use thiserror::Error;

/// Failure to obtain a forecast snapshot from the provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Non-success HTTP status; `message` is the provider's own explanation.
    #[error("forecast provider rejected request for {city} (HTTP {status}): {message}")]
    Provider {
        city: String,
        status: u16,
        message: String,
    },

    #[error("forecast provider returned no entries for {city}")]
    NoData { city: String },

    #[error("forecast request failed: {0}")]
    Transport(String),

    #[error("forecast response could not be decoded: {0}")]
    Decode(String),
}

/// Failure to produce a model rain estimate. Callers fall back to the raw
/// provider forecast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("no province code known for {0}")]
    UnmappedCity(String),

    #[error("forecast input unavailable: {0}")]
    Forecast(#[from] ForecastError),

    #[error("rain model failed: {0}")]
    Model(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GazetteerError {
    #[error("province code {code} assigned to both {first} and {second}")]
    DuplicateCode {
        code: u32,
        first: String,
        second: String,
    },

    #[error("city name {0} is not unique after normalization")]
    DuplicateName(String),
}
