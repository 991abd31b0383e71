//! Message understanding: normalization, intent and city extraction.

pub mod entity;
pub mod intent;
pub mod normalize;

pub use entity::{extract_city, CityMatch, CitySource};
pub use intent::{detect_day_offset, is_rain_query};
pub use normalize::normalize;
