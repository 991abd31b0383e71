//! Column order of the trained rain model.
//!
//! [`FEATURE_ORDER`] is the single source of truth: the feature builder fills
//! vectors in this order and artifact loading rejects a scaler or regressor
//! whose recorded column names differ from it.

use strum::{EnumIter, IntoStaticStr};

pub const FEATURE_COUNT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, strum::Display)]
pub enum FeatureName {
    #[strum(serialize = "province")]
    Province,
    #[strum(serialize = "year")]
    Year,
    #[strum(serialize = "month")]
    Month,
    #[strum(serialize = "day")]
    Day,
    #[strum(serialize = "wind")]
    Wind,
    #[strum(serialize = "humidi")]
    Humidity,
    #[strum(serialize = "cloud")]
    Cloud,
    #[strum(serialize = "rain_1")]
    Rain1,
    #[strum(serialize = "rain_2")]
    Rain2,
    #[strum(serialize = "rain_3")]
    Rain3,
    #[strum(serialize = "rain_7")]
    Rain7,
    #[strum(serialize = "rain_mean_3d")]
    RainMean3d,
    #[strum(serialize = "rain_mean_7d")]
    RainMean7d,
    #[strum(serialize = "rain_mean_10d")]
    RainMean10d,
    #[strum(serialize = "rain_mean_14d")]
    RainMean14d,
    #[strum(serialize = "avg_temp")]
    AvgTemp,
    #[strum(serialize = "temp_range")]
    TempRange,
    #[strum(serialize = "season")]
    Season,
    #[strum(serialize = "wind_d")]
    WindDirection,
    #[strum(serialize = "region")]
    Region,
}

impl FeatureName {
    /// Column name as recorded by the training pipeline.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Position of this feature in [`FEATURE_ORDER`]; the declaration order
    /// is the column order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rain history and rolling-mean columns. At inference time these all
    /// carry the same proxy value.
    pub fn is_rain_history(self) -> bool {
        matches!(
            self,
            FeatureName::Rain1
                | FeatureName::Rain2
                | FeatureName::Rain3
                | FeatureName::Rain7
                | FeatureName::RainMean3d
                | FeatureName::RainMean7d
                | FeatureName::RainMean10d
                | FeatureName::RainMean14d
        )
    }
}

pub const FEATURE_ORDER: [FeatureName; FEATURE_COUNT] = [
    FeatureName::Province,
    FeatureName::Year,
    FeatureName::Month,
    FeatureName::Day,
    FeatureName::Wind,
    FeatureName::Humidity,
    FeatureName::Cloud,
    FeatureName::Rain1,
    FeatureName::Rain2,
    FeatureName::Rain3,
    FeatureName::Rain7,
    FeatureName::RainMean3d,
    FeatureName::RainMean7d,
    FeatureName::RainMean10d,
    FeatureName::RainMean14d,
    FeatureName::AvgTemp,
    FeatureName::TempRange,
    FeatureName::Season,
    FeatureName::WindDirection,
    FeatureName::Region,
];

/// Check recorded column names against [`FEATURE_ORDER`].
pub fn check_column_names(names: &[String]) -> anyhow::Result<()> {
    if names.len() != FEATURE_COUNT {
        anyhow::bail!(
            "Feature count mismatch: model expects {} columns, artifact lists {}",
            FEATURE_COUNT,
            names.len()
        );
    }
    for (i, (expected, actual)) in FEATURE_ORDER.iter().zip(names).enumerate() {
        if expected.as_str() != actual {
            anyhow::bail!(
                "Feature order mismatch at column {}: expected '{}', artifact has '{}'",
                i,
                expected,
                actual
            );
        }
    }
    Ok(())
}
