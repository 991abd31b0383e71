//! Rain model inference
//!
//! The rain model is a pre-trained artifact pair:
//! - a standard scaler fitted on the training features
//! - a regressor predicting `log(1 + mm)` from the scaled features
//!
//! Both are loaded once at startup ([`ModelArtifacts`]) and shared read-only.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod inference;
pub mod models;
pub mod schema;

pub use inference::{reconcile, ModelArtifacts, RainPredictor};
pub use models::{DecisionTree, LinearRegressor, Regressor, RegressorArtifact, TreeEnsembleRegressor, TreeNode};
pub use schema::{FeatureName, FEATURE_COUNT, FEATURE_ORDER};

/// Feature vector in [`FEATURE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Fill every column by name; the result is always in schema order.
    pub fn from_fn(mut value_of: impl FnMut(FeatureName) -> f64) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_ORDER) {
            *slot = value_of(name);
        }
        Self { values }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FEATURE_ORDER.into_iter().zip(self.values.iter().copied())
    }

    /// Standardize features using z-score normalization
    pub fn standardize(&self, means: &[f64], stds: &[f64]) -> Result<Self> {
        if means.len() != self.values.len() || stds.len() != self.values.len() {
            anyhow::bail!("Standardization parameter count mismatch");
        }

        let mut standardized = [0.0; FEATURE_COUNT];
        for (i, slot) in standardized.iter_mut().enumerate() {
            *slot = if stds[i].abs() < 1e-10 {
                0.0 // Avoid division by zero
            } else {
                (self.values[i] - means[i]) / stds[i]
            };
        }

        Ok(Self {
            values: standardized,
        })
    }
}

/// Fitted standard scaler as exported from training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column names the scaler was fitted on, when the export recorded them.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Scaler that leaves features unchanged.
    pub fn identity() -> Self {
        Self {
            feature_names: None,
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            anyhow::bail!(
                "Scaler width mismatch: expected {} columns, got mean={} scale={}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            );
        }
        if let Some(names) = &self.feature_names {
            schema::check_column_names(names)?;
        }
        Ok(())
    }

    pub fn transform(&self, features: &FeatureVector) -> Result<FeatureVector> {
        features.standardize(&self.mean, &self.scale)
    }
}
