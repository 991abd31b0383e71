//! Rain model inference
//!
//! Loads the scaler/regressor pair and turns feature vectors into a
//! millimeter estimate reconciled against the provider's own rain figure.

use super::{models::Regressor, FeatureVector, RegressorArtifact, StandardScaler};
use crate::domain::{RainEstimate, DRY_THRESHOLD_MM};
use crate::error::PredictionError;
use anyhow::{Context, Result};
use std::{fs, path::Path, sync::Arc};
use tracing::{debug, info};

/// Scaler and regressor, loaded once and shared read-only.
pub struct ModelArtifacts {
    scaler: StandardScaler,
    regressor: Box<dyn Regressor>,
}

impl ModelArtifacts {
    pub fn new(scaler: StandardScaler, regressor: Box<dyn Regressor>) -> Result<Self> {
        scaler.validate().context("invalid scaler")?;
        Ok(Self { scaler, regressor })
    }

    /// Load both artifacts from JSON files. Any missing or malformed file is
    /// an error: no prediction is possible without both.
    pub fn load(scaler_path: &Path, regressor_path: &Path) -> Result<Self> {
        let scaler_json = fs::read_to_string(scaler_path)
            .with_context(|| format!("Failed to read scaler artifact {}", scaler_path.display()))?;
        let regressor_json = fs::read_to_string(regressor_path).with_context(|| {
            format!("Failed to read regressor artifact {}", regressor_path.display())
        })?;

        let artifacts = Self::from_json(&scaler_json, &regressor_json)?;
        info!(
            scaler = %scaler_path.display(),
            regressor = %regressor_path.display(),
            kind = artifacts.regressor_kind(),
            "rain model loaded"
        );
        Ok(artifacts)
    }

    pub fn from_json(scaler_json: &str, regressor_json: &str) -> Result<Self> {
        let scaler: StandardScaler =
            serde_json::from_str(scaler_json).context("Failed to parse scaler artifact")?;
        let artifact: RegressorArtifact =
            serde_json::from_str(regressor_json).context("Failed to parse regressor artifact")?;
        let regressor = artifact.into_regressor().context("invalid regressor")?;
        Self::new(scaler, regressor)
    }

    pub fn regressor_kind(&self) -> &'static str {
        self.regressor.kind()
    }
}

/// Apply the under-prediction guard: a near-zero model estimate is replaced
/// by the provider's rain figure when the provider reports any rain.
pub fn reconcile(model_mm: f64, api_rain_mm: f64) -> RainEstimate {
    if model_mm <= DRY_THRESHOLD_MM && api_rain_mm > 0.0 {
        RainEstimate {
            mm: api_rain_mm,
            model_mm,
            overridden: true,
        }
    } else {
        RainEstimate {
            mm: model_mm,
            model_mm,
            overridden: false,
        }
    }
}

#[derive(Clone)]
pub struct RainPredictor {
    artifacts: Arc<ModelArtifacts>,
}

impl RainPredictor {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Scale, regress, map `log(1 + mm)` back to millimeters (floored at 0)
    /// and reconcile with `api_rain_mm`.
    pub fn predict(
        &self,
        features: &FeatureVector,
        api_rain_mm: f64,
    ) -> Result<RainEstimate, PredictionError> {
        let scaled = self
            .artifacts
            .scaler
            .transform(features)
            .map_err(|e| PredictionError::Model(e.to_string()))?;
        let log_mm = self
            .artifacts
            .regressor
            .predict(&scaled)
            .map_err(|e| PredictionError::Model(e.to_string()))?;
        if !log_mm.is_finite() {
            return Err(PredictionError::Model(format!(
                "non-finite model output {log_mm}"
            )));
        }

        let model_mm = log_mm.exp_m1().max(0.0);
        let estimate = reconcile(model_mm, api_rain_mm);
        debug!(
            log_mm,
            model_mm,
            api_rain_mm,
            final_mm = estimate.mm,
            overridden = estimate.overridden,
            "rain estimate"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{FeatureName, LinearRegressor, FEATURE_COUNT};
    use std::io::Write;

    fn predictor(rain_weight: f64, intercept: f64) -> RainPredictor {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[FeatureName::Rain1.index()] = rain_weight;
        let artifacts = ModelArtifacts::new(
            StandardScaler::identity(),
            Box::new(LinearRegressor::new(coefficients, intercept)),
        )
        .unwrap();
        RainPredictor::new(Arc::new(artifacts))
    }

    fn with_rain_1(value: f64) -> FeatureVector {
        FeatureVector::from_fn(|n| if n.is_rain_history() { value } else { 0.0 })
    }

    #[test]
    fn test_reconcile_overrides_near_zero_model() {
        let est = reconcile(0.05, 3.0);
        assert_eq!(est.mm, 3.0);
        assert!(est.overridden);
        assert_eq!(est.model_mm, 0.05);
    }

    #[test]
    fn test_reconcile_keeps_model_when_api_dry() {
        let est = reconcile(0.05, 0.0);
        assert_eq!(est.mm, 0.05);
        assert!(!est.overridden);
        assert!(est.is_dry());
    }

    #[test]
    fn test_reconcile_keeps_confident_model() {
        let est = reconcile(4.0, 12.0);
        assert_eq!(est.mm, 4.0);
        assert!(!est.overridden);
    }

    #[test]
    fn test_predict_inverts_log1p() {
        // log(1 + 6) per unit of proxy rain
        let p = predictor(7.0_f64.ln(), 0.0);
        let est = p.predict(&with_rain_1(1.0), 0.0).unwrap();
        assert!((est.mm - 6.0).abs() < 1e-9);
        assert!(!est.is_dry());
    }

    #[test]
    fn test_predict_floors_negative_output() {
        let p = predictor(0.0, -3.0);
        let est = p.predict(&with_rain_1(0.0), 0.0).unwrap();
        assert_eq!(est.mm, 0.0);
    }

    #[test]
    fn test_predict_applies_override() {
        let p = predictor(0.0, -3.0);
        let est = p.predict(&with_rain_1(2.5), 2.5).unwrap();
        assert_eq!(est.mm, 2.5);
        assert!(est.overridden);
    }

    #[test]
    fn test_non_finite_output_is_prediction_error() {
        let p = predictor(0.0, f64::INFINITY);
        let err = p.predict(&with_rain_1(0.0), 0.0).unwrap_err();
        assert!(matches!(err, PredictionError::Model(_)));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModelArtifacts::load(&dir.path().join("scaler.json"), &dir.path().join("model.json"));
        let err = result.err().unwrap();
        assert!(err.to_string().contains("scaler.json"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.json");
        let model_path = dir.path().join("rain_model.json");

        let names: Vec<&str> = crate::ml::FEATURE_ORDER.iter().map(|f| f.as_str()).collect();
        let scaler = serde_json::json!({
            "feature_names": names,
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        let model = serde_json::json!({
            "kind": "linear",
            "feature_names": names,
            "coefficients": vec![0.0; FEATURE_COUNT],
            "intercept": 0.0,
        });
        write!(fs::File::create(&scaler_path).unwrap(), "{scaler}").unwrap();
        write!(fs::File::create(&model_path).unwrap(), "{model}").unwrap();

        let artifacts = ModelArtifacts::load(&scaler_path, &model_path).unwrap();
        assert_eq!(artifacts.regressor_kind(), "linear");
    }
}
