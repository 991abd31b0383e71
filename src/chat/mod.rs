pub mod composer;
pub mod pipeline;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::{Clock, Gazetteer, VietnamClock};
use crate::forecast::{ForecastProvider, OpenWeatherClient};
use crate::ml::{ModelArtifacts, RainPredictor};

pub use composer::{compose, day_label, render_forecast, RainTier, ReplyInput};
pub use pipeline::{ChatPipeline, ChatReply, ReplyKind};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub pipeline: Arc<ChatPipeline>,
}

impl AppState {
    /// Load the model artifacts and wire the production forecast client.
    /// Fails when either artifact is missing or invalid.
    pub fn new(cfg: Config) -> Result<Self> {
        let artifacts = ModelArtifacts::load(&cfg.model.scaler_path, &cfg.model.regressor_path)
            .context("Failed to load rain model artifacts")?;

        let clock: Arc<dyn Clock> = Arc::new(VietnamClock);
        let forecasts: Arc<dyn ForecastProvider> =
            Arc::new(OpenWeatherClient::new(&cfg.provider, clock.clone())?);

        let gazetteer = Arc::new(Gazetteer::vietnam());
        info!(
            cities = gazetteer.len(),
            model = artifacts.regressor_kind(),
            "chat pipeline ready"
        );

        let pipeline = ChatPipeline::new(
            gazetteer,
            forecasts,
            RainPredictor::new(Arc::new(artifacts)),
            clock,
        );
        Ok(Self::from_parts(cfg, pipeline))
    }

    pub fn from_parts(cfg: Config, pipeline: ChatPipeline) -> Self {
        Self {
            cfg,
            pipeline: Arc::new(pipeline),
        }
    }
}
