//! Message → reply pipeline.
//!
//! Extract city and day, then either estimate rain (forecast → features →
//! model) or fetch the plain forecast, and compose the reply. Every failure
//! below this point becomes part of the reply text.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::composer::{compose, ReplyInput};
use crate::domain::{Clock, Gazetteer, ParsedQuery};
use crate::error::PredictionError;
use crate::forecast::{build_features, rain_proxy, ForecastProvider};
use crate::ml::RainPredictor;

/// Which branch of the pipeline produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    MissingCity,
    Forecast,
    RainUnavailable,
    RainEstimated,
}

impl From<&ReplyInput> for ReplyKind {
    fn from(input: &ReplyInput) -> Self {
        match input {
            ReplyInput::MissingCity => ReplyKind::MissingCity,
            ReplyInput::Forecast { .. } => ReplyKind::Forecast,
            ReplyInput::RainUnavailable { .. } => ReplyKind::RainUnavailable,
            ReplyInput::RainEstimated { .. } => ReplyKind::RainEstimated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub kind: ReplyKind,
}

/// Stateless per message; everything it holds is shared read-only.
#[derive(Clone)]
pub struct ChatPipeline {
    gazetteer: Arc<Gazetteer>,
    forecasts: Arc<dyn ForecastProvider>,
    predictor: RainPredictor,
    clock: Arc<dyn Clock>,
}

impl ChatPipeline {
    pub fn new(
        gazetteer: Arc<Gazetteer>,
        forecasts: Arc<dyn ForecastProvider>,
        predictor: RainPredictor,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gazetteer,
            forecasts,
            predictor,
            clock,
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn predictor(&self) -> &RainPredictor {
        &self.predictor
    }

    pub fn parse(&self, message: &str) -> ParsedQuery {
        ParsedQuery::parse(message, &self.gazetteer, self.clock.today())
    }

    pub async fn reply(&self, message: &str) -> ChatReply {
        let input = self.resolve(message).await;
        ChatReply {
            kind: ReplyKind::from(&input),
            text: compose(&input),
        }
    }

    /// Run extraction, forecast and prediction, stopping short of formatting.
    pub async fn resolve(&self, message: &str) -> ReplyInput {
        let query = self.parse(message);
        let Some(city) = query.city else {
            debug!("no city in message");
            return ReplyInput::MissingCity;
        };

        info!(
            city = %city.name,
            low_confidence = city.is_low_confidence(),
            day_offset = query.day_offset,
            rain_query = query.is_rain_query,
            "message parsed"
        );

        if query.is_rain_query {
            self.rain_reply(city.name, query.day_offset).await
        } else {
            let forecast = self.forecasts.fetch_forecast(&city.name, query.day_offset).await;
            ReplyInput::Forecast {
                city: city.name,
                day_offset: query.day_offset,
                forecast,
            }
        }
    }

    async fn rain_reply(&self, city: String, day_offset: i64) -> ReplyInput {
        let Some(province_code) = self.gazetteer.province_code(&city) else {
            warn!(%city, "no province code, falling back to provider forecast");
            let forecast = self.forecasts.fetch_forecast(&city, day_offset).await;
            return ReplyInput::RainUnavailable {
                error: PredictionError::UnmappedCity(city.clone()),
                city,
                day_offset,
                forecast,
            };
        };

        let snapshot = match self.forecasts.fetch_forecast(&city, day_offset).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%city, error = %e, "forecast unavailable for rain model");
                return ReplyInput::RainUnavailable {
                    city,
                    day_offset,
                    error: e.clone().into(),
                    forecast: Err(e),
                };
            }
        };

        let features = build_features(province_code, &snapshot);
        debug!(%city, province_code, proxy = rain_proxy(&snapshot), "features built");

        match self.predictor.predict(&features, snapshot.rain_3h_mm) {
            Ok(estimate) => ReplyInput::RainEstimated {
                city,
                day_offset,
                estimate,
                forecast: snapshot,
            },
            Err(e) => {
                warn!(%city, error = %e, "rain prediction failed");
                ReplyInput::RainUnavailable {
                    city,
                    day_offset,
                    error: e,
                    forecast: Ok(snapshot),
                }
            }
        }
    }
}
