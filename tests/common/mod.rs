//! Shared fixtures for the integration tests: a mocked forecast feed and a
//! small linear model built in memory.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rain_assistant::chat::{AppState, ChatPipeline};
use rain_assistant::config::{Config, ModelConfig, ProviderConfig, ServerConfig};
use rain_assistant::domain::{FixedClock, Gazetteer};
use rain_assistant::forecast::OpenWeatherClient;
use rain_assistant::ml::{FeatureName, ModelArtifacts, RainPredictor, FEATURE_COUNT, FEATURE_ORDER};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

pub fn config(base_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 5,
            enable_cors: false,
            cors_origin: "http://localhost:3000".to_string(),
        },
        provider: ProviderConfig {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            units: "metric".to_string(),
            lang: "vi".to_string(),
            http_timeout_seconds: 5,
            max_retries: 0,
            retry_backoff_ms: 10,
        },
        model: ModelConfig {
            scaler_path: "models/scaler.json".into(),
            regressor_path: "models/rain_model.json".into(),
        },
    }
}

/// Identity scaler and a linear model with `log(1 + mm) = weight * rain_1`.
pub fn artifacts(rain_weight: f64) -> ModelArtifacts {
    let names: Vec<&str> = FEATURE_ORDER.iter().map(|f| f.as_str()).collect();
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[FeatureName::Rain1.index()] = rain_weight;

    let scaler = json!({
        "feature_names": names,
        "mean": vec![0.0; FEATURE_COUNT],
        "scale": vec![1.0; FEATURE_COUNT],
    });
    let model = json!({
        "kind": "linear",
        "feature_names": names,
        "coefficients": coefficients,
        "intercept": 0.0,
    });
    ModelArtifacts::from_json(&scaler.to_string(), &model.to_string()).unwrap()
}

pub fn pipeline(server: &MockServer, rain_weight: f64) -> ChatPipeline {
    pipeline_with_provider(&config(&server.uri()).provider, rain_weight)
}

pub fn pipeline_with_provider(provider: &ProviderConfig, rain_weight: f64) -> ChatPipeline {
    let clock = Arc::new(FixedClock(today()));
    let client = OpenWeatherClient::new(provider, clock.clone()).unwrap();
    ChatPipeline::new(
        Arc::new(Gazetteer::vietnam()),
        Arc::new(client),
        RainPredictor::new(Arc::new(artifacts(rain_weight))),
        clock,
    )
}

pub fn app_state(server: &MockServer, rain_weight: f64) -> AppState {
    AppState::from_parts(config(&server.uri()), pipeline(server, rain_weight))
}

pub fn entry(dt_txt: &str, humidity: f64, clouds: f64, rain: Option<f64>) -> serde_json::Value {
    let mut e = json!({
        "dt_txt": dt_txt,
        "weather": [{ "description": "mây đen u ám" }],
        "main": { "temp": 27.0, "feels_like": 30.5, "humidity": humidity },
        "wind": { "speed": 3.0 },
        "clouds": { "all": clouds },
    });
    if let Some(mm) = rain {
        e["rain"] = json!({ "3h": mm });
    }
    e
}

/// Serve `entries` as the forecast for `city`.
pub async fn mount_forecast(server: &MockServer, city: &str, entries: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": entries })))
        .mount(server)
        .await;
}

pub async fn mount_provider_error(server: &MockServer, city: &str, status: u16, message: &str) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", city))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({ "cod": status.to_string(), "message": message })),
        )
        .mount(server)
        .await;
}
