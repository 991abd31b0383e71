//! End-to-end pipeline tests against a mocked forecast feed.

mod common;

use std::time::Duration;

use common::{config, entry, mount_forecast, mount_provider_error, pipeline, pipeline_with_provider};
use rain_assistant::chat::ReplyKind;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_english_rain_question_for_tomorrow() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        "Hanoi",
        vec![
            entry("2024-06-10 12:00:00", 60.0, 20.0, None),
            entry("2024-06-11 12:00:00", 92.0, 95.0, Some(0.0)),
        ],
    )
    .await;

    // saturated proxy 1.0 → log1p(mm) = ln 7 → 6 mm
    let reply = pipeline(&server, 7.0_f64.ln())
        .reply("will it rain in Hanoi tomorrow")
        .await;

    assert_eq!(reply.kind, ReplyKind::RainEstimated);
    assert!(reply.text.contains("Hanoi"));
    assert!(reply.text.contains("ngày mai"));
    assert!(reply.text.contains("khoảng 6.0 mm"));
    assert!(!reply.text.contains("---"));
}

#[tokio::test]
async fn test_vietnamese_forecast_question() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        "Hue",
        vec![
            entry("2024-06-10 12:00:00", 70.0, 40.0, None),
            entry("2024-06-11 12:00:00", 75.0, 50.0, Some(2.0)),
        ],
    )
    .await;

    let reply = pipeline(&server, 1.0).reply("Thời tiết Huế ngày mai thế nào?").await;

    assert_eq!(reply.kind, ReplyKind::Forecast);
    assert!(reply.text.starts_with("📍 **Thời tiết tại Hue (ngày mai):**"));
    assert!(reply.text.contains("- 🌤️ Trạng thái: Mây đen u ám"));
    assert!(reply.text.contains("- ☔ Lượng mưa API dự báo: 2 mm"));
    assert!(reply.text.ends_with("🌦️ Có thể có mưa nhẹ."));
}

#[tokio::test]
async fn test_dry_prediction_includes_api_forecast() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Hue", vec![entry("2024-06-10 12:00:00", 50.0, 10.0, None)]).await;

    let reply = pipeline(&server, 1.0).reply("Huế hôm nay có mưa không?").await;

    assert_eq!(reply.kind, ReplyKind::RainEstimated);
    assert!(reply.text.starts_with("☀️ Trời khô ráo"));
    assert!(reply.text.contains("0.00 mm"));
    assert!(reply.text.contains("📍 **Thời tiết tại Hue (hôm nay):**"));
}

#[tokio::test]
async fn test_unmapped_city_rain_question_falls_back() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Da Nang", vec![entry("2024-06-10 12:00:00", 80.0, 60.0, Some(12.0))])
        .await;

    let reply = pipeline(&server, 1.0).reply("Đà Nẵng có mưa không").await;

    assert_eq!(reply.kind, ReplyKind::RainUnavailable);
    assert!(reply.text.contains("chưa có dữ liệu để dự đoán mưa cho **Da Nang**"));
    assert!(reply.text.contains("Tuy nhiên, đây là dự báo thời tiết chung từ API"));
    assert!(reply.text.contains("🌧️ Có mưa vừa hoặc lớn"));
}

#[tokio::test]
async fn test_unknown_city_reports_provider_message() {
    let server = MockServer::start().await;
    mount_provider_error(&server, "Atlantis", 404, "city not found").await;

    let reply = pipeline(&server, 1.0).reply("weather in Atlantis").await;

    assert_eq!(reply.kind, ReplyKind::Forecast);
    assert_eq!(
        reply.text,
        "❌ Không thể lấy dữ liệu thời tiết cho **Atlantis**. Lý do: city not found"
    );
}

#[tokio::test]
async fn test_slow_provider_rain_question_explains_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "list": [entry("2024-06-10 12:00:00", 92.0, 95.0, None)] }))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut provider = config(&server.uri()).provider;
    provider.http_timeout_seconds = 1;
    provider.max_retries = 1;

    let reply = pipeline_with_provider(&provider, 1.0).reply("Huế có mưa không?").await;

    assert_eq!(reply.kind, ReplyKind::RainUnavailable);
    assert!(reply
        .text
        .contains("❌ Không thể lấy dữ liệu thời tiết cho **Hue** để làm đầu vào cho mô hình."));
    assert!(reply.text.contains("Tuy nhiên, đây là dự báo thời tiết chung từ API"));
    assert!(reply.text.contains("⚠️ Lỗi khi xử lý dữ liệu thời tiết"));
}

#[tokio::test]
async fn test_message_without_place_asks_for_one() {
    let server = MockServer::start().await;

    let reply = pipeline(&server, 1.0).reply("có mưa không").await;

    assert_eq!(reply.kind, ReplyKind::MissingCity);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[test]
fn test_shipped_artifacts_load() {
    use rain_assistant::ml::ModelArtifacts;
    use std::path::Path;

    let artifacts = ModelArtifacts::load(
        Path::new("models/scaler.json"),
        Path::new("models/rain_model.json"),
    )
    .unwrap();
    assert_eq!(artifacts.regressor_kind(), "tree_ensemble");
}
