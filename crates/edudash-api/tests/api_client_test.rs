#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use chrono::NaiveDate;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edudash_api::{
    AnalyticsQuery, ApiClient, AssetSlot, Error, GroupBy, RecordKind, TransportConfig, UploadPart,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn april() -> AnalyticsQuery {
    AnalyticsQuery::new(
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
    )
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "s3cret".to_string().into();
    client.login("admin@example.com", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_is_decided_by_status() {
    let (server, client) = setup().await;

    // Body claims success but status says otherwise.
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin@example.com", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid credentials"), "got: {message}");
            assert!(message.contains("401"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_session_cookie_is_kept_in_jar() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "session=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics/overview"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "totalUsers": 12 }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    client.login("admin@example.com", &secret).await.unwrap();
    assert_eq!(client.cookie_header().as_deref(), Some("session=abc123"));

    let overview = client.get_overview(&april()).await.unwrap();
    assert_eq!(overview.total_users, json!(12));
}

// ── Analytics tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_visit_stats_sends_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics/visits"))
        .and(query_param("startDate", "2024-04-01"))
        .and(query_param("endDate", "2024-04-30"))
        .and(query_param("groupBy", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "totalVisits": "1200",
                "series": [
                    { "period": "2024-W14", "count": 300 },
                    { "period": "2024-W15", "count": "410" }
                ],
                "topPages": [{ "path": "/courses", "visits": 90 }]
            }
        })))
        .mount(&server)
        .await;

    let visits = client
        .get_visit_stats(&april().group_by(GroupBy::Week))
        .await
        .unwrap();

    assert_eq!(visits.total_visits, json!("1200"));
    assert_eq!(visits.series.len(), 2);
    assert_eq!(visits.series[1].count, json!("410"));
    assert_eq!(visits.top_pages[0].path.as_deref(), Some("/courses"));
    assert!(visits.by_device.is_empty());
}

#[tokio::test]
async fn test_null_data_yields_empty_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let favorites = client.get_favorite_stats(&april().limit(6)).await.unwrap();
    assert!(favorites.top_courses.is_empty());
    assert!(favorites.total_favorites.is_null());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_payment_stats(&april()).await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics/users"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "aggregation failed" })),
        )
        .mount(&server)
        .await;

    let err = client.get_user_stats(&april()).await.unwrap_err();
    assert!(err.is_transient());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "aggregation failed");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/statistics/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.get_content_stats(&april()).await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("proxy error"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Record tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_record_and_upload_asset() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/courses/42"))
        .and(body_json(json!({ "title": "Intro to Rust" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 42, "title": "Intro to Rust" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/admin/courses/42/image"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "url": "/uploads/courses/42.png" }
        })))
        .mount(&server)
        .await;

    let echoed = client
        .update_record(RecordKind::Course, "42", &json!({ "title": "Intro to Rust" }))
        .await
        .unwrap();
    assert_eq!(echoed["id"], json!(42));

    let uploaded = client
        .upload_asset(
            RecordKind::Course,
            "42",
            AssetSlot::Image,
            UploadPart {
                file_name: "cover.png".into(),
                mime: "image/png".into(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        )
        .await
        .unwrap();
    assert_eq!(uploaded["url"], json!("/uploads/courses/42.png"));
}

#[tokio::test]
async fn test_upload_rejected_by_backend() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/programs/9/video"))
        .respond_with(
            ResponseTemplate::new(413).set_body_json(json!({ "message": "file too large" })),
        )
        .mount(&server)
        .await;

    let result = client
        .upload_asset(
            RecordKind::Program,
            "9",
            AssetSlot::Video,
            UploadPart {
                file_name: "intro.mp4".into(),
                mime: "video/mp4".into(),
                bytes: vec![0; 16],
            },
        )
        .await;

    assert!(
        matches!(result, Err(Error::Api { status: 413, .. })),
        "expected 413, got: {result:?}"
    );
}
