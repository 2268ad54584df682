//! Session handling and request plumbing against a mock API

mod common;

use common::{client_for, envelope, http_monitor, team, NoCookie, RecordingNavigator};
use knocker_api_client::models::MonitorConfig;
use knocker_api_client::ApiError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_refresh(server: &MockServer, status: u16, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("set-cookie", "session=fresh; Path=/")
                .set_delay(Duration::from_millis(200)),
        )
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/teams"))
        .and(header("cookie", "session=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([team("1", "Ops")]))))
        .with_priority(1)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teams"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, 1).await;

    let client = client_for(&server);
    let (first, second, third) = (client.teams(), client.teams(), client.teams());
    let (a, b, c) = tokio::join!(first.list(), second.list(), third.list());

    for teams in [a, b, c] {
        let teams = teams.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Ops");
    }
    assert!(!client.is_redirecting());
}

#[tokio::test]
async fn test_failed_refresh_redirects_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, 401, 2).await;

    let navigator = RecordingNavigator::at("/7/monitors?tab=all");
    let client = client_for(&server).with_navigator(navigator.clone());

    for _ in 0..2 {
        let err = client.users().me().await.unwrap_err();
        assert!(err.is_auth_expired());
        assert_eq!(err.to_string(), "AUTH_EXPIRED");
    }

    assert!(client.is_redirecting());
    assert_eq!(
        navigator.visits(),
        vec!["/auth/login?next=%2F7%2Fmonitors%3Ftab%3Dall".to_string()]
    );
}

#[tokio::test]
async fn test_retry_is_issued_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/regions"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, 1).await;

    let client = client_for(&server);
    let err = client.regions().list().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthExpired));
}

#[tokio::test]
async fn test_error_message_composition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/teams"))
        .and(body_json(json!({"name": "Ops"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "name taken"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.teams().create("Ops").await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Failed to create team: name taken");

    let err = client.teams().delete("1").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to delete team");
}

#[tokio::test]
async fn test_public_requests_send_no_cookies_and_never_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ops@example.com", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_json(json!({"message": "Login successful"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status-pages/acme"))
        .and(NoCookie)
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "private"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, 0).await;

    let client = client_for(&server);
    let message = client.auth().login("ops@example.com", "hunter22").await.unwrap();
    assert_eq!(message, "Login successful");

    let err = client.status_pages().public("acme").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Failed to fetch status page: private");
    assert!(!client.is_redirecting());
}

#[tokio::test]
async fn test_public_forbidden_is_returned_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status-pages/internal"))
        .and(NoCookie)
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, 0).await;

    let navigator = RecordingNavigator::at("/status/internal");
    let client = client_for(&server).with_navigator(navigator.clone());

    let err = client.status_pages().public("internal").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(!err.is_auth_expired());
    assert!(!client.is_redirecting());
    assert!(navigator.visits().is_empty());
}

#[tokio::test]
async fn test_login_rejection_is_not_a_session_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credentials"})),
        )
        .mount(&server)
        .await;
    mount_refresh(&server, 200, 0).await;

    let client = client_for(&server);
    let err = client.auth().login("ops@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to log in: invalid credentials");
}

#[tokio::test]
async fn test_payload_is_normalized_before_decoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/teams/7/monitors/31"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(http_monitor("31", "Checkout", json!(null)))),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let monitor = client.monitors().get("7", "31").await.unwrap();

    assert_eq!(monitor.team_id, "7");
    assert_eq!(monitor.failure_threshold, 3);
    assert_eq!(monitor.regions, vec!["1".to_string(), "2".to_string()]);
    assert!(monitor.incidents.is_empty());
    let MonitorConfig::Http(config) = &monitor.config else {
        panic!("expected an HTTP monitor");
    };
    assert_eq!(config.max_redirects, 5);
    assert_eq!(config.headers.get("X_Api_Key").map(String::as_str), Some("secret"));
}

#[tokio::test]
async fn test_missing_data_is_an_error_for_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/teams/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.teams().get("9").await,
        Err(ApiError::MissingData(_))
    ));
    assert!(client.teams().list().await.unwrap().is_empty());
}
