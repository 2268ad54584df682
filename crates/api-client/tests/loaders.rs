//! Page loaders against a mock API

mod common;

use common::{client_for, envelope, http_monitor, incident, team, STAMP};
use knocker_api_client::loaders::{
    load_home, load_incidents, load_monitor_create, load_monitor_list, load_public_status_page,
    load_sidebar, DerivedStatus, HomeTarget,
};
use knocker_api_client::LoadError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn respond(server: &MockServer, verb: &str, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_home_opens_first_team() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams", 200, envelope(json!([team("4", "Ops"), team("9", "Web")]))).await;

    let target = load_home(&client_for(&server)).await.unwrap();
    assert_eq!(target, HomeTarget::Team("4".to_string()));
}

#[tokio::test]
async fn test_home_without_teams() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams", 200, envelope(json!([]))).await;

    let target = load_home(&client_for(&server)).await.unwrap();
    assert_eq!(target.path(), "/new-team");
}

#[tokio::test]
async fn test_sidebar_joins_teams_and_user() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams", 200, envelope(json!([team("4", "Ops")]))).await;
    respond(
        &server,
        "GET",
        "/api/users/me",
        200,
        envelope(json!({
            "id": "1",
            "display_name": "Ada",
            "avatar": null,
            "created_at": STAMP,
            "updated_at": STAMP
        })),
    )
    .await;

    let sidebar = load_sidebar(&client_for(&server)).await.unwrap();
    assert_eq!(sidebar.teams.len(), 1);
    assert_eq!(sidebar.user.display_name, "Ada");
}

#[tokio::test]
async fn test_incidents_carry_monitor_names() {
    let server = MockServer::start().await;
    respond(
        &server,
        "GET",
        "/api/teams/7/incidents",
        200,
        envelope(json!([incident("10", "investigating"), incident("11", "resolved")])),
    )
    .await;
    respond(
        &server,
        "GET",
        "/api/teams/7/monitors",
        200,
        envelope(json!([
            http_monitor("1", "API", json!([incident("10", "investigating")])),
            http_monitor("2", "Web", json!([incident("10", "investigating")])),
        ])),
    )
    .await;

    let items = load_incidents(&client_for(&server), "7").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].monitor_names, vec!["API".to_string(), "Web".to_string()]);
    assert!(items[1].monitor_names.is_empty());
}

#[tokio::test]
async fn test_monitor_list_rows() {
    let server = MockServer::start().await;
    respond(
        &server,
        "GET",
        "/api/teams/7/monitors",
        200,
        envelope(json!([http_monitor("1", "API", json!([incident("10", "monitoring")]))])),
    )
    .await;

    let rows = load_monitor_list(&client_for(&server), "7", "/7/monitors").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, DerivedStatus::Degraded);
    assert_eq!(rows[0].frequency, "Every 1m");
    assert_eq!(rows[0].incident.as_ref().unwrap().link, "/7/incidents");
}

#[tokio::test]
async fn test_monitor_list_unknown_team() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams/404/monitors", 404, json!({"message": "team not found"})).await;

    let err = load_monitor_list(&client_for(&server), "404", "/404/monitors").await.unwrap_err();
    assert!(matches!(err, LoadError::Page { status: 404, ref message } if message == "Team not found"));
}

#[tokio::test]
async fn test_monitor_list_other_failures_keep_status() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams/7/monitors", 503, json!({})).await;

    let err = load_monitor_list(&client_for(&server), "7", "/7/monitors").await.unwrap_err();
    assert_eq!(err.status(), 503);
    assert_eq!(err.to_string(), "Failed to fetch monitors");
}

#[tokio::test]
async fn test_monitor_list_shows_server_message() {
    let server = MockServer::start().await;
    respond(
        &server,
        "GET",
        "/api/teams/7/monitors",
        500,
        json!({"message": "database unavailable"}),
    )
    .await;

    let err = load_monitor_list(&client_for(&server), "7", "/7/monitors").await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert_eq!(err.to_string(), "database unavailable");
}

#[tokio::test]
async fn test_monitor_list_expired_session_redirects() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams/7/monitors", 401, json!({})).await;
    respond(&server, "POST", "/api/auth/refresh", 401, json!({})).await;

    let err = load_monitor_list(&client_for(&server), "7", "/7/monitors?view=grid")
        .await
        .unwrap_err();
    match err {
        LoadError::Redirect(target) => {
            assert_eq!(target, "/auth/login?next=%2F7%2Fmonitors%3Fview%3Dgrid");
        }
        other => panic!("expected a redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_monitor_create_tolerates_failures() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/teams/7/notifications", 500, json!({})).await;

    let data = load_monitor_create(&client_for(&server), "7").await.unwrap();
    assert!(data.notifications.is_empty());
}

#[tokio::test]
async fn test_public_page_builds_elements() {
    let server = MockServer::start().await;
    respond(
        &server,
        "GET",
        "/api/status-pages/acme",
        200,
        envelope(json!({
            "status_page": {
                "id": "3",
                "team_id": "7",
                "title": "Acme",
                "slug": "acme",
                "created_at": STAMP,
                "updated_at": STAMP
            },
            "groups": [{
                "id": "20",
                "name": "Core",
                "type": "historical_timeline",
                "sort_order": 2,
                "status": "up",
                "uptime_sli_30": 99.9,
                "timeline": [{"day": STAMP, "success": 10, "fail": 0}]
            }],
            "monitors": [
                {"id": "30", "monitor_id": "1", "group_id": 20, "name": "API",
                 "type": "historical_timeline", "sort_order": 1, "timeline": null},
                {"id": "31", "monitor_id": "2", "group_id": null, "name": "Website",
                 "type": "current_status_indicator", "sort_order": 1, "status": "down"}
            ],
            "incidents": []
        })),
    )
    .await;

    let page = load_public_status_page(&client_for(&server), "acme").await.unwrap();
    let names: Vec<_> = page.elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Website", "Core"]);
    assert_eq!(page.elements[1].monitors.len(), 1);
    assert_eq!(page.elements[1].health.uptime_sli_30, Some(99.9));
}

#[tokio::test]
async fn test_public_page_failure_is_not_found() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/api/status-pages/gone", 500, json!({"message": "boom"})).await;

    let err = load_public_status_page(&client_for(&server), "gone").await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "Failed to fetch status page: boom");
}
