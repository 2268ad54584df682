//! Shared fixtures for the integration tests

#![allow(dead_code)]

use knocker_api_client::{ClientConfig, KnockerClient, Navigator};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::{Match, MockServer, Request};

pub const STAMP: &str = "2025-03-10T09:00:00Z";

/// Client pointed at the mock server's `/api`
pub fn client_for(server: &MockServer) -> KnockerClient {
    let config = ClientConfig::development().with_base_url(format!("{}/api", server.uri()));
    KnockerClient::with_config(config).expect("client")
}

/// Navigator that records every target it is sent to
#[derive(Default)]
pub struct RecordingNavigator {
    pub location: Option<String>,
    pub visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(location: &str) -> Arc<Self> {
        Arc::new(Self {
            location: Some(location.to_string()),
            visits: Mutex::new(Vec::new()),
        })
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> Option<String> {
        self.location.clone()
    }

    fn navigate(&self, target: &str) {
        self.visits.lock().unwrap().push(target.to_string());
    }
}

/// Matches requests that carry no `Cookie` header
pub struct NoCookie;

impl Match for NoCookie {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("cookie")
    }
}

pub fn envelope(data: Value) -> Value {
    json!({ "message": "ok", "data": data })
}

pub fn team(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "role": "owner", "created_at": STAMP, "updated_at": STAMP })
}

pub fn incident(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "severity": "major",
        "is_public": false,
        "auto_resolve": true,
        "started_at": STAMP,
        "resolved_at": null,
        "created_at": STAMP,
        "updated_at": STAMP
    })
}

pub fn http_monitor(id: &str, name: &str, incidents: Value) -> Value {
    json!({
        "id": id,
        "team_id": "7",
        "name": name,
        "type": "http",
        "config": {
            "url": "https://shop.example.com/health",
            "method": "GET",
            "max_redirects": 5,
            "request_timeout": 30,
            "headers": {"X_Api_Key": "secret"},
            "accepted_status_codes": [200]
        },
        "interval": 60,
        "last_checked": STAMP,
        "failure_threshold": 3,
        "recovery_threshold": 1,
        "regions": [1, "2"],
        "notification": [],
        "incidents": incidents,
        "created_at": STAMP,
        "updated_at": STAMP
    })
}
