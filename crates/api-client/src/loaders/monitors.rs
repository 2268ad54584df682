use super::{LoadError, LoadResult};
use crate::client::KnockerClient;
use crate::error::ApiError;
use crate::format::{format_frequency, relative_time, PLACEHOLDER};
use crate::models::{Incident, IncidentStatus, Monitor, MonitorAnalytics, Notification, Region};
use crate::navigation::login_redirect_target;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Health shown on a monitor row, derived from its interval and incidents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    Operational,
    Degraded,
    Down,
    Paused,
}

impl DerivedStatus {
    /// Status of a monitor given its open incident, if any
    #[must_use]
    pub fn derive(monitor: &Monitor, active: Option<&Incident>) -> Self {
        if monitor.is_paused() {
            return Self::Paused;
        }
        match active.map(|incident| incident.status) {
            None | Some(IncidentStatus::Resolved) => Self::Operational,
            Some(IncidentStatus::Monitoring) => Self::Degraded,
            Some(_) => Self::Down,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Degraded => "degraded",
            Self::Down => "down",
            Self::Paused => "paused",
        }
    }
}

/// Card for a monitor's open incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIncident {
    pub id: String,
    pub status: IncidentStatus,
    pub severity: String,
    /// Relative time of the last update
    pub updated_at: String,
    pub summary: String,
    pub link: String,
}

/// One row of the monitors table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorListItem {
    pub id: String,
    pub name: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: DerivedStatus,
    pub regions: Vec<String>,
    pub frequency: String,
    pub uptime: String,
    pub response_time: String,
    pub last_checked: String,
    pub last_incident: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident: Option<ListIncident>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorDetailData {
    pub analytics: MonitorAnalytics,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorCreateData {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorEditData {
    pub monitor: Monitor,
    pub notifications: Vec<Notification>,
}

/// Detected incidents are presented as under investigation
fn list_status(status: IncidentStatus) -> IncidentStatus {
    match status {
        IncidentStatus::Detected => IncidentStatus::Investigating,
        other => other,
    }
}

fn incident_summary(incident: &Incident, now: DateTime<Utc>) -> String {
    let label = list_status(incident.status).label();
    let started = relative_time(Some(&incident.started_at), now);
    if started == PLACEHOLDER {
        format!("Incident {}", label.to_lowercase())
    } else {
        format!("{label} {started}")
    }
}

fn list_incident(incident: &Incident, team_id: &str, now: DateTime<Utc>) -> ListIncident {
    ListIncident {
        id: incident.id.clone(),
        status: list_status(incident.status),
        severity: "major".to_string(),
        updated_at: relative_time(Some(&incident.updated_at), now),
        summary: incident_summary(incident, now),
        link: format!("/{team_id}/incidents"),
    }
}

fn last_incident(incidents: &[Incident], now: DateTime<Utc>) -> String {
    match incidents.first() {
        None => "No incidents yet".to_string(),
        Some(latest) => match &latest.resolved_at {
            Some(resolved) => format!("Resolved {}", relative_time(Some(resolved), now)),
            None => format!("Started {}", relative_time(Some(&latest.started_at), now)),
        },
    }
}

/// Shape one monitor into its table row as seen at `now`
#[must_use]
pub fn monitor_list_item(monitor: &Monitor, team_id: &str, now: DateTime<Utc>) -> MonitorListItem {
    let active = monitor.incidents.iter().find(|i| i.is_active());
    let target = match monitor.target().trim() {
        "" => PLACEHOLDER.to_string(),
        target => target.to_string(),
    };

    MonitorListItem {
        id: monitor.id.clone(),
        name: monitor.name.clone(),
        target,
        kind: monitor.kind().label().to_string(),
        status: DerivedStatus::derive(monitor, active),
        regions: Vec::new(),
        frequency: format_frequency(Some(i64::from(monitor.interval))),
        uptime: PLACEHOLDER.to_string(),
        response_time: PLACEHOLDER.to_string(),
        last_checked: relative_time(monitor.last_checked.as_ref(), now),
        last_incident: last_incident(&monitor.incidents, now),
        incident: active.map(|incident| list_incident(incident, team_id, now)),
    }
}

/// Monitors table of a team.
///
/// `location` is the current path and query, used as the return path when
/// the session has expired.
pub async fn load_monitor_list(
    client: &KnockerClient,
    team_id: &str,
    location: &str,
) -> LoadResult<Vec<MonitorListItem>> {
    let monitors = client
        .monitors()
        .list(team_id)
        .await
        .map_err(|e| match e {
            ApiError::AuthExpired => LoadError::Redirect(login_redirect_target(location)),
            e if e.is_not_found() => LoadError::page(404, "Team not found"),
            e => LoadError::page(
                e.status().unwrap_or(500),
                e.server_message().unwrap_or("Failed to fetch monitors"),
            ),
        })?;

    let now = Utc::now();
    Ok(monitors
        .iter()
        .map(|monitor| monitor_list_item(monitor, team_id, now))
        .collect())
}

/// Analytics of one monitor plus the region catalog for labelling it
pub async fn load_monitor_detail(
    client: &KnockerClient,
    team_id: &str,
    monitor_id: &str,
) -> LoadResult<MonitorDetailData> {
    let regions_api = client.regions();
    let monitors_api = client.monitors();
    let (regions, analytics) = tokio::try_join!(
        regions_api.list(),
        monitors_api.analytics(team_id, monitor_id)
    )?;
    Ok(MonitorDetailData { analytics, regions })
}

/// Notification channels to offer on the create form.
///
/// A failure only costs the channel picker, so it yields an empty list.
pub async fn load_monitor_create(
    client: &KnockerClient,
    team_id: &str,
) -> LoadResult<MonitorCreateData> {
    let notifications = client
        .notifications()
        .list(team_id)
        .await
        .unwrap_or_else(|e| {
            warn!(team_id = %team_id, error = %e, "Failed to load notifications");
            Vec::new()
        });
    Ok(MonitorCreateData { notifications })
}

/// Monitor being edited and the team's notification channels
pub async fn load_monitor_edit(
    client: &KnockerClient,
    team_id: &str,
    monitor_id: Option<&str>,
) -> LoadResult<MonitorEditData> {
    let Some(monitor_id) = monitor_id.filter(|id| !id.is_empty()) else {
        return Err(LoadError::page(400, "monitorId query parameter is required"));
    };

    let monitors_api = client.monitors();
    let notifications_api = client.notifications();
    let (monitor, notifications) = tokio::try_join!(
        monitors_api.get(team_id, monitor_id),
        notifications_api.list(team_id)
    )?;
    Ok(MonitorEditData {
        monitor,
        notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn monitor(interval: i32, incidents: Value) -> Monitor {
        serde_json::from_value(json!({
            "id": "31",
            "teamId": "7",
            "name": "Checkout API",
            "type": "http",
            "config": {"url": "https://shop.example.com/health", "method": "GET"},
            "interval": interval,
            "lastChecked": "2025-03-10T11:59:30Z",
            "incidents": incidents,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn incident(id: &str, status: &str, resolved_at: Option<&str>) -> Value {
        json!({
            "id": id,
            "status": status,
            "startedAt": "2025-03-10T09:00:00Z",
            "resolvedAt": resolved_at,
            "createdAt": "2025-03-10T09:00:00Z",
            "updatedAt": "2025-03-10T11:55:00Z"
        })
    }

    #[test]
    fn test_healthy_row() {
        let item = monitor_list_item(&monitor(300, json!([])), "7", now());

        assert_eq!(item.target, "https://shop.example.com/health");
        assert_eq!(item.kind, "HTTP");
        assert_eq!(item.status, DerivedStatus::Operational);
        assert_eq!(item.frequency, "Every 5m");
        assert_eq!(item.uptime, PLACEHOLDER);
        assert_eq!(item.last_checked, "30 seconds ago");
        assert_eq!(item.last_incident, "No incidents yet");
        assert!(item.incident.is_none());
    }

    #[test]
    fn test_paused_wins_over_incidents() {
        let item = monitor_list_item(
            &monitor(0, json!([incident("1", "investigating", None)])),
            "7",
            now(),
        );
        assert_eq!(item.status, DerivedStatus::Paused);
        assert_eq!(item.frequency, "Paused");
    }

    #[test]
    fn test_active_incident_card() {
        let item = monitor_list_item(
            &monitor(60, json!([incident("5", "detected", None)])),
            "7",
            now(),
        );

        assert_eq!(item.status, DerivedStatus::Down);
        assert_eq!(item.last_incident, "Started 3 hours ago");
        let card = item.incident.unwrap();
        assert_eq!(card.status, IncidentStatus::Investigating);
        assert_eq!(card.severity, "major");
        assert_eq!(card.summary, "Investigating 3 hours ago");
        assert_eq!(card.updated_at, "5 minutes ago");
        assert_eq!(card.link, "/7/incidents");
    }

    #[test]
    fn test_monitoring_incident_is_degraded() {
        let item = monitor_list_item(
            &monitor(60, json!([incident("5", "monitoring", None)])),
            "7",
            now(),
        );
        assert_eq!(item.status, DerivedStatus::Degraded);
    }

    #[test]
    fn test_resolved_latest_incident() {
        let item = monitor_list_item(
            &monitor(
                60,
                json!([incident("5", "resolved", Some("2025-03-10T10:00:00Z"))]),
            ),
            "7",
            now(),
        );
        assert_eq!(item.status, DerivedStatus::Operational);
        assert_eq!(item.last_incident, "Resolved 2 hours ago");
        assert!(item.incident.is_none());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let item = monitor_list_item(&monitor(30, json!([])), "7", now());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "HTTP");
        assert_eq!(value["status"], "operational");
        assert_eq!(value["responseTime"], PLACEHOLDER);
        assert!(value.get("incident").is_none());
    }

    #[tokio::test]
    async fn test_edit_requires_monitor_id() {
        let client = KnockerClient::with_config(ClientConfig::development()).unwrap();
        for id in [None, Some("")] {
            let err = load_monitor_edit(&client, "7", id).await.unwrap_err();
            assert_eq!(err.status(), 400);
            assert_eq!(err.to_string(), "monitorId query parameter is required");
        }
    }
}
