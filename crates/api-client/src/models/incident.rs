use super::optional_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Detected,
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [Self; 5] = [
        Self::Detected,
        Self::Investigating,
        Self::Identified,
        Self::Monitoring,
        Self::Resolved,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::Investigating => "investigating",
            Self::Identified => "identified",
            Self::Monitoring => "monitoring",
            Self::Resolved => "resolved",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Detected => "Detected",
            Self::Investigating => "Investigating",
            Self::Identified => "Identified",
            Self::Monitoring => "Monitoring",
            Self::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| format!("unknown incident status {s:?}"))
    }
}

/// Kind of entry on an incident timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentEventType {
    Detected,
    NotificationSent,
    ManuallyResolved,
    AutoResolved,
    Unpublished,
    Published,
    Investigating,
    Identified,
    Update,
    Monitoring,
}

impl IncidentEventType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Detected => "Detected",
            Self::NotificationSent => "Notification sent",
            Self::ManuallyResolved => "Manually resolved",
            Self::AutoResolved => "Auto resolved",
            Self::Unpublished => "Unpublished",
            Self::Published => "Published",
            Self::Investigating => "Investigating",
            Self::Identified => "Identified",
            Self::Update => "Update",
            Self::Monitoring => "Monitoring",
        }
    }
}

/// An outage or degradation affecting one or more monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    /// Reporting monitor; absent on team-wide listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
    pub status: IncidentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resolve: Option<bool>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Still open: no resolution time recorded
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.resolved_at.is_none()
    }
}

/// One timeline entry of an incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentEvent {
    pub id: String,
    pub incident_id: String,
    /// Author's user id; `None` for system events
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_by: Option<String>,
    pub message: String,
    pub event_type: IncidentEventType,
    #[serde(default)]
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of operations that both change an incident and log an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentWithEvent {
    pub incident: Incident,
    pub event: IncidentEvent,
}

/// `POST teams/:team/incidents` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resolve: Option<bool>,
    pub monitor_ids: Vec<String>,
}

/// `PATCH teams/:team/incidents/:id` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resolve: Option<bool>,
}

/// `POST teams/:team/incidents/:id/status` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentStatusUpdateRequest {
    pub status: IncidentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

/// `POST teams/:team/incidents/:id/events` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentEventCreateRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<IncidentEventType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_incident_event_with_numeric_author() {
        let event: IncidentEvent = serde_json::from_value(json!({
            "id": "5",
            "incidentId": "3",
            "createdBy": 77,
            "message": "Rolled back deploy",
            "eventType": "manually_resolved",
            "public": true,
            "createdAt": "2025-01-05T10:00:00Z",
            "updatedAt": "2025-01-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.created_by.as_deref(), Some("77"));
        assert_eq!(event.event_type, IncidentEventType::ManuallyResolved);
    }

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = IncidentCreateRequest {
            status: Some(IncidentStatus::Investigating),
            monitor_ids: vec!["12".to_string()],
            ..IncidentCreateRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"status": "investigating", "monitor_ids": ["12"]})
        );
    }

    #[test]
    fn test_status_parse_and_activity() {
        assert_eq!(
            "Monitoring".parse::<IncidentStatus>().unwrap(),
            IncidentStatus::Monitoring
        );
        assert!("closed".parse::<IncidentStatus>().is_err());

        let incident: Incident = serde_json::from_value(json!({
            "id": "1",
            "status": "resolved",
            "startedAt": "2025-01-05T10:00:00Z",
            "resolvedAt": "2025-01-05T11:00:00Z",
            "createdAt": "2025-01-05T10:00:00Z",
            "updatedAt": "2025-01-05T11:00:00Z"
        }))
        .unwrap();
        assert!(!incident.is_active());
        assert!(incident.monitor_id.is_none());
    }
}
