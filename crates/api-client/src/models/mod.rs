//! Typed records mirrored from the Knocker API
//!
//! Every payload is re-keyed to camelCase before it reaches these types (see
//! [`crate::casing`]), so deserialization is camelCase throughout. Request
//! bodies serialize snake_case, matching the wire format the API expects.

mod analytics;
mod incident;
mod monitor;
mod notification;
mod region;
mod status_page;
mod team;
mod user;

pub use analytics::{
    AnalyticsRegionSummary, AnalyticsSeriesPoint, AnalyticsSummary, AnalyticsWindow,
    MonitorAnalytics,
};
pub use incident::{
    Incident, IncidentCreateRequest, IncidentEvent, IncidentEventCreateRequest,
    IncidentEventType, IncidentStatus, IncidentStatusUpdateRequest, IncidentUpdateRequest,
    IncidentWithEvent,
};
pub use monitor::{
    BodyEncoding, HttpMethod, HttpMonitorConfig, Monitor, MonitorConfig, MonitorStatus,
    MonitorType, MonitorUpsertRequest, PingMonitorConfig,
};
pub use notification::{
    DiscordConfig, Notification, NotificationConfig, NotificationCreateRequest,
    NotificationType, NotificationUpdateRequest, TelegramConfig,
};
pub use region::Region;
pub use status_page::{
    build_elements, ElementType, PublicHealth, PublicIncident, PublicStatusPage, PublicStatusPageData,
    PublicStatusPageElement, PublicStatusPageGroup, PublicStatusPageMonitor, StatusPage,
    StatusPageElement, StatusPageElementInput, StatusPageMonitor, StatusPageMonitorInput,
    StatusPageUpsertRequest, StatusPageWithElements, TimelinePoint,
};
pub use team::{Team, TeamRequest};
pub use user::{LoginRequest, RegisterRequest, User};

use serde::{Deserialize, Deserializer};

/// Response envelope: `{ message?, data? }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope<T> {
    /// Human-readable outcome
    pub message: Option<String>,
    /// Payload
    pub data: Option<T>,
}

/// Deserialize `null` as the type's default. The API encodes empty lists as
/// `null`.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// An id that may be a string or an integer
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Ids arrive as strings, except a few that the API emits as bare integers
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// A list of ids that may be strings or integers, `null` meaning empty
pub(crate) fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<RawId>> = Option::deserialize(deserializer)?;
    Ok(ids
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_fields_optional() {
        let envelope: Envelope<Vec<u8>> = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.message.is_none());
        assert!(envelope.data.is_none());

        let envelope: Envelope<Vec<u8>> =
            serde_json::from_value(json!({"message": "ok", "data": null})).unwrap();
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_envelope_payload_without_default() {
        #[derive(Debug, Deserialize)]
        struct Page {
            slug: String,
        }

        let envelope: Envelope<Page> =
            serde_json::from_value(json!({"data": {"slug": "acme"}})).unwrap();
        assert_eq!(envelope.data.unwrap().slug, "acme");

        let envelope: Envelope<Page> = serde_json::from_value(json!({"message": "gone"})).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_optional_id_accepts_numbers() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "optional_id")]
            id: Option<String>,
        }

        let h: Holder = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(h.id.as_deref(), Some("42"));
        let h: Holder = serde_json::from_value(json!({"id": "42"})).unwrap();
        assert_eq!(h.id.as_deref(), Some("42"));
        let h: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(h.id.is_none());
    }

    #[test]
    fn test_id_list_mixed_and_null() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "id_list")]
            ids: Vec<String>,
        }

        let h: Holder = serde_json::from_value(json!({"ids": ["1", 2]})).unwrap();
        assert_eq!(h.ids, vec!["1", "2"]);
        let h: Holder = serde_json::from_value(json!({"ids": null})).unwrap();
        assert!(h.ids.is_empty());
    }
}
