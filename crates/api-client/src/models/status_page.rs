use super::{null_default, optional_id, Incident, MonitorStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// How an entry renders on a status page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    #[default]
    HistoricalTimeline,
    CurrentStatusIndicator,
    /// Listed without any indicator
    #[serde(rename = "none")]
    Plain,
}

impl ElementType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HistoricalTimeline => "historical_timeline",
            Self::CurrentStatusIndicator => "current_status_indicator",
            Self::Plain => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPage {
    pub id: String,
    pub team_id: String,
    #[serde(default)]
    pub title: String,
    pub slug: String,
    /// Base64 image data or a URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A monitor placed on a status page, inside a group or on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageMonitor {
    pub id: String,
    pub status_page_id: String,
    pub monitor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
}

/// Top-level entry of a status page: a group of monitors (`monitor ==
/// false`) or a single monitor (`monitor == true`, `monitor_id` set)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageElement {
    pub id: String,
    pub status_page_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
    #[serde(default)]
    pub monitor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub monitors: Vec<StatusPageMonitor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageWithElements {
    pub status_page: StatusPage,
    #[serde(default, deserialize_with = "null_default")]
    pub elements: Vec<StatusPageElement>,
}

/// Monitor entry of an upsert body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPageMonitorInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub monitor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
}

/// Element entry of an upsert body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPageElementInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
    pub monitor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
    pub monitors: Vec<StatusPageMonitorInput>,
}

/// Body for creating or replacing a status page. The API derives its groups
/// and placed monitors from `elements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPageUpsertRequest {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub elements: Vec<StatusPageElementInput>,
}

impl From<&StatusPageWithElements> for StatusPageUpsertRequest {
    fn from(page: &StatusPageWithElements) -> Self {
        Self {
            title: page.status_page.title.clone(),
            slug: page.status_page.slug.clone(),
            icon: page.status_page.icon.clone(),
            elements: page
                .elements
                .iter()
                .map(|element| StatusPageElementInput {
                    id: Some(element.id.clone()),
                    name: element.name.clone(),
                    kind: element.kind,
                    sort_order: element.sort_order,
                    monitor: element.monitor,
                    monitor_id: element.monitor_id.clone(),
                    monitors: element
                        .monitors
                        .iter()
                        .map(|m| StatusPageMonitorInput {
                            id: Some(m.id.clone()),
                            monitor_id: m.monitor_id.clone(),
                            group_id: m.group_id.clone(),
                            name: m.name.clone(),
                            kind: m.kind,
                            sort_order: m.sort_order,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// -----------------------------------------------------------------------------
// Public view
// -----------------------------------------------------------------------------

/// Check results of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub day: DateTime<Utc>,
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub fail: u64,
}

impl TimelinePoint {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.success + self.fail
    }
}

/// Current state and uptime history shared by every public entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MonitorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_sli_30: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_sli_60: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_sli_90: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPageGroup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
    #[serde(flatten)]
    pub health: PublicHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPageMonitor {
    pub id: String,
    pub monitor_id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub group_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
    #[serde(flatten)]
    pub health: PublicHealth,
}

/// Incidents shown publicly carry the id of the monitor they belong to
pub type PublicIncident = Incident;

/// `GET status-pages/:slug` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPage {
    pub status_page: StatusPage,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<PublicStatusPageGroup>,
    #[serde(default, deserialize_with = "null_default")]
    pub monitors: Vec<PublicStatusPageMonitor>,
    #[serde(default, deserialize_with = "null_default")]
    pub incidents: Vec<PublicIncident>,
}

/// Top-level entry of the public page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPageElement {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub sort_order: i32,
    pub monitor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
    #[serde(flatten)]
    pub health: PublicHealth,
    pub monitors: Vec<PublicStatusPageMonitor>,
}

/// Public page ready to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatusPageData {
    pub status_page: StatusPage,
    pub elements: Vec<PublicStatusPageElement>,
    pub incidents: Vec<PublicIncident>,
}

impl From<PublicStatusPage> for PublicStatusPageData {
    fn from(page: PublicStatusPage) -> Self {
        Self {
            elements: build_elements(page.groups, page.monitors),
            status_page: page.status_page,
            incidents: page.incidents,
        }
    }
}

/// Arrange groups and placed monitors into top-level elements.
///
/// Each group becomes an element holding its monitors; each monitor without
/// a group, or whose group is not on the page, becomes an element of its own.
/// Elements are ordered by sort order, then name; ties keep their input
/// order, groups first.
#[must_use]
pub fn build_elements(
    groups: Vec<PublicStatusPageGroup>,
    monitors: Vec<PublicStatusPageMonitor>,
) -> Vec<PublicStatusPageElement> {
    let known: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    let mut grouped: HashMap<String, Vec<PublicStatusPageMonitor>> = HashMap::new();
    let mut ungrouped = Vec::new();
    for monitor in monitors {
        match monitor.group_id.as_deref() {
            Some(group_id) if known.contains(group_id) => {
                grouped.entry(group_id.to_string()).or_default().push(monitor);
            }
            Some(group_id) => {
                warn!(
                    monitor_id = %monitor.monitor_id,
                    group_id = %group_id,
                    "Monitor placed in an unknown group; listing it on its own"
                );
                ungrouped.push(monitor);
            }
            None => ungrouped.push(monitor),
        }
    }

    let mut elements: Vec<PublicStatusPageElement> = groups
        .into_iter()
        .map(|group| PublicStatusPageElement {
            monitors: grouped.remove(&group.id).unwrap_or_default(),
            id: group.id,
            name: group.name,
            kind: group.kind,
            sort_order: group.sort_order,
            monitor: false,
            monitor_id: None,
            health: group.health,
        })
        .collect();

    elements.extend(ungrouped.into_iter().map(|monitor| PublicStatusPageElement {
        id: monitor.id,
        name: monitor.name,
        kind: monitor.kind,
        sort_order: monitor.sort_order,
        monitor: true,
        monitor_id: Some(monitor.monitor_id),
        health: monitor.health,
        monitors: Vec::new(),
    }));

    elements.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    elements
}
