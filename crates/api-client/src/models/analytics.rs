use super::{id, null_default, Incident, Monitor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time range and bucket width of an analytics query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Bucket width as the API names it, e.g. `30m`
    pub bucket: String,
}

/// Check counts and latency percentiles over a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    pub total_count: u64,
    pub good_count: u64,
    pub uptime_pct: f64,
    pub p50_ms: f64,
    pub p75_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRegionSummary {
    #[serde(deserialize_with = "id")]
    pub region_id: String,
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
}

/// One bucket of one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSeriesPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "id")]
    pub region_id: String,
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
}

/// Uptime and latency history of a monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorAnalytics {
    pub monitor: Monitor,
    pub window: AnalyticsWindow,
    #[serde(default)]
    pub summary: AnalyticsSummary,
    #[serde(default, deserialize_with = "null_default")]
    pub regions: Vec<AnalyticsRegionSummary>,
    #[serde(default, deserialize_with = "null_default")]
    pub series: Vec<AnalyticsSeriesPoint>,
    #[serde(default, deserialize_with = "null_default")]
    pub incidents: Vec<Incident>,
}
