use super::{id_list, null_default, Incident};
use crate::casing::normalize_keys_with;
use chrono::{DateTime, Utc};
use knocker_core::monitor_settings::normalize_status_codes;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of check a monitor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Http,
    Ping,
}

impl MonitorType {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Ping => "ping",
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Ping => "Ping",
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "ping" => Ok(Self::Ping),
            other => Err(format!("unsupported monitor type {other:?}")),
        }
    }
}

/// Last observed monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    /// Anything else the API reports, including the empty string
    #[serde(other)]
    Unknown,
}

/// HTTP verbs an HTTP monitor may use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Every supported verb
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| format!("unsupported HTTP method {s:?}"))
    }
}

/// Encoding of an HTTP monitor's request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Json,
    Xml,
}

/// Settings of an HTTP check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct HttpMonitorConfig {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub max_redirects: u32,
    /// Seconds before the request is abandoned
    #[serde(default, alias = "requestTimeoutSeconds")]
    pub request_timeout: u32,
    /// Request headers, kept with their original casing
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub headers: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "body_encoding",
        skip_serializing_if = "Option::is_none"
    )]
    pub body_encoding: Option<BodyEncoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Treat a failing check as up and a passing one as down
    #[serde(default)]
    pub upside_down_mode: bool,
    #[serde(default)]
    pub certificate_expiry_notification: bool,
    #[serde(default)]
    pub ignore_tls_error: bool,
    /// Status codes counted as success, ascending
    #[serde(default, deserialize_with = "status_codes")]
    pub accepted_status_codes: Vec<u16>,
}

/// Settings of an ICMP ping check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PingMonitorConfig {
    pub host: String,
    #[serde(default)]
    pub timeout_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<u32>,
}

/// Check settings, discriminated by the monitor's `type`
///
/// On the wire this is two sibling fields, `type` and `config`, so it is
/// flattened into [`Monitor`] and [`MonitorUpsertRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorConfig {
    Http(HttpMonitorConfig),
    Ping(PingMonitorConfig),
}

impl MonitorConfig {
    #[must_use]
    pub fn kind(&self) -> MonitorType {
        match self {
            Self::Http(_) => MonitorType::Http,
            Self::Ping(_) => MonitorType::Ping,
        }
    }

    /// What the check probes: the URL of an HTTP check or the ping host
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Http(config) => &config.url,
            Self::Ping(config) => &config.host,
        }
    }

    /// Build the variant named by `kind` from a config payload. The payload
    /// may also arrive as a JSON-encoded string of snake_case keys.
    pub fn from_parts(kind: MonitorType, config: Value) -> Result<Self, serde_json::Error> {
        let config = match config {
            Value::String(raw) => normalize_keys_with(serde_json::from_str(&raw)?, &["headers"]),
            other => other,
        };

        Ok(match kind {
            MonitorType::Http => Self::Http(serde_json::from_value(config)?),
            MonitorType::Ping => Self::Ping(serde_json::from_value(config)?),
        })
    }
}

impl Serialize for MonitorConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MonitorConfig", 2)?;
        state.serialize_field("type", &self.kind())?;
        match self {
            Self::Http(config) => state.serialize_field("config", config)?,
            Self::Ping(config) => state.serialize_field("config", config)?,
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for MonitorConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            kind: MonitorType,
            #[serde(default)]
            config: Value,
        }

        let Tagged { kind, config } = Tagged::deserialize(deserializer)?;
        Self::from_parts(kind, config).map_err(D::Error::custom)
    }
}

/// A configured uptime check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: String,
    pub team_id: String,
    pub name: String,
    #[serde(flatten)]
    pub config: MonitorConfig,
    /// Seconds between checks; zero or less means paused
    #[serde(default)]
    pub interval: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MonitorStatus>,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failure_threshold: i16,
    #[serde(default)]
    pub recovery_threshold: i16,
    /// Region ids the check runs from
    #[serde(default, deserialize_with = "id_list")]
    pub regions: Vec<String>,
    /// Notification channel ids
    #[serde(default, deserialize_with = "id_list")]
    pub notification: Vec<String>,
    /// Recent incidents, newest first; only populated by list views
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub incidents: Vec<Incident>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Monitor {
    #[must_use]
    pub fn kind(&self) -> MonitorType {
        self.config.kind()
    }

    #[must_use]
    pub fn target(&self) -> &str {
        self.config.target()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.interval <= 0
    }
}

/// Body for creating or replacing a monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorUpsertRequest {
    pub name: String,
    #[serde(flatten)]
    pub config: MonitorConfig,
    pub interval: i32,
    pub failure_threshold: i16,
    pub recovery_threshold: i16,
    pub regions: Vec<String>,
    pub notification: Vec<String>,
}

impl From<&Monitor> for MonitorUpsertRequest {
    fn from(monitor: &Monitor) -> Self {
        Self {
            name: monitor.name.clone(),
            config: monitor.config.clone(),
            interval: monitor.interval,
            failure_threshold: monitor.failure_threshold,
            recovery_threshold: monitor.recovery_threshold,
            regions: monitor.regions.clone(),
            notification: monitor.notification.clone(),
        }
    }
}

fn body_encoding<'de, D>(deserializer: D) -> Result<Option<BodyEncoding>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("json") => Ok(Some(BodyEncoding::Json)),
        Some("xml") => Ok(Some(BodyEncoding::Xml)),
        Some(other) => Err(D::Error::custom(format!("unknown body encoding {other:?}"))),
    }
}

/// Accepts integer codes as well as strings such as `"404"` or `"2xx"`
fn status_codes<'de, D>(deserializer: D) -> Result<Vec<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Code(u16),
        Text(String),
    }

    let entries: Option<Vec<Entry>> = Option::deserialize(deserializer)?;
    let mut codes = Vec::new();
    let mut texts = Vec::new();
    for entry in entries.unwrap_or_default() {
        match entry {
            Entry::Code(code) => codes.push(code),
            Entry::Text(text) => texts.push(text),
        }
    }
    codes.extend(normalize_status_codes(&texts));
    codes.sort_unstable();
    codes.dedup();
    Ok(codes)
}
