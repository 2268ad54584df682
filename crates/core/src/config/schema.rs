//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// API connection settings
    #[serde(default)]
    pub api: ApiSection,

    /// CLI defaults
    #[serde(default)]
    pub cli: CliSection,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// API connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiSection {
    /// Base URL of the API, e.g. `https://knocker.example.com/api`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CliSection {
    /// Team used when `--team` is not given
    #[serde(default)]
    pub default_team: Option<String>,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySection {
    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
