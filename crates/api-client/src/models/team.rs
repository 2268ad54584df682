use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team, optionally carrying the caller's role in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// `owner`, `admin`, `member` or `viewer`; only present on list views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or renaming a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRequest {
    pub name: String,
}

impl TeamRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
