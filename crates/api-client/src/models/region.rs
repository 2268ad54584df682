use serde::{Deserialize, Serialize};

/// A monitoring region, e.g. `us-east` / "US East"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    pub display_name: String,
}
