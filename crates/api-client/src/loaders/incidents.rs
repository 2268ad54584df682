use super::LoadResult;
use crate::client::KnockerClient;
use crate::models::{Incident, IncidentEvent, Monitor};
use serde::Serialize;
use std::collections::HashMap;

/// Incident row with the names of the monitors that reported it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentListItem {
    #[serde(flatten)]
    pub incident: Incident,
    pub monitor_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetailData {
    pub incident: Incident,
    pub events: Vec<IncidentEvent>,
    pub monitor_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncidentData {
    pub monitors: Vec<Monitor>,
}

/// Map each incident id to the distinct names of the monitors listing it,
/// in first-seen order
#[must_use]
pub fn monitor_names_by_incident(monitors: &[Monitor]) -> HashMap<String, Vec<String>> {
    let mut lookup: HashMap<String, Vec<String>> = HashMap::new();
    for monitor in monitors {
        for incident in &monitor.incidents {
            let names = lookup.entry(incident.id.clone()).or_default();
            if !names.contains(&monitor.name) {
                names.push(monitor.name.clone());
            }
        }
    }
    lookup
}

/// Team incidents with their monitor names
pub async fn load_incidents(client: &KnockerClient, team_id: &str) -> LoadResult<Vec<IncidentListItem>> {
    let incidents_api = client.incidents();
    let monitors_api = client.monitors();
    let (incidents, monitors) =
        tokio::try_join!(incidents_api.list(team_id), monitors_api.list(team_id))?;

    let mut lookup = monitor_names_by_incident(&monitors);
    Ok(incidents
        .into_iter()
        .map(|incident| IncidentListItem {
            monitor_names: lookup.remove(&incident.id).unwrap_or_default(),
            incident,
        })
        .collect())
}

/// One incident with its timeline
pub async fn load_incident_detail(
    client: &KnockerClient,
    team_id: &str,
    incident_id: &str,
) -> LoadResult<IncidentDetailData> {
    let incidents_api = client.incidents();
    let monitors_api = client.monitors();
    let (incident, events, monitors) = tokio::try_join!(
        incidents_api.get(team_id, incident_id),
        incidents_api.events(team_id, incident_id),
        monitors_api.list(team_id),
    )?;

    let monitor_names = monitor_names_by_incident(&monitors)
        .remove(incident_id)
        .unwrap_or_default();
    Ok(IncidentDetailData {
        incident,
        events,
        monitor_names,
    })
}

/// Monitors an incident can be opened against
pub async fn load_new_incident(client: &KnockerClient, team_id: &str) -> LoadResult<NewIncidentData> {
    let monitors = client.monitors().list(team_id).await?;
    Ok(NewIncidentData { monitors })
}
