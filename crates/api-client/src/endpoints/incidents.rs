//! Incident endpoints
//!
//! Status changes and manual timeline updates both log an incident event;
//! the calls that change the incident itself return it alongside that event.

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{
    Incident, IncidentCreateRequest, IncidentEvent, IncidentEventCreateRequest,
    IncidentStatusUpdateRequest, IncidentUpdateRequest, IncidentWithEvent,
};

/// Incidents API interface
#[derive(Clone)]
pub struct IncidentsApi {
    client: KnockerClient,
}

impl IncidentsApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    fn collection(team_id: &str) -> String {
        format!("teams/{}/incidents", segment(team_id))
    }

    fn item(team_id: &str, incident_id: &str) -> String {
        format!("{}/{}", Self::collection(team_id), segment(incident_id))
    }

    /// GET /teams/:team/incidents
    pub async fn list(&self, team_id: &str) -> ApiResult<Vec<Incident>> {
        let request =
            ApiRequest::get(Self::collection(team_id)).default_error("Failed to fetch incidents");
        self.client.list(&request).await
    }

    /// GET /teams/:team/incidents/:id
    pub async fn get(&self, team_id: &str, incident_id: &str) -> ApiResult<Incident> {
        let request = ApiRequest::get(Self::item(team_id, incident_id))
            .default_error("Failed to fetch incident");
        self.client.data(&request).await
    }

    /// Open an incident by hand
    ///
    /// POST /teams/:team/incidents
    pub async fn create(
        &self,
        team_id: &str,
        incident: &IncidentCreateRequest,
    ) -> ApiResult<IncidentWithEvent> {
        let request = ApiRequest::post(Self::collection(team_id))
            .json(incident)?
            .default_error("Failed to create incident");
        self.client.data(&request).await
    }

    /// Change visibility or auto-resolution
    ///
    /// PATCH /teams/:team/incidents/:id
    pub async fn update(
        &self,
        team_id: &str,
        incident_id: &str,
        update: &IncidentUpdateRequest,
    ) -> ApiResult<Incident> {
        let request = ApiRequest::patch(Self::item(team_id, incident_id))
            .json(update)?
            .default_error("Failed to update incident");
        self.client.data(&request).await
    }

    /// POST /teams/:team/incidents/:id/status
    pub async fn update_status(
        &self,
        team_id: &str,
        incident_id: &str,
        update: &IncidentStatusUpdateRequest,
    ) -> ApiResult<IncidentWithEvent> {
        let request = ApiRequest::post(format!("{}/status", Self::item(team_id, incident_id)))
            .json(update)?
            .default_error("Failed to update incident status");
        self.client.data(&request).await
    }

    /// Timeline, oldest first
    ///
    /// GET /teams/:team/incidents/:id/events
    pub async fn events(&self, team_id: &str, incident_id: &str) -> ApiResult<Vec<IncidentEvent>> {
        let request = ApiRequest::get(format!("{}/events", Self::item(team_id, incident_id)))
            .default_error("Failed to fetch incident timeline");
        self.client.list(&request).await
    }

    /// POST /teams/:team/incidents/:id/events
    pub async fn create_event(
        &self,
        team_id: &str,
        incident_id: &str,
        event: &IncidentEventCreateRequest,
    ) -> ApiResult<IncidentEvent> {
        let request = ApiRequest::post(format!("{}/events", Self::item(team_id, incident_id)))
            .json(event)?
            .default_error("Failed to add timeline update");
        self.client.data(&request).await
    }
}
