//! Monitor endpoints

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{Monitor, MonitorAnalytics, MonitorUpsertRequest};

/// Monitors API interface
#[derive(Clone)]
pub struct MonitorsApi {
    client: KnockerClient,
}

impl MonitorsApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    fn collection(team_id: &str) -> String {
        format!("teams/{}/monitors", segment(team_id))
    }

    fn item(team_id: &str, monitor_id: &str) -> String {
        format!("{}/{}", Self::collection(team_id), segment(monitor_id))
    }

    /// Monitors of a team, each with its recent incidents
    ///
    /// GET /teams/:team/monitors
    pub async fn list(&self, team_id: &str) -> ApiResult<Vec<Monitor>> {
        let request =
            ApiRequest::get(Self::collection(team_id)).default_error("Failed to fetch monitors");
        self.client.list(&request).await
    }

    /// GET /teams/:team/monitors/:id
    pub async fn get(&self, team_id: &str, monitor_id: &str) -> ApiResult<Monitor> {
        let request = ApiRequest::get(Self::item(team_id, monitor_id))
            .default_error("Failed to fetch monitor");
        self.client.data(&request).await
    }

    /// POST /teams/:team/monitors
    pub async fn create(&self, team_id: &str, monitor: &MonitorUpsertRequest) -> ApiResult<Monitor> {
        let request = ApiRequest::post(Self::collection(team_id))
            .json(monitor)?
            .default_error("Failed to create monitor");
        self.client.data(&request).await
    }

    /// PUT /teams/:team/monitors/:id
    pub async fn update(
        &self,
        team_id: &str,
        monitor_id: &str,
        monitor: &MonitorUpsertRequest,
    ) -> ApiResult<Monitor> {
        let request = ApiRequest::put(Self::item(team_id, monitor_id))
            .json(monitor)?
            .default_error("Failed to update monitor");
        self.client.data(&request).await
    }

    /// DELETE /teams/:team/monitors/:id
    pub async fn delete(&self, team_id: &str, monitor_id: &str) -> ApiResult<String> {
        let request = ApiRequest::delete(Self::item(team_id, monitor_id))
            .default_error("Failed to delete monitor");
        self.client.message(&request).await
    }

    /// Uptime and latency history
    ///
    /// GET /teams/:team/monitors/:id/analytics
    pub async fn analytics(&self, team_id: &str, monitor_id: &str) -> ApiResult<MonitorAnalytics> {
        let request = ApiRequest::get(format!("{}/analytics", Self::item(team_id, monitor_id)))
            .default_error("Failed to fetch monitor analytics");
        self.client.data(&request).await
    }
}
