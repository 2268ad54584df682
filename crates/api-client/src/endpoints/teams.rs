//! Team endpoints

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{Team, TeamRequest};

/// Teams API interface
#[derive(Clone)]
pub struct TeamsApi {
    client: KnockerClient,
}

impl TeamsApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    /// Teams the signed-in user belongs to, with their role in each
    ///
    /// GET /teams
    pub async fn list(&self) -> ApiResult<Vec<Team>> {
        let request = ApiRequest::get("teams").default_error("Failed to fetch teams");
        self.client.list(&request).await
    }

    /// POST /teams
    pub async fn create(&self, name: &str) -> ApiResult<Team> {
        let request = ApiRequest::post("teams")
            .json(&TeamRequest::new(name))?
            .default_error("Failed to create team");
        self.client.data(&request).await
    }

    /// GET /teams/:team
    pub async fn get(&self, team_id: &str) -> ApiResult<Team> {
        let request = ApiRequest::get(format!("teams/{}", segment(team_id)))
            .default_error("Failed to fetch team");
        self.client.data(&request).await
    }

    /// Rename a team
    ///
    /// PUT /teams/:team
    pub async fn update(&self, team_id: &str, name: &str) -> ApiResult<Team> {
        let request = ApiRequest::put(format!("teams/{}", segment(team_id)))
            .json(&TeamRequest::new(name))?
            .default_error("Failed to update team");
        self.client.data(&request).await
    }

    /// DELETE /teams/:team
    pub async fn delete(&self, team_id: &str) -> ApiResult<String> {
        let request = ApiRequest::delete(format!("teams/{}", segment(team_id)))
            .default_error("Failed to delete team");
        self.client.message(&request).await
    }
}
