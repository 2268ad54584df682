//! Status page endpoints
//!
//! Team-scoped calls manage pages; [`StatusPagesApi::public`] reads the
//! published page anonymously, without cookies and without session renewal.

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{PublicStatusPage, StatusPageUpsertRequest, StatusPageWithElements};

/// Status pages API interface
#[derive(Clone)]
pub struct StatusPagesApi {
    client: KnockerClient,
}

impl StatusPagesApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    fn collection(team_id: &str) -> String {
        format!("teams/{}/status-pages", segment(team_id))
    }

    fn item(team_id: &str, status_page_id: &str) -> String {
        format!("{}/{}", Self::collection(team_id), segment(status_page_id))
    }

    /// GET /teams/:team/status-pages
    pub async fn list(&self, team_id: &str) -> ApiResult<Vec<StatusPageWithElements>> {
        let request = ApiRequest::get(Self::collection(team_id))
            .default_error("Failed to fetch status pages");
        self.client.list(&request).await
    }

    /// GET /teams/:team/status-pages/:id
    pub async fn get(&self, team_id: &str, status_page_id: &str) -> ApiResult<StatusPageWithElements> {
        let request = ApiRequest::get(Self::item(team_id, status_page_id))
            .default_error("Failed to fetch status page");
        self.client.data(&request).await
    }

    /// POST /teams/:team/status-pages
    pub async fn create(
        &self,
        team_id: &str,
        page: &StatusPageUpsertRequest,
    ) -> ApiResult<StatusPageWithElements> {
        let request = ApiRequest::post(Self::collection(team_id))
            .json(page)?
            .default_error("Failed to create status page");
        self.client.data(&request).await
    }

    /// PUT /teams/:team/status-pages/:id
    pub async fn update(
        &self,
        team_id: &str,
        status_page_id: &str,
        page: &StatusPageUpsertRequest,
    ) -> ApiResult<StatusPageWithElements> {
        let request = ApiRequest::put(Self::item(team_id, status_page_id))
            .json(page)?
            .default_error("Failed to update status page");
        self.client.data(&request).await
    }

    /// DELETE /teams/:team/status-pages/:id
    pub async fn delete(&self, team_id: &str, status_page_id: &str) -> ApiResult<String> {
        let request = ApiRequest::delete(Self::item(team_id, status_page_id))
            .default_error("Failed to delete status page");
        self.client.message(&request).await
    }

    /// Published page by slug, fetched anonymously
    ///
    /// GET /status-pages/:slug
    pub async fn public(&self, slug: &str) -> ApiResult<PublicStatusPage> {
        let request = ApiRequest::get(format!("status-pages/{}", segment(slug)))
            .default_error("Failed to fetch status page");
        self.client.public_data(&request).await
    }
}
