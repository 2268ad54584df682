//! Region endpoints

use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::Region;

/// Regions API interface
#[derive(Clone)]
pub struct RegionsApi {
    client: KnockerClient,
}

impl RegionsApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    /// Regions checks can run from
    ///
    /// GET /regions
    pub async fn list(&self) -> ApiResult<Vec<Region>> {
        let request = ApiRequest::get("regions").default_error("Failed to fetch regions");
        self.client.list(&request).await
    }
}
