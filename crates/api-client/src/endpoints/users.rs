//! User endpoints

use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::User;

/// Users API interface
#[derive(Clone)]
pub struct UsersApi {
    client: KnockerClient,
}

impl UsersApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    /// The signed-in user
    ///
    /// GET /users/me
    pub async fn me(&self) -> ApiResult<User> {
        let request = ApiRequest::get("users/me").default_error("Failed to fetch user");
        self.client.data(&request).await
    }
}
