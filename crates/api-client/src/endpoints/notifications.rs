//! Notification channel endpoints

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{Notification, NotificationCreateRequest, NotificationUpdateRequest};

/// Notifications API interface
#[derive(Clone)]
pub struct NotificationsApi {
    client: KnockerClient,
}

impl NotificationsApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    fn collection(team_id: &str) -> String {
        format!("teams/{}/notifications", segment(team_id))
    }

    fn item(team_id: &str, notification_id: &str) -> String {
        format!("{}/{}", Self::collection(team_id), segment(notification_id))
    }

    /// GET /teams/:team/notifications
    pub async fn list(&self, team_id: &str) -> ApiResult<Vec<Notification>> {
        let request = ApiRequest::get(Self::collection(team_id))
            .default_error("Failed to fetch notifications");
        self.client.list(&request).await
    }

    /// GET /teams/:team/notifications/:id
    pub async fn get(&self, team_id: &str, notification_id: &str) -> ApiResult<Notification> {
        let request = ApiRequest::get(Self::item(team_id, notification_id))
            .default_error("Failed to fetch notification");
        self.client.data(&request).await
    }

    /// POST /teams/:team/notifications
    pub async fn create(
        &self,
        team_id: &str,
        notification: &NotificationCreateRequest,
    ) -> ApiResult<Notification> {
        let request = ApiRequest::post(Self::collection(team_id))
            .json(notification)?
            .default_error("Failed to create notification");
        self.client.data(&request).await
    }

    /// PATCH /teams/:team/notifications/:id
    pub async fn update(
        &self,
        team_id: &str,
        notification_id: &str,
        update: &NotificationUpdateRequest,
    ) -> ApiResult<Notification> {
        let request = ApiRequest::patch(Self::item(team_id, notification_id))
            .json(update)?
            .default_error("Failed to update notification");
        self.client.data(&request).await
    }

    /// DELETE /teams/:team/notifications/:id
    pub async fn delete(&self, team_id: &str, notification_id: &str) -> ApiResult<String> {
        let request = ApiRequest::delete(Self::item(team_id, notification_id))
            .default_error("Failed to delete notification");
        self.client.message(&request).await
    }

    /// Deliver a test message through the channel
    ///
    /// POST /teams/:team/notifications/:id/test
    pub async fn test(&self, team_id: &str, notification_id: &str) -> ApiResult<String> {
        let request = ApiRequest::post(format!("{}/test", Self::item(team_id, notification_id)))
            .default_error("Failed to send test notification");
        self.client.message(&request).await
    }
}
