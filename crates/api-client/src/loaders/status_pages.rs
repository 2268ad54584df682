use super::{LoadError, LoadResult};
use crate::client::KnockerClient;
use crate::models::{Monitor, PublicStatusPageData, StatusPageWithElements};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageEditData {
    pub status_page: StatusPageWithElements,
    pub monitors: Vec<Monitor>,
}

/// Status pages of a team
pub async fn load_status_pages(
    client: &KnockerClient,
    team_id: &str,
) -> LoadResult<Vec<StatusPageWithElements>> {
    Ok(client.status_pages().list(team_id).await?)
}

/// Page being edited and the monitors that can be placed on it
pub async fn load_status_page_edit(
    client: &KnockerClient,
    team_id: &str,
    status_page_id: &str,
) -> LoadResult<StatusPageEditData> {
    let pages_api = client.status_pages();
    let monitors_api = client.monitors();
    let (status_page, monitors) = tokio::try_join!(
        pages_api.get(team_id, status_page_id),
        monitors_api.list(team_id)
    )?;
    Ok(StatusPageEditData {
        status_page,
        monitors,
    })
}

/// Public page by slug. Every failure renders as not found.
pub async fn load_public_status_page(
    client: &KnockerClient,
    slug: &str,
) -> LoadResult<PublicStatusPageData> {
    match client.status_pages().public(slug).await {
        Ok(page) => Ok(page.into()),
        Err(e) => {
            debug!(slug = %slug, error = %e, "Public status page unavailable");
            Err(LoadError::page(404, e.to_string()))
        }
    }
}
