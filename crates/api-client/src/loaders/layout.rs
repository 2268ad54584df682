use super::LoadResult;
use crate::client::KnockerClient;
use crate::models::{Team, User};
use serde::Serialize;

/// Sidebar of every team page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarData {
    pub teams: Vec<Team>,
    pub user: User,
}

/// Teams and the signed-in user, fetched together
pub async fn load_sidebar(client: &KnockerClient) -> LoadResult<SidebarData> {
    let teams_api = client.teams();
    let users_api = client.users();
    let (teams, user) = tokio::try_join!(teams_api.list(), users_api.me())?;
    Ok(SidebarData { teams, user })
}
