use super::LoadResult;
use crate::client::KnockerClient;
use serde::Serialize;

/// Onboarding view for users without a team
pub const NEW_TEAM_PATH: &str = "/new-team";

/// Where the landing page sends the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "teamId", rename_all = "camelCase")]
pub enum HomeTarget {
    /// Open the first team's dashboard
    Team(String),
    /// Ask the user to create a team first
    CreateTeam,
}

impl HomeTarget {
    /// Pick the target for a team list
    #[must_use]
    pub fn for_teams<'a>(mut team_ids: impl Iterator<Item = &'a str>) -> Self {
        team_ids
            .next()
            .map_or(Self::CreateTeam, |id| Self::Team(id.to_string()))
    }

    /// Location to navigate to
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Team(id) => format!("/{id}"),
            Self::CreateTeam => NEW_TEAM_PATH.to_string(),
        }
    }
}

/// Landing page: first team, or team creation
pub async fn load_home(client: &KnockerClient) -> LoadResult<HomeTarget> {
    let teams = client.teams().list().await?;
    Ok(HomeTarget::for_teams(teams.iter().map(|t| t.id.as_str())))
}
