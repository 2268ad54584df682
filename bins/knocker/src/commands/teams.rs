//! Team commands

use super::{emit, ensure_valid};
use crate::context::Context;
use anyhow::Result;
use clap::Subcommand;
use knocker_api_client::format::format_date;
use knocker_api_client::format::PLACEHOLDER;
use knocker_api_client::loaders::load_sidebar;
use knocker_cli::{Status, Table};
use knocker_core::validation::Validator;

#[derive(Subcommand, Debug, Clone, Default)]
pub enum TeamsCommand {
    /// List your teams
    #[default]
    List,

    /// Create a team
    Create {
        /// Team name
        name: String,
    },

    /// Rename a team
    Rename {
        /// Team id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a team
    Delete {
        /// Team id
        id: String,
    },
}

fn validate_name(name: &str) -> Result<()> {
    ensure_valid(
        Validator::new()
            .required_msg("name", name, "Team name is required")
            .max_length("name", name, 255)
            .validate(),
    )
}

pub async fn run(ctx: &Context, command: TeamsCommand) -> Result<()> {
    ctx.authenticate("/").await?;
    let teams = ctx.client.teams();

    match command {
        TeamsCommand::List => {
            let sidebar = ctx.spin("Fetching teams", load_sidebar(&ctx.client)).await?;
            emit(ctx, &sidebar, |sidebar| {
                Status::header(&format!("Teams of {}", sidebar.user.display_name));
                let mut table = Table::new(["ID", "NAME", "ROLE", "CREATED"]);
                for team in &sidebar.teams {
                    table.row([
                        team.id.clone(),
                        team.name.clone(),
                        team.role.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                        format_date(&team.created_at),
                    ]);
                }
                table.print();
            })
        }
        TeamsCommand::Create { name } => {
            validate_name(&name)?;
            let team = ctx.spin("Creating team", teams.create(name.trim())).await?;
            emit(ctx, &team, |team| {
                Status::success(&format!("Created team {} ({})", team.name, team.id));
            })
        }
        TeamsCommand::Rename { id, name } => {
            validate_name(&name)?;
            let team = ctx.spin("Renaming team", teams.update(&id, name.trim())).await?;
            emit(ctx, &team, |team| {
                Status::success(&format!("Renamed team {} to {}", team.id, team.name));
            })
        }
        TeamsCommand::Delete { id } => {
            let message = ctx.spin("Deleting team", teams.delete(&id)).await?;
            emit(ctx, &serde_json::json!({ "message": message }), |_| {
                Status::success(&format!("Deleted team {id}"));
            })
        }
    }
}
