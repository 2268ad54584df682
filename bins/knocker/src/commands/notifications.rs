//! Notification channel commands

use super::{emit, ensure_valid};
use crate::context::Context;
use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use knocker_api_client::format::format_date;
use knocker_api_client::models::{
    DiscordConfig, NotificationConfig, NotificationCreateRequest, NotificationUpdateRequest,
    TelegramConfig,
};
use knocker_cli::{Status, Table};
use knocker_core::validation::Validator;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Discord,
    Telegram,
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum NotificationsCommand {
    /// List notification channels
    #[default]
    List,

    /// Add a Discord or Telegram channel
    Create {
        /// Channel name
        name: String,
        #[arg(long, value_enum)]
        channel: Channel,
        /// Discord webhook URL
        #[arg(long, required_if_eq("channel", "discord"))]
        webhook_url: Option<String>,
        /// Telegram bot token
        #[arg(long, required_if_eq("channel", "telegram"))]
        bot_token: Option<String>,
        /// Telegram chat id
        #[arg(long, required_if_eq("channel", "telegram"))]
        chat_id: Option<String>,
    },

    /// Rename a channel
    Rename {
        /// Channel id
        id: String,
        /// New name
        name: String,
    },

    /// Send a test message through a channel
    Test {
        /// Channel id
        id: String,
    },

    /// Delete a channel
    Delete {
        /// Channel id
        id: String,
    },
}

fn channel_config(
    channel: Channel,
    webhook_url: Option<String>,
    bot_token: Option<String>,
    chat_id: Option<String>,
) -> Result<NotificationConfig> {
    let config = match channel {
        Channel::Discord => {
            let webhook_url = webhook_url.unwrap_or_default();
            ensure_valid(
                Validator::new()
                    .required_msg("webhook_url", &webhook_url, "Webhook URL is required")
                    .url("webhook_url", &webhook_url)
                    .validate(),
            )?;
            NotificationConfig::Discord(DiscordConfig { webhook_url })
        }
        Channel::Telegram => {
            let bot_token = bot_token.unwrap_or_default();
            let chat_id = chat_id.unwrap_or_default();
            ensure_valid(
                Validator::new()
                    .required_msg("bot_token", &bot_token, "Bot token is required")
                    .required_msg("chat_id", &chat_id, "Chat id is required")
                    .validate(),
            )?;
            NotificationConfig::Telegram(TelegramConfig { bot_token, chat_id })
        }
    };
    Ok(config)
}

fn validate_name(name: &str) -> Result<()> {
    ensure_valid(
        Validator::new()
            .required_msg("name", name, "Name is required")
            .max_length("name", name, 255)
            .validate(),
    )
}

pub async fn run(ctx: &Context, command: NotificationsCommand) -> Result<()> {
    let team = ctx.team()?;
    ctx.authenticate(format!("/{team}/notifications")).await?;
    let api = ctx.client.notifications();

    match command {
        NotificationsCommand::List => {
            let channels = ctx.spin("Fetching notifications", api.list(team)).await?;
            emit(ctx, &channels, |channels| {
                let mut table = Table::new(["ID", "NAME", "TYPE", "CREATED"]);
                for channel in channels {
                    table.row([
                        channel.id.clone(),
                        channel.name.clone(),
                        channel.config.kind().to_string(),
                        format_date(&channel.created_at),
                    ]);
                }
                if table.is_empty() {
                    Status::info("No notification channels yet");
                } else {
                    table.print();
                }
            })
        }
        NotificationsCommand::Create {
            name,
            channel,
            webhook_url,
            bot_token,
            chat_id,
        } => {
            validate_name(&name)?;
            let request = NotificationCreateRequest {
                name: name.trim().to_string(),
                config: channel_config(channel, webhook_url, bot_token, chat_id)?,
            };
            let created = ctx.spin("Creating channel", api.create(team, &request)).await?;
            emit(ctx, &created, |created| {
                Status::success(&format!(
                    "Created {} channel {} ({})",
                    created.config.kind(),
                    created.name,
                    created.id
                ));
            })
        }
        NotificationsCommand::Rename { id, name } => {
            validate_name(&name)?;
            let request = NotificationUpdateRequest {
                name: Some(name.trim().to_string()),
                config: None,
            };
            let updated = ctx.spin("Renaming channel", api.update(team, &id, &request)).await?;
            emit(ctx, &updated, |updated| {
                Status::success(&format!("Renamed channel {} to {}", updated.id, updated.name));
            })
        }
        NotificationsCommand::Test { id } => {
            let message = ctx.spin("Sending test message", api.test(team, &id)).await?;
            emit(ctx, &serde_json::json!({ "message": message }), |_| {
                Status::success(&message);
            })
        }
        NotificationsCommand::Delete { id } => {
            let message = ctx.spin("Deleting channel", api.delete(team, &id)).await?;
            emit(ctx, &serde_json::json!({ "message": message }), |_| {
                Status::success(&format!("Deleted channel {id}"));
            })
        }
    }
}
