//! Knocker command line
//!
//! Terminal front end for the Knocker monitoring API: teams, monitors,
//! incidents, notification channels and status pages.

use clap::{Parser, Subcommand};
use knocker_cli::{OutputFormat, Status};
use knocker_core::config::Config;
use knocker_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

mod commands;
mod context;
mod exit;

use commands::{auth, incidents, monitors, notifications, regions, status_pages, teams};
use context::Context;

/// Command line client for Knocker
#[derive(Parser)]
#[command(name = "knocker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (default: .knocker.toml, then the user config dir)
    #[arg(long, global = true, env = "KNOCKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the API
    #[arg(long, global = true, env = "KNOCKER_API_BASE")]
    pub api_base: Option<String>,

    /// Team to operate on
    #[arg(short, long, global = true, env = "KNOCKER_TEAM")]
    pub team: Option<String>,

    /// Account email used to sign in before the command runs
    #[arg(long, global = true, env = "KNOCKER_EMAIL")]
    pub email: Option<String>,

    /// Account password used to sign in before the command runs
    #[arg(long, global = true, env = "KNOCKER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials against the API
    Login,

    /// Create an account
    Register {
        /// Name shown to teammates
        #[arg(long)]
        display_name: String,
    },

    /// Print the URL that starts an OAuth sign-in
    OauthUrl {
        /// Identity provider, e.g. `google`
        provider: String,

        /// Path to return to afterwards
        #[arg(long)]
        next: Option<String>,
    },

    /// Show the signed-in user
    Me,

    /// Show where the dashboard opens for this account
    Home,

    /// Manage teams
    Teams {
        #[command(subcommand)]
        action: Option<teams::TeamsCommand>,
    },

    /// List check regions
    Regions,

    /// Manage monitors
    Monitors {
        #[command(subcommand)]
        action: Option<monitors::MonitorsCommand>,
    },

    /// Manage incidents
    Incidents {
        #[command(subcommand)]
        action: Option<incidents::IncidentsCommand>,
    },

    /// Manage notification channels
    Notifications {
        #[command(subcommand)]
        action: Option<notifications::NotificationsCommand>,
    },

    /// Manage status pages
    StatusPages {
        #[command(subcommand)]
        action: Option<status_pages::StatusPagesCommand>,
    },

    /// Show a published status page
    StatusPage {
        /// Public slug of the page
        slug: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match Config::load(cli.global.config.as_deref()) {
        Ok(file) => {
            init_logging(cli.global.verbose, &file);
            run(cli, file).await
        }
        Err(e) => Err(e.into()),
    };

    let summary = serde_json::to_string(&knocker_telemetry::stats().summary()).unwrap_or_default();
    debug!(stats = %summary, "API traffic");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::from(exit::code_for(&e))
        }
    }
}

fn init_logging(verbose: bool, file: &Config) {
    let config = if verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default().with_log_level(&file.schema.telemetry.log_level)
    };
    if let Err(e) = knocker_telemetry::init(&config) {
        eprintln!("{e}");
    }
}

async fn run(cli: Cli, file: Config) -> anyhow::Result<()> {
    let ctx = Context::new(&cli.global, file)?;

    match cli.command {
        Commands::Login => auth::login(&ctx).await,
        Commands::Register { display_name } => auth::register(&ctx, &display_name).await,
        Commands::OauthUrl { provider, next } => auth::oauth_url(&ctx, &provider, next.as_deref()),
        Commands::Me => auth::me(&ctx).await,
        Commands::Home => auth::home(&ctx).await,
        Commands::Teams { action } => teams::run(&ctx, action.unwrap_or_default()).await,
        Commands::Regions => regions::run(&ctx).await,
        Commands::Monitors { action } => monitors::run(&ctx, action.unwrap_or_default()).await,
        Commands::Incidents { action } => incidents::run(&ctx, action.unwrap_or_default()).await,
        Commands::Notifications { action } => {
            notifications::run(&ctx, action.unwrap_or_default()).await
        }
        Commands::StatusPages { action } => {
            status_pages::run(&ctx, action.unwrap_or_default()).await
        }
        Commands::StatusPage { slug } => status_pages::public(&ctx, &slug).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_command() {
        let cli = Cli::try_parse_from([
            "knocker", "--team", "7", "-f", "json", "monitors", "show", "31",
        ])
        .unwrap();
        assert_eq!(cli.global.team.as_deref(), Some("7"));
        assert_eq!(cli.global.format, Some(OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Monitors {
                action: Some(monitors::MonitorsCommand::Show { .. })
            }
        ));
    }
}
