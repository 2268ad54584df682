//! Incident commands

use super::emit;
use crate::context::Context;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use knocker_api_client::format::{relative_time, Tone, PLACEHOLDER};
use knocker_api_client::loaders::{load_incident_detail, load_incidents, load_new_incident};
use knocker_api_client::models::{
    Incident, IncidentCreateRequest, IncidentEventCreateRequest, IncidentStatus,
    IncidentStatusUpdateRequest, IncidentUpdateRequest,
};
use knocker_cli::{paint, Status, Table};

#[derive(Subcommand, Debug, Clone, Default)]
pub enum IncidentsCommand {
    /// List incidents with the monitors they affect
    #[default]
    List,

    /// Show an incident and its timeline
    Show {
        /// Incident id
        id: String,
    },

    /// Open an incident
    Create(CreateArgs),

    /// Move an incident to a new status
    Status {
        /// Incident id
        id: String,
        /// detected, investigating, identified, monitoring or resolved
        status: IncidentStatus,
        /// Note posted with the change
        #[arg(long)]
        message: Option<String>,
        /// Show the change on public status pages
        #[arg(long)]
        public: Option<bool>,
    },

    /// Post an update to an incident's timeline
    Note {
        /// Incident id
        id: String,
        /// Update text
        message: String,
    },

    /// Publish or unpublish an incident
    Publish {
        /// Incident id
        id: String,
        /// Publish (`true`) or unpublish (`false`)
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        public: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Affected monitor id (repeatable)
    #[arg(long = "monitor", required = true)]
    pub monitors: Vec<String>,

    /// Initial status
    #[arg(long)]
    pub status: Option<IncidentStatus>,

    #[arg(long)]
    pub severity: Option<String>,

    /// First timeline entry
    #[arg(long)]
    pub message: Option<String>,

    /// Show on public status pages
    #[arg(long)]
    pub public: bool,

    /// Resolve automatically when the monitors recover
    #[arg(long)]
    pub auto_resolve: bool,
}

fn status_tone(incident: &Incident) -> Tone {
    if incident.is_active() {
        Tone::Destructive
    } else {
        Tone::Success
    }
}

pub async fn run(ctx: &Context, command: IncidentsCommand) -> Result<()> {
    let team = ctx.team()?;
    let api = ctx.client.incidents();
    let now = chrono::Utc::now();

    match command {
        IncidentsCommand::List => {
            ctx.authenticate(format!("/{team}/incidents")).await?;
            let items = ctx.spin("Fetching incidents", load_incidents(&ctx.client, team)).await?;

            emit(ctx, &items, |items| {
                let mut table = Table::new(["ID", "STATUS", "MONITORS", "STARTED", "RESOLVED"]);
                for item in items {
                    let incident = &item.incident;
                    table.row([
                        incident.id.clone(),
                        paint(incident.status.label(), status_tone(incident)),
                        if item.monitor_names.is_empty() {
                            PLACEHOLDER.to_string()
                        } else {
                            item.monitor_names.join(", ")
                        },
                        relative_time(Some(&incident.started_at), now),
                        relative_time(incident.resolved_at.as_ref(), now),
                    ]);
                }
                table.print();
            })
        }
        IncidentsCommand::Show { id } => {
            ctx.authenticate(format!("/{team}/incidents/{id}")).await?;
            let detail = ctx
                .spin("Fetching incident", load_incident_detail(&ctx.client, team, &id))
                .await?;

            emit(ctx, &detail, |detail| {
                let incident = &detail.incident;
                Status::header(&format!("Incident {}", incident.id));
                Status::field("Status", &paint(incident.status.label(), status_tone(incident)));
                if let Some(severity) = &incident.severity {
                    Status::field("Severity", severity);
                }
                Status::field("Monitors", &detail.monitor_names.join(", "));
                Status::field("Started", &relative_time(Some(&incident.started_at), now));
                if incident.resolved_at.is_some() {
                    Status::field("Resolved", &relative_time(incident.resolved_at.as_ref(), now));
                }

                println!();
                for event in &detail.events {
                    println!(
                        "  {}  {}  {}",
                        relative_time(Some(&event.created_at), now),
                        event.event_type.label(),
                        event.message
                    );
                }
            })
        }
        IncidentsCommand::Create(args) => {
            ctx.authenticate(format!("/{team}/incidents/new")).await?;
            let known = load_new_incident(&ctx.client, team).await?;
            let unknown: Vec<_> = args
                .monitors
                .iter()
                .filter(|id| !known.monitors.iter().any(|m| &m.id == *id))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                bail!("Unknown monitor id(s) for team {team}: {}", unknown.join(", "));
            }

            let request = IncidentCreateRequest {
                status: args.status,
                severity: args.severity,
                message: args.message,
                started_at: None,
                public: Some(args.public),
                auto_resolve: Some(args.auto_resolve),
                monitor_ids: args.monitors,
            };
            let created = ctx.spin("Opening incident", api.create(team, &request)).await?;
            emit(ctx, &created, |created| {
                Status::success(&format!(
                    "Opened incident {} ({})",
                    created.incident.id,
                    created.incident.status.label()
                ));
            })
        }
        IncidentsCommand::Status {
            id,
            status,
            message,
            public,
        } => {
            ctx.authenticate(format!("/{team}/incidents/{id}")).await?;
            let request = IncidentStatusUpdateRequest {
                status,
                message,
                public,
            };
            let updated = ctx
                .spin("Updating incident", api.update_status(team, &id, &request))
                .await?;
            emit(ctx, &updated, |updated| {
                Status::success(&format!(
                    "Incident {} is now {}",
                    updated.incident.id,
                    updated.incident.status.label()
                ));
            })
        }
        IncidentsCommand::Note { id, message } => {
            if message.trim().is_empty() {
                bail!("Update text must not be empty");
            }
            ctx.authenticate(format!("/{team}/incidents/{id}")).await?;
            let request = IncidentEventCreateRequest {
                message,
                event_type: None,
            };
            let event = ctx
                .spin("Posting update", api.create_event(team, &id, &request))
                .await?;
            emit(ctx, &event, |event| {
                Status::success(&format!("Posted update {} to incident {id}", event.id));
            })
        }
        IncidentsCommand::Publish { id, public } => {
            ctx.authenticate(format!("/{team}/incidents/{id}")).await?;
            let request = IncidentUpdateRequest {
                public: Some(public),
                auto_resolve: None,
            };
            let incident = ctx.spin("Updating incident", api.update(team, &id, &request)).await?;
            emit(ctx, &incident, |incident| {
                let state = if public { "published" } else { "unpublished" };
                Status::success(&format!("Incident {} {state}", incident.id));
            })
        }
    }
}
