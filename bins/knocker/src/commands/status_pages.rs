//! Status page commands

use super::{emit, ensure_valid};
use crate::context::Context;
use anyhow::{bail, Result};
use clap::Subcommand;
use knocker_api_client::format::{
    format_date, format_sli, relative_time, status_label, status_tone, timeline_tone,
    PLACEHOLDER,
};
use knocker_api_client::forms::validate_status_page;
use knocker_api_client::loaders::{
    load_public_status_page, load_status_page_edit, load_status_pages,
};
use knocker_api_client::models::{
    ElementType, PublicHealth, StatusPageElementInput, StatusPageUpsertRequest,
};
use knocker_cli::{paint, Status, Table};

/// Days of history drawn for a timeline
const TIMELINE_DAYS: usize = 30;

#[derive(Subcommand, Debug, Clone, Default)]
pub enum StatusPagesCommand {
    /// List the team's status pages
    #[default]
    List,

    /// Show a page with its elements and the monitors that can be placed
    Show {
        /// Status page id
        id: String,
    },

    /// Create an empty status page
    Create {
        title: String,
        /// Public address, `/status/<slug>`
        slug: String,
        #[arg(long)]
        icon: Option<String>,
    },

    /// Place a monitor on a page as its own element
    AddMonitor {
        /// Status page id
        id: String,
        /// Monitor id
        monitor_id: String,
        /// Element name, defaults to the monitor name
        #[arg(long)]
        name: Option<String>,
        /// Show the current state only
        #[arg(long)]
        current_only: bool,
    },

    /// Delete a status page
    Delete {
        /// Status page id
        id: String,
    },
}

pub async fn run(ctx: &Context, command: StatusPagesCommand) -> Result<()> {
    let team = ctx.team()?;
    let api = ctx.client.status_pages();

    match command {
        StatusPagesCommand::List => {
            ctx.authenticate(format!("/{team}/status-pages")).await?;
            let pages = ctx
                .spin("Fetching status pages", load_status_pages(&ctx.client, team))
                .await?;
            emit(ctx, &pages, |pages| {
                let mut table = Table::new(["ID", "TITLE", "SLUG", "ELEMENTS", "UPDATED"]);
                for page in pages {
                    table.row([
                        page.status_page.id.clone(),
                        page.status_page.title.clone(),
                        page.status_page.slug.clone(),
                        page.elements.len().to_string(),
                        format_date(&page.status_page.updated_at),
                    ]);
                }
                table.print();
            })
        }
        StatusPagesCommand::Show { id } => {
            ctx.authenticate(format!("/{team}/status-pages/{id}")).await?;
            let data = ctx
                .spin("Fetching status page", load_status_page_edit(&ctx.client, team, &id))
                .await?;
            emit(ctx, &data, |data| {
                let page = &data.status_page.status_page;
                Status::header(&page.title);
                Status::field("Slug", &page.slug);
                Status::field("Icon", page.icon.as_deref().unwrap_or(PLACEHOLDER));

                let mut table = Table::new(["ORDER", "NAME", "TYPE", "MONITOR"]);
                for element in &data.status_page.elements {
                    table.row([
                        element.sort_order.to_string(),
                        element.name.clone(),
                        element.kind.as_str().to_string(),
                        element.monitor_id.clone().unwrap_or_else(|| {
                            format!("{} grouped", element.monitors.len())
                        }),
                    ]);
                }
                println!();
                table.print();

                let placed: Vec<_> = data
                    .monitors
                    .iter()
                    .map(|m| format!("{} ({})", m.name, m.id))
                    .collect();
                println!();
                Status::field("Available monitors", &placed.join(", "));
            })
        }
        StatusPagesCommand::Create { title, slug, icon } => {
            let request = StatusPageUpsertRequest {
                title: title.trim().to_string(),
                slug: slug.trim().to_string(),
                icon,
                elements: Vec::new(),
            };
            ensure_valid(validate_status_page(&request))?;

            ctx.authenticate(format!("/{team}/status-pages/new")).await?;
            let page = ctx.spin("Creating status page", api.create(team, &request)).await?;
            emit(ctx, &page, |page| {
                Status::success(&format!(
                    "Created status page {} at /status/{}",
                    page.status_page.id, page.status_page.slug
                ));
            })
        }
        StatusPagesCommand::AddMonitor {
            id,
            monitor_id,
            name,
            current_only,
        } => {
            ctx.authenticate(format!("/{team}/status-pages/{id}")).await?;
            let data = load_status_page_edit(&ctx.client, team, &id).await?;
            let Some(monitor) = data.monitors.iter().find(|m| m.id == monitor_id) else {
                bail!("Monitor {monitor_id} does not belong to team {team}");
            };

            let mut request = StatusPageUpsertRequest::from(&data.status_page);
            let sort_order = request
                .elements
                .iter()
                .map(|e| e.sort_order)
                .max()
                .unwrap_or(0)
                + 1;
            request.elements.push(StatusPageElementInput {
                id: None,
                name: name.unwrap_or_else(|| monitor.name.clone()),
                kind: if current_only {
                    ElementType::CurrentStatusIndicator
                } else {
                    ElementType::HistoricalTimeline
                },
                sort_order,
                monitor: true,
                monitor_id: Some(monitor.id.clone()),
                monitors: Vec::new(),
            });
            ensure_valid(validate_status_page(&request))?;

            let page = ctx
                .spin("Updating status page", api.update(team, &id, &request))
                .await?;
            emit(ctx, &page, |page| {
                Status::success(&format!(
                    "{} now shows {} element(s)",
                    page.status_page.title,
                    page.elements.len()
                ));
            })
        }
        StatusPagesCommand::Delete { id } => {
            ctx.authenticate(format!("/{team}/status-pages")).await?;
            let message = ctx.spin("Deleting status page", api.delete(team, &id)).await?;
            emit(ctx, &serde_json::json!({ "message": message }), |_| {
                Status::success(&format!("Deleted status page {id}"));
            })
        }
    }
}

/// Render the public page behind `/status/<slug>`; no sign-in needed
pub async fn public(ctx: &Context, slug: &str) -> Result<()> {
    let data = ctx
        .spin("Fetching status page", load_public_status_page(&ctx.client, slug))
        .await?;
    let now = chrono::Utc::now();

    emit(ctx, &data, |data| {
        Status::header(&data.status_page.title);
        for element in &data.elements {
            print_health(&element.name, &element.health, element.kind, 0);
            for monitor in &element.monitors {
                print_health(&monitor.name, &monitor.health, monitor.kind, 1);
            }
        }

        let open: Vec<_> = data.incidents.iter().filter(|i| i.is_active()).collect();
        if !open.is_empty() {
            println!();
            Status::header("Incidents");
            for incident in open {
                Status::field(
                    incident.status.label(),
                    &format!("started {}", relative_time(Some(&incident.started_at), now)),
                );
            }
        }
    })
}

fn print_health(name: &str, health: &PublicHealth, kind: ElementType, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let state = health.status.map_or_else(
        || PLACEHOLDER.to_string(),
        |status| paint(status_label(status), status_tone(status)),
    );
    println!("{indent}{name}  {state}");

    if kind != ElementType::HistoricalTimeline {
        return;
    }
    println!(
        "{indent}  30d {}  60d {}  90d {}",
        format_sli(health.uptime_sli_30),
        format_sli(health.uptime_sli_60),
        format_sli(health.uptime_sli_90)
    );
    if !health.timeline.is_empty() {
        println!("{indent}  {}", timeline_bar(health));
    }
}

fn timeline_bar(health: &PublicHealth) -> String {
    let skip = health.timeline.len().saturating_sub(TIMELINE_DAYS);
    health.timeline[skip..]
        .iter()
        .map(|point| paint("■", timeline_tone(point)))
        .collect()
}
