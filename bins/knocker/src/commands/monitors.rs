//! Monitor commands

use super::{emit, ensure_valid};
use crate::context::Context;
use anyhow::Result;
use clap::{Args, Subcommand};
use knocker_api_client::format::{
    format_frequency, format_sli, format_up_to_2_decimals, region_flag_emoji, relative_time,
    PLACEHOLDER,
};
use knocker_api_client::forms::validate_monitor;
use knocker_api_client::loaders::{
    load_monitor_create, load_monitor_detail, load_monitor_edit, load_monitor_list,
    DerivedStatus, MonitorDetailData,
};
use knocker_api_client::format::Tone;
use knocker_api_client::models::{
    AnalyticsSummary, HttpMethod, HttpMonitorConfig, MonitorConfig, MonitorUpsertRequest,
    PingMonitorConfig,
};
use knocker_cli::output::format_count;
use knocker_cli::{paint, Status, Table};
use knocker_core::monitor_settings::{
    format_headers, normalize_status_codes, parse_headers, BODY_ENCODINGS, HTTP_METHODS,
    INTERVAL_OPTIONS, STATUS_CODES, STATUS_RANGE_OPTIONS, THRESHOLD_OPTIONS,
};
use serde_json::json;

#[derive(Subcommand, Debug, Clone, Default)]
pub enum MonitorsCommand {
    /// List monitors with their current health
    #[default]
    List,

    /// Show uptime and latency of a monitor
    Show {
        /// Monitor id
        id: String,
    },

    /// Create a monitor
    Create(CreateArgs),

    /// Change a monitor's name, interval or thresholds
    Update(UpdateArgs),

    /// Delete a monitor
    Delete {
        /// Monitor id
        id: String,
    },

    /// Show the intervals, thresholds and status codes monitors accept
    Options,
}

#[derive(Args, Debug, Clone)]
#[command(group = clap::ArgGroup::new("target").required(true).args(["url", "host"]))]
pub struct CreateArgs {
    /// Monitor name
    #[arg(long)]
    pub name: String,

    /// URL for an HTTP check
    #[arg(long)]
    pub url: Option<String>,

    /// Host for a ping check
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP method
    #[arg(long, default_value = "GET")]
    pub method: HttpMethod,

    /// Accepted status codes or classes such as `2xx`
    #[arg(long = "status-code", default_value = "2xx")]
    pub status_codes: Vec<String>,

    /// Request header as `Key: Value`
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Seconds before a check is abandoned
    #[arg(long, default_value_t = 30)]
    pub timeout: u32,

    /// Redirects to follow
    #[arg(long, default_value_t = 10)]
    pub max_redirects: u32,

    /// Seconds between checks
    #[arg(long, default_value_t = 60)]
    pub interval: i32,

    /// Failed checks before the monitor is considered down
    #[arg(long, default_value_t = 3)]
    pub failure_threshold: i16,

    /// Passing checks before the monitor is considered up again
    #[arg(long, default_value_t = 1)]
    pub recovery_threshold: i16,

    /// Region id to check from (repeatable)
    #[arg(long = "region")]
    pub regions: Vec<String>,

    /// Notification channel id (repeatable)
    #[arg(long = "notification")]
    pub notifications: Vec<String>,
}

impl CreateArgs {
    fn config(&self) -> MonitorConfig {
        match (&self.url, &self.host) {
            (Some(url), _) => MonitorConfig::Http(HttpMonitorConfig {
                url: url.trim().to_string(),
                method: self.method,
                max_redirects: self.max_redirects,
                request_timeout: self.timeout,
                headers: parse_headers(Some(&self.headers.join("\n"))).unwrap_or_default(),
                accepted_status_codes: normalize_status_codes(&self.status_codes),
                ..HttpMonitorConfig::default()
            }),
            (None, host) => MonitorConfig::Ping(PingMonitorConfig {
                host: host.as_deref().unwrap_or_default().trim().to_string(),
                timeout_seconds: self.timeout,
                packet_size: None,
            }),
        }
    }

    fn request(&self) -> MonitorUpsertRequest {
        MonitorUpsertRequest {
            name: self.name.trim().to_string(),
            config: self.config(),
            interval: self.interval,
            failure_threshold: self.failure_threshold,
            recovery_threshold: self.recovery_threshold,
            regions: self.regions.clone(),
            notification: self.notifications.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Monitor id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Seconds between checks
    #[arg(long)]
    pub interval: Option<i32>,

    #[arg(long)]
    pub failure_threshold: Option<i16>,

    #[arg(long)]
    pub recovery_threshold: Option<i16>,
}

fn status_tone(status: DerivedStatus) -> Tone {
    match status {
        DerivedStatus::Operational => Tone::Success,
        DerivedStatus::Degraded | DerivedStatus::Down => Tone::Destructive,
        DerivedStatus::Paused => Tone::Muted,
    }
}

pub async fn run(ctx: &Context, command: MonitorsCommand) -> Result<()> {
    if matches!(command, MonitorsCommand::Options) {
        return print_options(ctx);
    }
    let team = ctx.team()?;

    match command {
        MonitorsCommand::List => {
            let location = format!("/{team}/monitors");
            ctx.authenticate(location.as_str()).await?;
            let rows = ctx
                .spin("Fetching monitors", load_monitor_list(&ctx.client, team, &location))
                .await?;

            emit(ctx, &rows, |rows| {
                let mut table = Table::new([
                    "ID", "NAME", "TYPE", "TARGET", "STATUS", "FREQUENCY", "CHECKED", "LAST INCIDENT",
                ]);
                for row in rows {
                    table.row([
                        row.id.clone(),
                        row.name.clone(),
                        row.kind.clone(),
                        row.target.clone(),
                        paint(row.status.as_str(), status_tone(row.status)),
                        row.frequency.clone(),
                        row.last_checked.clone(),
                        row.last_incident.clone(),
                    ]);
                }
                table.print();
                Status::info(&format_count(rows.len(), "monitor", "monitors"));

                for incident in rows.iter().filter_map(|row| row.incident.as_ref()) {
                    Status::warning(&format!("{} (updated {})", incident.summary, incident.updated_at));
                }
            })
        }
        MonitorsCommand::Show { id } => {
            ctx.authenticate(format!("/{team}/monitors/{id}")).await?;
            let detail = ctx
                .spin("Fetching analytics", load_monitor_detail(&ctx.client, team, &id))
                .await?;
            emit(ctx, &detail, print_detail)
        }
        MonitorsCommand::Create(args) => {
            ctx.authenticate(format!("/{team}/monitors/new")).await?;
            let request = args.request();
            ensure_valid(validate_monitor(&request))?;

            let options = load_monitor_create(&ctx.client, team).await?;
            for id in &request.notification {
                if !options.notifications.iter().any(|n| &n.id == id) {
                    Status::warning(&format!("Notification channel {id} is not known to this team"));
                }
            }

            let monitor = ctx
                .spin("Creating monitor", ctx.client.monitors().create(team, &request))
                .await?;
            emit(ctx, &monitor, |monitor| {
                Status::success(&format!(
                    "Created {} monitor {} ({}) for {}",
                    monitor.kind().label(),
                    monitor.name,
                    monitor.id,
                    monitor.target()
                ));
            })
        }
        MonitorsCommand::Update(args) => {
            ctx.authenticate(format!("/{team}/monitors/{}/edit", args.id)).await?;
            let data = ctx
                .spin("Fetching monitor", load_monitor_edit(&ctx.client, team, Some(&args.id)))
                .await?;

            let mut request = MonitorUpsertRequest::from(&data.monitor);
            if let Some(name) = args.name {
                request.name = name.trim().to_string();
            }
            if let Some(interval) = args.interval {
                request.interval = interval;
            }
            if let Some(threshold) = args.failure_threshold {
                request.failure_threshold = threshold;
            }
            if let Some(threshold) = args.recovery_threshold {
                request.recovery_threshold = threshold;
            }
            ensure_valid(validate_monitor(&request))?;

            let monitor = ctx
                .spin("Saving monitor", ctx.client.monitors().update(team, &args.id, &request))
                .await?;
            emit(ctx, &monitor, |monitor| {
                Status::success(&format!(
                    "Updated monitor {} ({})",
                    monitor.name,
                    format_frequency(Some(i64::from(monitor.interval)))
                ));
            })
        }
        MonitorsCommand::Delete { id } => {
            ctx.authenticate(format!("/{team}/monitors")).await?;
            let message = ctx
                .spin("Deleting monitor", ctx.client.monitors().delete(team, &id))
                .await?;
            emit(ctx, &serde_json::json!({ "message": message }), |_| {
                Status::success(&format!("Deleted monitor {id}"));
            })
        }
        MonitorsCommand::Options => print_options(ctx),
    }
}

fn print_options(ctx: &Context) -> Result<()> {
    let options = json!({
        "intervals": INTERVAL_OPTIONS
            .iter()
            .map(|o| json!({ "label": o.label, "seconds": o.seconds }))
            .collect::<Vec<_>>(),
        "thresholds": THRESHOLD_OPTIONS
            .iter()
            .map(|o| json!({ "label": o.label, "value": o.value }))
            .collect::<Vec<_>>(),
        "methods": HTTP_METHODS,
        "bodyEncodings": BODY_ENCODINGS.iter().map(|o| o.value).collect::<Vec<_>>(),
        "statusRanges": STATUS_RANGE_OPTIONS.iter().map(|o| o.value).collect::<Vec<_>>(),
        "statusCodes": STATUS_CODES
            .iter()
            .map(|c| json!({ "code": c.code, "label": c.label }))
            .collect::<Vec<_>>(),
    });

    emit(ctx, &options, |_| {
        let labels = |items: Vec<&str>| items.join(", ");
        Status::header("Monitor options");
        Status::field(
            "Intervals",
            &labels(INTERVAL_OPTIONS.iter().map(|o| o.label).collect()),
        );
        Status::field(
            "Thresholds",
            &labels(THRESHOLD_OPTIONS.iter().map(|o| o.label).collect()),
        );
        Status::field("Methods", &HTTP_METHODS.join(", "));
        Status::field(
            "Body encodings",
            &labels(
                BODY_ENCODINGS
                    .iter()
                    .filter(|o| !o.value.is_empty())
                    .map(|o| o.value)
                    .collect(),
            ),
        );
        Status::field(
            "Status ranges",
            &labels(STATUS_RANGE_OPTIONS.iter().map(|o| o.value).collect()),
        );

        let mut table = Table::new(["CODE", "REASON"]);
        for entry in STATUS_CODES {
            table.row([entry.code.to_string(), entry.label.to_string()]);
        }
        println!();
        table.print();
    })
}

/// Uptime of a summary, or the placeholder when nothing was checked
fn uptime(summary: &AnalyticsSummary) -> String {
    format_sli((summary.total_count > 0).then_some(summary.uptime_pct))
}

fn latency(summary: &AnalyticsSummary, ms: f64) -> String {
    if summary.total_count == 0 {
        PLACEHOLDER.to_string()
    } else {
        format!("{} ms", format_up_to_2_decimals(ms))
    }
}

fn print_detail(detail: &MonitorDetailData) {
    let analytics = &detail.analytics;
    let monitor = &analytics.monitor;
    let now = chrono::Utc::now();

    Status::header(&monitor.name);
    Status::field("Type", monitor.kind().label());
    Status::field("Target", monitor.target());
    if let MonitorConfig::Http(http) = &monitor.config {
        Status::field("Method", http.method.as_str());
        if !http.headers.is_empty() {
            Status::field("Headers", &format_headers(&http.headers).replace('\n', ", "));
        }
    }
    Status::field("Frequency", &format_frequency(Some(i64::from(monitor.interval))));
    Status::field("Last checked", &relative_time(monitor.last_checked.as_ref(), now));
    Status::field("Uptime", &uptime(&analytics.summary));
    Status::field("p95 latency", &latency(&analytics.summary, analytics.summary.p95_ms));

    let mut table = Table::new(["REGION", "", "UPTIME", "P50", "P95", "CHECKS"]);
    for entry in &analytics.regions {
        let region = detail.regions.iter().find(|r| r.id == entry.region_id);
        let name = region.map_or(entry.region_id.as_str(), |r| r.display_name.as_str());
        let flag = region
            .and_then(|r| region_flag_emoji(&r.name))
            .unwrap_or_default();
        table.row([
            name.to_string(),
            flag,
            uptime(&entry.summary),
            latency(&entry.summary, entry.summary.p50_ms),
            latency(&entry.summary, entry.summary.p95_ms),
            entry.summary.total_count.to_string(),
        ]);
    }
    if !table.is_empty() {
        println!();
        table.print();
    }

    let open: Vec<_> = analytics.incidents.iter().filter(|i| i.is_active()).collect();
    if !open.is_empty() {
        println!();
        for incident in open {
            Status::warning(&format!(
                "Incident {} {} since {}",
                incident.id,
                incident.status,
                relative_time(Some(&incident.started_at), now)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: MonitorsCommand,
    }

    fn create(args: &[&str]) -> CreateArgs {
        let argv = ["knocker", "create"].iter().chain(args).copied();
        match Harness::try_parse_from(argv).unwrap().command {
            MonitorsCommand::Create(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_http_create_request() {
        let args = create(&[
            "--name", " API ", "--url", "https://example.com/health", "--status-code", "2xx",
            "--status-code", "404", "--header", "X-Trace: 1", "--region", "1",
        ]);
        let request = args.request();

        assert_eq!(request.name, "API");
        let MonitorConfig::Http(config) = &request.config else {
            panic!("expected an HTTP config");
        };
        assert_eq!(config.method, HttpMethod::Get);
        assert!(config.accepted_status_codes.contains(&200));
        assert_eq!(config.accepted_status_codes.last(), Some(&404));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert!(validate_monitor(&request).is_valid());
    }

    #[test]
    fn test_ping_create_request() {
        let args = create(&["--name", "DNS", "--host", "1.1.1.1", "--timeout", "5"]);
        let request = args.request();

        assert_eq!(
            request.config,
            MonitorConfig::Ping(PingMonitorConfig {
                host: "1.1.1.1".to_string(),
                timeout_seconds: 5,
                packet_size: None,
            })
        );
        let result = validate_monitor(&request);
        assert_eq!(result.message_for("regions"), Some("Select at least one region"));
    }

    #[test]
    fn test_target_is_required() {
        let argv = ["knocker", "create", "--name", "x"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(status_tone(DerivedStatus::Down), Tone::Destructive);
        assert_eq!(status_tone(DerivedStatus::Paused), Tone::Muted);
    }
}
