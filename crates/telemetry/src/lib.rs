//! Logging and API traffic statistics for the Knocker client tools
//!
//! [`init`] installs the tracing subscriber. [`stats`] is a process-wide
//! tally of what the API client did: requests sent, failures, session
//! refreshes and expiries, plus round-trip latencies. Every log line and
//! summary carries a per-process run id.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static STATS: Lazy<ApiStats> = Lazy::new(ApiStats::new);

static RUN_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Logging options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Include the event target
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Preset for `--verbose`
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            log_level: "debug".to_string(),
            show_target: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Install the global subscriber. Logs go to stderr so JSON output on
/// stdout stays clean; `RUST_LOG` wins over `config.log_level`.
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer()
        .with_target(config.show_target)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::debug!(run_id = %run_id(), version = env!("CARGO_PKG_VERSION"), "Logging ready");
    Ok(())
}

/// Id of this process run
pub fn run_id() -> &'static str {
    &RUN_ID
}

/// Something the API client did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEvent {
    /// A request went out, retries included
    Request,
    /// A response had a non-success status
    Failure,
    /// A refresh call was issued to the backend
    Refresh,
    /// A request gave up because the session could not be renewed
    SessionExpired,
}

/// Tally of API traffic for one process
pub struct ApiStats {
    requests: AtomicU64,
    failures: AtomicU64,
    refreshes: AtomicU64,
    expired: AtomicU64,
    latencies_ms: Mutex<Vec<f64>>,
    started_at: DateTime<Utc>,
}

impl ApiStats {
    fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            latencies_ms: Mutex::new(Vec::new()),
            started_at: Utc::now(),
        }
    }

    fn counter(&self, event: ApiEvent) -> &AtomicU64 {
        match event {
            ApiEvent::Request => &self.requests,
            ApiEvent::Failure => &self.failures,
            ApiEvent::Refresh => &self.refreshes,
            ApiEvent::SessionExpired => &self.expired,
        }
    }

    pub fn record(&self, event: ApiEvent) {
        self.counter(event).fetch_add(1, Ordering::Relaxed);
    }

    /// How often `event` happened so far
    pub fn count(&self, event: ApiEvent) -> u64 {
        self.counter(event).load(Ordering::Relaxed)
    }

    fn record_latency(&self, elapsed: Duration) {
        self.latencies_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(elapsed.as_secs_f64() * 1000.0);
    }

    /// Serializable view of the tallies
    pub fn summary(&self) -> StatsSummary {
        let latencies = self
            .latencies_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        StatsSummary {
            run_id: run_id().to_string(),
            started_at: self.started_at,
            requests: self.count(ApiEvent::Request),
            failures: self.count(ApiEvent::Failure),
            refreshes: self.count(ApiEvent::Refresh),
            session_expired: self.count(ApiEvent::SessionExpired),
            latency: LatencySummary::of(latencies),
        }
    }
}

/// Process-wide statistics
pub fn stats() -> &'static ApiStats {
    &STATS
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub requests: u64,
    pub failures: u64,
    pub refreshes: u64,
    pub session_expired: u64,
    pub latency: LatencySummary,
}

/// Round-trip latency in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub samples: usize,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    fn of(mut samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        samples.sort_by(f64::total_cmp);
        Self {
            samples: samples.len(),
            p50_ms: nearest_rank(&samples, 0.50),
            p95_ms: nearest_rank(&samples, 0.95),
            max_ms: samples[samples.len() - 1],
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn nearest_rank(sorted: &[f64], quantile: f64) -> f64 {
    let rank = (quantile * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Measures one request. The latency is recorded by [`finish`], or on drop
/// when the request was abandoned.
///
/// [`finish`]: RequestTimer::finish
pub struct RequestTimer {
    start: Instant,
    recorded: bool,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Record and return the elapsed time
    pub fn finish(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            stats().record_latency(elapsed);
        }
        elapsed
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.record();
    }
}
