//! Per-invocation state: configuration, client and output settings

use crate::GlobalArgs;
use anyhow::{anyhow, Context as _, Result};
use knocker_api_client::{ClientConfig, KnockerClient, Navigator};
use knocker_cli::output::format_duration;
use knocker_cli::{progress, OutputFormat, Status};
use knocker_core::config::{Config, ConfigSchema, OutputFormat as ConfiguredFormat};
use std::env;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Navigator for a terminal: there is no login view to open, so the
/// redirect is reported to the user instead
#[derive(Default)]
pub struct TerminalNavigator {
    location: Mutex<String>,
}

impl TerminalNavigator {
    /// Record the dashboard path matching the running command
    pub fn set_location(&self, path: impl Into<String>) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = path.into();
    }
}

impl Navigator for TerminalNavigator {
    fn current_location(&self) -> Option<String> {
        let location = self.location.lock().unwrap_or_else(PoisonError::into_inner);
        (!location.is_empty()).then(|| location.clone())
    }

    fn navigate(&self, target: &str) {
        warn!(target = %target, "Session expired");
        Status::warning(&format!(
            "Session expired. Sign in again with `knocker login` (dashboard: {target})"
        ));
    }
}

pub struct Context {
    pub client: KnockerClient,
    pub format: OutputFormat,
    team: Option<String>,
    credentials: Option<(String, String)>,
    navigator: Arc<TerminalNavigator>,
}

impl Context {
    pub fn new(global: &GlobalArgs, file: Config) -> Result<Self> {
        if let Some(path) = &file.path {
            debug!(path = %path.display(), "Loaded configuration file");
        }

        let config = client_config(global, &file.schema)?;
        let navigator = Arc::new(TerminalNavigator::default());
        let client = KnockerClient::with_config(config)?.with_navigator(navigator.clone());

        let format = global.format.unwrap_or(match file.schema.cli.format {
            ConfiguredFormat::Text => OutputFormat::Text,
            ConfiguredFormat::Json => OutputFormat::Json,
        });

        Ok(Self {
            client,
            format,
            team: global.team.clone().or(file.schema.cli.default_team),
            credentials: global.email.clone().zip(global.password.clone()),
            navigator,
        })
    }

    pub fn is_json(&self) -> bool {
        self.format.is_json()
    }

    /// Selected team id
    pub fn team(&self) -> Result<&str> {
        self.team
            .as_deref()
            .ok_or_else(|| anyhow!("No team selected; pass --team or set cli.default_team"))
    }

    /// Account credentials, if configured
    pub fn credentials(&self) -> Result<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(email, password)| (email.as_str(), password.as_str()))
            .ok_or_else(|| knocker_core::Error::missing_credentials().into())
    }

    /// Sign in with the configured credentials so the session cookies are
    /// in place, and remember `location` as the page being viewed.
    ///
    /// Without credentials the command runs unauthenticated and fails with
    /// an expired session if the API requires one.
    pub async fn authenticate(&self, location: impl Into<String>) -> Result<()> {
        self.navigator.set_location(location);

        let Some((email, password)) = &self.credentials else {
            debug!("No credentials configured; continuing without signing in");
            return Ok(());
        };
        self.client
            .auth()
            .login(email, password)
            .await
            .context("Could not sign in")?;
        info!(email = %email, "Signed in");
        Ok(())
    }

    /// Await `future` behind a spinner, hidden for JSON output
    pub async fn spin<F: Future>(&self, message: &str, future: F) -> F::Output {
        let pb = progress::spinner(message, self.is_json());
        let started = Instant::now();
        let output = future.await;
        progress::finish(&pb);
        debug!(elapsed = %format_duration(started.elapsed()), "{message}");
        output
    }
}

/// Client configuration layered as flag/env, then config file, then the
/// environment defaults
fn client_config(global: &GlobalArgs, schema: &ConfigSchema) -> Result<ClientConfig> {
    let config = ClientConfig::from_lookup(|name| match name {
        "KNOCKER_API_BASE" => global
            .api_base
            .clone()
            .or_else(|| schema.api.base_url.clone()),
        "KNOCKER_TIMEOUT_SECS" => env::var(name)
            .ok()
            .or_else(|| schema.api.timeout_secs.map(|s| s.to_string())),
        _ => env::var(name).ok(),
    })?;
    Ok(config)
}
