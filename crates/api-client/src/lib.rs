//! Client for the Knocker monitoring API
//!
//! This crate talks to the Knocker backend on behalf of the dashboard and the
//! `knocker` command line tool: teams, monitors, incidents, notification
//! channels, regions and status pages.
//!
//! # Features
//!
//! - **Cookie sessions**: the credentialed client keeps the session cookies;
//!   a 401 triggers one shared session refresh and a single retry
//! - **Login redirect**: an attached [`Navigator`] is sent to the login view
//!   once when the session cannot be renewed
//! - **Public access**: status pages are fetched without cookies
//! - **Key normalization**: snake_case payloads are re-keyed to camelCase
//! - **Page loaders**: concurrent fetches reshaped into view models
//! - **Form validation**: field-path errors for monitor, status page and
//!   credential input
//!
//! # Example
//!
//! ```rust,no_run
//! use knocker_api_client::{ClientConfig, KnockerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KnockerClient::with_config(ClientConfig::development())?;
//!
//!     client.auth().login("ops@example.com", "correct horse").await?;
//!     for team in client.teams().list().await? {
//!         let monitors = client.monitors().list(&team.id).await?;
//!         println!("{}: {} monitors", team.name, monitors.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod casing;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod forms;
pub mod loaders;
pub mod models;
pub mod navigation;
pub mod single_flight;

pub use client::{ApiRequest, KnockerClient};
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult};
pub use loaders::{LoadError, LoadResult};
pub use navigation::Navigator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{ApiRequest, KnockerClient};
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{
        AuthApi, IncidentsApi, MonitorsApi, NotificationsApi, RegionsApi, StatusPagesApi,
        TeamsApi, UsersApi,
    };
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::loaders::{LoadError, LoadResult};
    pub use crate::navigation::Navigator;
}
