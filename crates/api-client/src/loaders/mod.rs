//! Page loaders
//!
//! A loader issues the calls one page needs, joined concurrently where they
//! are independent, and reshapes the results into that page's view model.
//! Failures a page renders itself (a 404 screen, a redirect) come back as
//! [`LoadError::Page`] or [`LoadError::Redirect`]; anything else is the
//! underlying [`ApiError`].

mod home;
mod incidents;
mod layout;
mod monitors;
mod status_pages;

pub use home::{load_home, HomeTarget, NEW_TEAM_PATH};
pub use incidents::{
    load_incident_detail, load_incidents, load_new_incident, monitor_names_by_incident,
    IncidentDetailData, IncidentListItem, NewIncidentData,
};
pub use layout::{load_sidebar, SidebarData};
pub use monitors::{
    load_monitor_create, load_monitor_detail, load_monitor_edit, load_monitor_list,
    monitor_list_item, DerivedStatus, ListIncident, MonitorCreateData, MonitorDetailData,
    MonitorEditData, MonitorListItem,
};
pub use status_pages::{
    load_public_status_page, load_status_page_edit, load_status_pages, StatusPageEditData,
};

use crate::error::ApiError;
use thiserror::Error;

/// Result type alias for loaders
pub type LoadResult<T> = Result<T, LoadError>;

/// Loader failures
#[derive(Error, Debug)]
pub enum LoadError {
    /// The page should render an error screen with this status and text
    #[error("{message}")]
    Page {
        /// HTTP-style status of the error screen
        status: u16,
        /// Text shown on the error screen
        message: String,
    },

    /// The host should navigate to this location instead
    #[error("Redirect to {0}")]
    Redirect(String),

    /// A request failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LoadError {
    /// Create a page error
    pub fn page(status: u16, message: impl Into<String>) -> Self {
        Self::Page {
            status,
            message: message.into(),
        }
    }

    /// Status a host should report for this failure
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Page { status, .. } => *status,
            Self::Redirect(_) => 302,
            Self::Api(e) => e.status().unwrap_or(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(LoadError::page(404, "Team not found").status(), 404);
        assert_eq!(LoadError::Redirect("/auth/login".into()).status(), 302);
        assert_eq!(LoadError::from(ApiError::AuthExpired).status(), 500);
        assert_eq!(
            LoadError::from(ApiError::api_response(403, "Forbidden")).status(),
            403
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadError::page(400, "bad").to_string(), "bad");
        assert_eq!(
            LoadError::from(ApiError::api_response(500, "Failed to fetch teams")).to_string(),
            "Failed to fetch teams"
        );
    }
}
