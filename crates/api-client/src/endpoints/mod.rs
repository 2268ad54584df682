//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one backend resource. Every
//! operation is a single request with a fixed verb, path and failure text.
//!
//! | Module | Paths |
//! |--------|-------|
//! | `auth` | `auth/refresh`, `auth/login`, `auth/register`, `auth/oauth/:provider` |
//! | `teams` | `teams`, `teams/:team` |
//! | `users` | `users/me` |
//! | `regions` | `regions` |
//! | `monitors` | `teams/:team/monitors[/:id[/analytics]]` |
//! | `incidents` | `teams/:team/incidents[/:id[/status\|/events]]` |
//! | `notifications` | `teams/:team/notifications[/:id[/test]]` |
//! | `status_pages` | `teams/:team/status-pages[/:id]`, public `status-pages/:slug` |

pub mod auth;
pub mod incidents;
pub mod monitors;
pub mod notifications;
pub mod regions;
pub mod status_pages;
pub mod teams;
pub mod users;

pub use auth::AuthApi;
pub use incidents::IncidentsApi;
pub use monitors::MonitorsApi;
pub use notifications::NotificationsApi;
pub use regions::RegionsApi;
pub use status_pages::StatusPagesApi;
pub use teams::TeamsApi;
pub use users::UsersApi;

use std::borrow::Cow;

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
