//! Login redirect on expired sessions
//!
//! A host that can show a login view (a browser shell, a terminal UI)
//! implements [`Navigator`] and attaches it to the client. Hosts without a
//! navigator only receive [`crate::ApiError::AuthExpired`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Path of the login view
pub const LOGIN_PATH: &str = "/auth/login";

/// Host-side navigation hooks
pub trait Navigator: Send + Sync {
    /// Current location as path + query + fragment, if known
    fn current_location(&self) -> Option<String>;

    /// Replace the current location with `target`
    fn navigate(&self, target: &str);
}

/// Build the login target carrying `next` as the return path
#[must_use]
pub fn login_redirect_target(next: &str) -> String {
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(next))
}

/// Issues at most one login redirect for the lifetime of a client
#[derive(Default)]
pub(crate) struct LoginRedirect {
    navigator: Option<Arc<dyn Navigator>>,
    redirecting: AtomicBool,
}

impl LoginRedirect {
    pub(crate) fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator: Some(navigator),
            redirecting: AtomicBool::new(false),
        }
    }

    /// Navigate to the login view unless there is no navigator or a redirect
    /// was already issued. Returns whether this call navigated.
    pub(crate) fn trigger(&self) -> bool {
        let Some(navigator) = &self.navigator else {
            return false;
        };
        if self.redirecting.swap(true, Ordering::SeqCst) {
            return false;
        }

        let next = navigator
            .current_location()
            .unwrap_or_else(|| "/".to_string());
        let target = login_redirect_target(&next);
        info!(target = %target, "Redirecting to login");
        navigator.navigate(&target);
        true
    }

    pub(crate) fn is_redirecting(&self) -> bool {
        self.redirecting.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        location: Option<String>,
        visits: Mutex<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn current_location(&self) -> Option<String> {
            self.location.clone()
        }

        fn navigate(&self, target: &str) {
            self.visits.lock().unwrap().push(target.to_string());
        }
    }

    #[test]
    fn test_target_encodes_next() {
        assert_eq!(
            login_redirect_target("/42/monitors?tab=all#top"),
            "/auth/login?next=%2F42%2Fmonitors%3Ftab%3Dall%23top"
        );
    }

    #[test]
    fn test_redirects_once() {
        let recorder = Arc::new(Recorder {
            location: Some("/7/incidents".to_string()),
            visits: Mutex::new(Vec::new()),
        });
        let redirect = LoginRedirect::new(recorder.clone());

        assert!(redirect.trigger());
        assert!(!redirect.trigger());
        assert!(redirect.is_redirecting());
        assert_eq!(
            *recorder.visits.lock().unwrap(),
            vec!["/auth/login?next=%2F7%2Fincidents".to_string()]
        );
    }

    #[test]
    fn test_no_navigator_is_a_no_op() {
        let redirect = LoginRedirect::default();
        assert!(!redirect.trigger());
        assert!(!redirect.is_redirecting());
    }
}
