//! Authentication endpoints
//!
//! Session tokens live in the client's cookie jar; these calls only set or
//! renew them.

use super::segment;
use crate::client::{ApiRequest, KnockerClient};
use crate::error::ApiResult;
use crate::models::{LoginRequest, RegisterRequest};
use serde_json::Value;
use tracing::info;

/// Auth API interface
#[derive(Clone)]
pub struct AuthApi {
    client: KnockerClient,
}

impl AuthApi {
    pub(crate) fn new(client: KnockerClient) -> Self {
        Self { client }
    }

    /// Renew the session; concurrent callers share one request
    ///
    /// POST /auth/refresh
    pub async fn refresh(&self) -> bool {
        self.client.refresh_session().await
    }

    /// Sign in with email and password, storing the session cookies
    ///
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post("auth/login")
            .json(&body)?
            .default_error("Failed to log in");

        let value = self.client.send_credentials_value(&request).await?;
        info!(email = %email, "Logged in");
        Ok(message_or(&value, "Logged in"))
    }

    /// Create an account; the API signs the new user in
    ///
    /// POST /auth/register
    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<String> {
        let body = RegisterRequest {
            display_name: display_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post("auth/register")
            .json(&body)?
            .default_error("Failed to register");

        let value = self.client.send_credentials_value(&request).await?;
        Ok(message_or(&value, "Registered"))
    }

    /// URL that starts the OAuth flow with `provider`, returning to `next`
    /// (default `/`) afterwards. Nothing is fetched.
    #[must_use]
    pub fn oauth_url(&self, provider: &str, next: Option<&str>) -> String {
        let path = format!(
            "auth/oauth/{}?next={}",
            segment(provider),
            urlencoding::encode(next.unwrap_or("/"))
        );
        self.client.config().url_for(&path)
    }
}

fn message_or(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    #[test]
    fn test_oauth_url() {
        let client = KnockerClient::with_config(
            ClientConfig::development().with_base_url("https://knocker.test/api"),
        )
        .unwrap();

        assert_eq!(
            client.auth().oauth_url("google", Some("/7/monitors")),
            "https://knocker.test/api/auth/oauth/google?next=%2F7%2Fmonitors"
        );
        assert_eq!(
            client.auth().oauth_url("github", None),
            "https://knocker.test/api/auth/oauth/github?next=%2F"
        );
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(message_or(&json!({"message": "Welcome"}), "x"), "Welcome");
        assert_eq!(message_or(&Value::Null, "Registered"), "Registered");
    }
}
