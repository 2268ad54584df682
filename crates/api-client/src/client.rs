//! Main API client implementation

use crate::casing::normalize_keys_with;
use crate::config::ClientConfig;
use crate::endpoints::{
    AuthApi, IncidentsApi, MonitorsApi, NotificationsApi, RegionsApi, StatusPagesApi, TeamsApi,
    UsersApi,
};
use crate::error::{ApiError, ApiResult};
use crate::models::Envelope;
use crate::navigation::{LoginRedirect, Navigator};
use crate::single_flight::SingleFlight;
use knocker_telemetry::{stats, ApiEvent, RequestTimer};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Path of the session refresh endpoint
pub const REFRESH_PATH: &str = "auth/refresh";

/// Default failure text when a caller supplies none
pub const DEFAULT_ERROR: &str = "Request failed";

/// One API call: verb, path relative to the base URL, optional JSON body,
/// extra headers and the failure text used when the API rejects it
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: HeaderMap,
    default_error: Cow<'static, str>,
}

impl ApiRequest {
    /// Create a request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            default_error: Cow::Borrowed(DEFAULT_ERROR),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// PATCH request
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body. A body serializing to `null` counts as no body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body)?;
        self.body = (!value.is_null()).then_some(value);
        Ok(self)
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::config(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::config(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the failure text
    #[must_use]
    pub fn default_error(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.default_error = message.into();
        self
    }

    /// Request method
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Knocker API client
///
/// Two HTTP clients share one configuration: the credentialed one keeps the
/// session cookies in a jar, the public one never sends or stores cookies.
/// A 401 on the credentialed path triggers one shared session refresh and a
/// single retry of the original request.
#[derive(Clone)]
pub struct KnockerClient {
    http: Client,
    public_http: Client,
    config: Arc<ClientConfig>,
    refresh: Arc<SingleFlight<&'static str, bool>>,
    redirect: Arc<LoginRedirect>,
}

impl std::fmt::Debug for KnockerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnockerClient")
            .field("base_url", &self.config.base_url)
            .field("redirecting", &self.redirect.is_redirecting())
            .finish_non_exhaustive()
    }
}

impl KnockerClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ApiError::config(format!("invalid user agent: {e}")))?,
        );

        let mut builder = Client::builder()
            .cookie_store(true)
            .default_headers(default_headers.clone());
        let mut public_builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
            public_builder = public_builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            public_http: public_builder.build()?,
            config: Arc::new(config),
            refresh: Arc::new(SingleFlight::new()),
            redirect: Arc::new(LoginRedirect::default()),
        })
    }

    /// Attach a navigator that is sent to the login view when the session
    /// cannot be renewed
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.redirect = Arc::new(LoginRedirect::new(navigator));
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether a login redirect has been issued
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.redirect.is_redirecting()
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access authentication endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access team endpoints
    #[must_use]
    pub fn teams(&self) -> TeamsApi {
        TeamsApi::new(self.clone())
    }

    /// Access user endpoints
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access region endpoints
    #[must_use]
    pub fn regions(&self) -> RegionsApi {
        RegionsApi::new(self.clone())
    }

    /// Access monitor endpoints
    #[must_use]
    pub fn monitors(&self) -> MonitorsApi {
        MonitorsApi::new(self.clone())
    }

    /// Access incident endpoints
    #[must_use]
    pub fn incidents(&self) -> IncidentsApi {
        IncidentsApi::new(self.clone())
    }

    /// Access notification channel endpoints
    #[must_use]
    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    /// Access status page endpoints
    #[must_use]
    pub fn status_pages(&self) -> StatusPagesApi {
        StatusPagesApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Request execution
    // -------------------------------------------------------------------------

    /// Send an authenticated request and return the normalized body
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path, request_id))]
    pub async fn send_value(&self, request: &ApiRequest) -> ApiResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let (status, body) = self.execute(&self.http, request, &request_id).await?;

        if status == StatusCode::UNAUTHORIZED {
            debug!(request_id = %request_id, "Received 401, renewing session");
            if !self.refresh_session().await {
                return Err(self.auth_expired());
            }

            let (retry_status, retry_body) = self.execute(&self.http, request, &request_id).await?;
            if !retry_status.is_success() {
                warn!(
                    request_id = %request_id,
                    status = retry_status.as_u16(),
                    "Retry after session renewal failed"
                );
                return Err(self.auth_expired());
            }
            return Ok(self.normalize(retry_body));
        }

        self.classify(status, body, &request.default_error)
    }

    /// Send a credential-free request and return the normalized body.
    ///
    /// Any non-success status fails immediately; there is no session renewal.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path, request_id))]
    pub async fn send_public_value(&self, request: &ApiRequest) -> ApiResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let (status, body) = self.execute(&self.public_http, request, &request_id).await?;
        self.classify(status, body, &request.default_error)
    }

    /// Send a credentialed request without session renewal. A 401 here
    /// means the credentials were rejected, not that the session expired.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path, request_id))]
    pub async fn send_credentials_value(&self, request: &ApiRequest) -> ApiResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let (status, body) = self.execute(&self.http, request, &request_id).await?;
        self.classify(status, body, &request.default_error)
    }

    /// Send an authenticated request and decode the normalized body
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let value = self.send_value(request).await?;
        decode(&request.path, value)
    }

    /// Send a credential-free request and decode the normalized body
    pub async fn send_public<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let value = self.send_public_value(request).await?;
        decode(&request.path, value)
    }

    /// Send an authenticated request and return the envelope's `data`
    pub(crate) async fn data<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let envelope: Envelope<T> = self.send(request).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::MissingData(request.path.clone()))
    }

    /// Like [`Self::data`], treating a missing or null `data` as an empty list
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> ApiResult<Vec<T>> {
        let envelope: Envelope<Vec<T>> = self.send(request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Send a credential-free request and return the envelope's `data`
    pub(crate) async fn public_data<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> ApiResult<T> {
        let envelope: Envelope<T> = self.send_public(request).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::MissingData(request.path.clone()))
    }

    /// Send an authenticated request and return the envelope's `message`
    pub(crate) async fn message(&self, request: &ApiRequest) -> ApiResult<String> {
        let envelope: Envelope<Value> = self.send(request).await?;
        Ok(envelope.message.unwrap_or_default())
    }

    /// Renew the session cookies.
    ///
    /// Concurrent callers share one `POST auth/refresh`; the outcome is
    /// whether the API answered with a success status. Transport failures
    /// count as a failed renewal.
    pub async fn refresh_session(&self) -> bool {
        let http = self.http.clone();
        let url = self.config.url_for(REFRESH_PATH);

        self.refresh
            .run(REFRESH_PATH, move || async move {
                stats().record(ApiEvent::Refresh);
                match http.post(&url).send().await {
                    Ok(response) => {
                        let ok = response.status().is_success();
                        debug!(status = response.status().as_u16(), ok, "Session refresh settled");
                        ok
                    }
                    Err(e) => {
                        warn!(error = %e, "Session refresh request failed");
                        false
                    }
                }
            })
            .await
    }

    fn auth_expired(&self) -> ApiError {
        stats().record(ApiEvent::SessionExpired);
        self.redirect.trigger();
        ApiError::AuthExpired
    }

    fn normalize(&self, body: Value) -> Value {
        normalize_keys_with(body, &self.config.preserve_keys)
    }

    fn classify(&self, status: StatusCode, body: Value, default_error: &str) -> ApiResult<Value> {
        if status.is_success() {
            Ok(self.normalize(body))
        } else {
            stats().record(ApiEvent::Failure);
            Err(ApiError::from_response(status.as_u16(), &body, default_error))
        }
    }

    /// Issue one HTTP exchange. The body is parsed as JSON best-effort; an
    /// empty or malformed body becomes `null`.
    async fn execute(
        &self,
        http: &Client,
        request: &ApiRequest,
        request_id: &str,
    ) -> ApiResult<(StatusCode, Value)> {
        let url = self.config.url_for(&request.path);
        let mut builder = http
            .request(request.method.clone(), &url)
            .header(X_REQUEST_ID, request_id)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        stats().record(ApiEvent::Request);
        let timer = RequestTimer::start();
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();
        let elapsed = timer.finish();

        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "Response received"
        );

        Ok((status, serde_json::from_slice(&bytes).unwrap_or(Value::Null)))
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = KnockerClient::with_config(ClientConfig::development());
        assert!(client.is_ok());
        assert!(!client.unwrap().is_redirecting());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::development().with_base_url("localhost:8000");
        assert!(matches!(
            KnockerClient::with_config(config),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_null_body_is_no_body() {
        let request = ApiRequest::post("teams").json(&Option::<u8>::None).unwrap();
        assert!(request.body.is_none());

        let request = ApiRequest::post("teams").json(&json!({"name": "ops"})).unwrap();
        assert_eq!(request.body, Some(json!({"name": "ops"})));
    }

    #[test]
    fn test_request_defaults() {
        let request = ApiRequest::get("regions");
        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.path(), "regions");
        assert_eq!(request.default_error, DEFAULT_ERROR);
    }

    #[test]
    fn test_invalid_header_rejected() {
        assert!(ApiRequest::get("x").header("bad header", "v").is_err());
        assert!(ApiRequest::get("x").header("X-Trace", "abc").is_ok());
    }
}
