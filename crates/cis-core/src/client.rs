//! HTTP service client, retry logic and request deadlines.
//!
//! [`ServiceClient`] is the transport shared by every CIS service crate. It owns the
//! `reqwest` client, the base URL, the authenticator and the retry policy, and turns a
//! [`ServiceRequest`] into a decoded [`DetailedResponse`].

use crate::auth::Authenticator;
use crate::config::{parse_service_url, ConfigSource, ExternalConfig, ServiceOptions};
use crate::error::{Error, Result, DEADLINE_EXCEEDED};
use crate::query::QueryParams;
use crate::response::{DetailedResponse, RawResponse};
use crate::types::{CisService, DEFAULT_SERVICE_URL};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};
use url::Url;

// Service-specific timeout configurations (in seconds)

/// Default timeout for global load balancer requests
pub const GLOBAL_LOAD_BALANCER_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for range application requests
pub const RANGE_APPLICATIONS_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for zone lockdown requests
pub const ZONE_LOCKDOWN_DEFAULT_TIMEOUT: u64 = 20;

/// Connect timeout applied to every service client
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default maximum retry delay in seconds (cap for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_SECS: u64 = 30;

/// Default `User-Agent` of core clients
pub const DEFAULT_USER_AGENT: &str = concat!("cis-core/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
///
/// Requests are retried on transport failures and on HTTP 429, 502, 503 and 504.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_RETRY_MAX_DELAY_SECS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Create a policy from a retry count and maximum interval.
    ///
    /// Zero values select the defaults.
    #[must_use]
    pub const fn with_limits(max_retries: u32, max_interval: Duration) -> Self {
        let mut policy = Self::new();
        if max_retries > 0 {
            policy.max_retries = max_retries;
        }
        if !max_interval.is_zero() {
            policy.max_delay = max_interval;
        }
        policy
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * multiplier^(attempt-1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let delay = self.initial_delay.saturating_mul(multiplier);

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
///
/// Retries are disabled unless a retry policy is set explicitly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-attempt transport timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Accept gzip-compressed responses
    pub enable_compression: bool,

    /// Skip TLS certificate verification
    pub disable_ssl: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::no_retry(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            disable_ssl: false,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable response compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate verification bypass.
    #[must_use]
    pub const fn with_disable_ssl(mut self, disabled: bool) -> Self {
        self.disable_ssl = disabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call context carrying an optional deadline.
///
/// The deadline bounds the whole call, retries and backoff included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context without deadline.
    #[must_use]
    pub const fn background() -> Self {
        Self { deadline: None }
    }

    /// A context expiring after `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context expiring at `deadline`.
    #[must_use]
    pub const fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

/// A single operation to send through a [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    method: Method,
    operation: &'static str,
    path: Vec<String>,
    query: Vec<(&'static str, String)>,
    headers: HashMap<String, String>,
    body: Option<serde_json::Value>,
}

impl ServiceRequest {
    /// Start a request for the named operation.
    #[must_use]
    pub fn new(method: Method, operation: &'static str) -> Self {
        Self {
            method,
            operation,
            path: Vec::new(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Append path segments; each segment is percent-encoded.
    #[must_use]
    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Set query parameters.
    #[must_use]
    pub fn with_query(mut self, params: QueryParams) -> Self {
        self.query = params.into_pairs();
        self
    }

    /// Add caller-supplied headers; they override defaults.
    #[must_use]
    pub fn with_headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body cannot be encoded.
    pub fn with_json_body<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Operation name used in logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Path segments below the base URL.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Query pairs.
    #[must_use]
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::ValidationError(format!("Invalid header name `{name}`: {e}")))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                Error::ValidationError(format!("Invalid value for header `{name}`: {e}"))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: CisService,
    base_url: Option<Url>,
    authenticator: Option<Arc<Authenticator>>,
    http_config: ClientConfig,
    user_agent: String,
}

impl ServiceClientBuilder {
    /// Create a builder for a service and base URL.
    ///
    /// An empty URL leaves the client without a base URL; every call then fails
    /// with [`Error::ServiceUrlMissing`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn new(service: CisService, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = match base_url.as_ref() {
            "" => None,
            url => Some(parse_service_url(url)?),
        };

        Ok(Self {
            service,
            base_url,
            authenticator: None,
            http_config: ClientConfig::new().with_timeout(service.default_timeout()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Create a builder from explicit service options.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing CRN or zone, an authentication error
    /// when no authenticator is set, and an endpoint error for a malformed URL.
    pub fn from_options(service: CisService, options: ServiceOptions) -> Result<Self> {
        options.scope()?;
        let authenticator = options.authenticator.ok_or_else(|| {
            Error::Authentication(format!("{service} requires an authenticator"))
        })?;
        let url = options.url.as_deref().unwrap_or(DEFAULT_SERVICE_URL);
        Ok(Self::new(service, url)?.with_authenticator(authenticator))
    }

    /// Create a builder from external configuration, overlaid by explicit options.
    ///
    /// The external source supplies the URL and transport settings; an explicit URL
    /// in `options` takes precedence. Credentials are read from the source only when
    /// `options` carries no authenticator.
    ///
    /// # Errors
    ///
    /// See [`ServiceClientBuilder::from_options`], [`ExternalConfig::load`] and
    /// [`ExternalConfig::load_authenticator`].
    pub fn from_config_source(
        service: CisService,
        mut options: ServiceOptions,
        source: &dyn ConfigSource,
    ) -> Result<Self> {
        options.scope()?;
        let external = ExternalConfig::load(service, source)?;

        if options.authenticator.is_none() {
            options.authenticator = Some(ExternalConfig::load_authenticator(service, source)?);
        }
        if options.url.is_none() {
            options.url = external.url.clone();
        }

        let mut builder = Self::from_options(service, options)?;
        builder.http_config = builder.http_config.with_disable_ssl(external.disable_ssl);
        if let Some(enabled) = external.enable_gzip {
            builder.http_config = builder.http_config.with_compression(enabled);
        }
        if external.enable_retries {
            builder.http_config.retry_policy =
                RetryPolicy::with_limits(external.max_retries, external.retry_interval());
        }
        Ok(builder)
    }

    /// Set the authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Replace the HTTP client configuration.
    ///
    /// Every field is replaced, including the per-service default timeout and any
    /// retry, TLS or compression settings loaded from external configuration. Call
    /// [`ServiceClientBuilder::with_retry_policy`] afterwards to adjust retries only.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an authentication error for missing or incomplete credentials and a
    /// configuration error if the HTTP client cannot be created.
    pub fn build(self) -> Result<ServiceClient> {
        let authenticator = self.authenticator.ok_or_else(|| {
            Error::Authentication(format!("{} requires an authenticator", self.service))
        })?;
        authenticator.validate()?;

        let config = &self.http_config;
        let mut builder = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression);

        if config.disable_ssl {
            warn!(service = %self.service, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!(
                "Failed to build {} HTTP client: {err}",
                self.service
            ))
        })?;

        info!(
            service = %self.service,
            base_url = ?self.base_url.as_ref().map(Url::as_str),
            auth_type = authenticator.auth_type().name(),
            max_retries = config.retry_policy.max_retries,
            "Created CIS service client"
        );

        Ok(ServiceClient {
            service: self.service,
            http,
            base_url: self.base_url,
            authenticator,
            retry_policy: self.http_config.retry_policy,
        })
    }
}

/// Asynchronous transport shared by the CIS service clients.
///
/// Cloning is cheap; clones share the connection pool and the authenticator.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: CisService,
    http: Client,
    base_url: Option<Url>,
    authenticator: Arc<Authenticator>,
    retry_policy: RetryPolicy,
}

impl ServiceClient {
    /// The service this client talks to.
    #[must_use]
    pub const fn service(&self) -> CisService {
        self.service
    }

    /// The base URL, if one is set.
    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// The authenticator attached to every request.
    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// The active retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Replace the base URL. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed; the current URL is kept.
    pub fn set_service_url(&mut self, url: &str) -> Result<()> {
        self.base_url = match url {
            "" => None,
            url => Some(parse_service_url(url)?),
        };
        Ok(())
    }

    /// Enable retries. Zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry_policy = RetryPolicy::with_limits(max_retries, max_interval);
    }

    /// Disable retries.
    pub fn disable_retries(&mut self) {
        self.retry_policy = RetryPolicy::no_retry();
    }

    /// Resolve the URL of a request path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceUrlMissing`] when no base URL is set.
    pub fn build_url(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone().ok_or(Error::ServiceUrlMissing)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint("Service URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the JSON response.
    ///
    /// The context deadline bounds the whole call, retries included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceUrlMissing`] without a base URL, [`Error::Api`] for
    /// non-2xx responses, [`Error::ResponseDecode`] for undecodable 2xx bodies,
    /// [`Error::Timeout`] when the deadline expires and transport errors otherwise.
    pub async fn send_json<R>(
        &self,
        ctx: &RequestContext,
        request: ServiceRequest,
    ) -> Result<DetailedResponse<R>>
    where
        R: DeserializeOwned,
    {
        let call = self.execute_with_retry(&request);
        let raw = match ctx.deadline() {
            Some(deadline) => timeout_at(deadline, call).await.map_err(|_| {
                warn!(
                    service = %self.service,
                    operation = request.operation,
                    "Deadline expired"
                );
                Error::Timeout(format!(
                    "{DEADLINE_EXCEEDED} while calling {} {}",
                    self.service, request.operation
                ))
            })??,
            None => call.await?,
        };

        match serde_json::from_str::<R>(&raw.body) {
            Ok(result) => Ok(DetailedResponse {
                result,
                response: raw,
            }),
            Err(err) => Err(Error::ResponseDecode {
                message: format!(
                    "{} {} returned an unexpected body: {err}",
                    self.service, request.operation
                ),
                response: Box::new(raw),
            }),
        }
    }

    async fn execute_with_retry(&self, request: &ServiceRequest) -> Result<RawResponse> {
        let url = self.build_url(&request.path)?;
        let headers = request.header_map()?;
        let mut attempt = 0;

        loop {
            debug!(
                service = %self.service,
                operation = request.operation,
                method = %request.method,
                url = %url,
                attempt,
                "Sending CIS request"
            );

            let error = match self.send_once(&url, &headers, request).await {
                Ok(raw) => return Ok(raw),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= self.retry_policy.max_retries {
                return Err(error);
            }

            attempt += 1;
            let delay = retry_after(&error)
                .map_or_else(
                    || self.retry_policy.delay_for_attempt(attempt),
                    |hint| std::cmp::min(hint, self.retry_policy.max_delay),
                );
            warn!(
                service = %self.service,
                operation = request.operation,
                attempt,
                status = error.status(),
                error = %error,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying CIS request"
            );
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }

    async fn send_once(
        &self,
        url: &Url,
        headers: &HeaderMap,
        request: &ServiceRequest,
    ) -> Result<RawResponse> {
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = self.authenticator.authenticate(builder);

        let response = builder.send().await?;
        let status = response.status();
        let response_headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        debug!(
            service = %self.service,
            operation = request.operation,
            status = status.as_u16(),
            "Received CIS response"
        );

        let raw = RawResponse {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
        };

        if status.is_success() {
            Ok(raw)
        } else {
            Err(Error::Api {
                status: raw.status_code,
                message: error_message(&raw, status.canonical_reason()),
                response: Box::new(raw),
            })
        }
    }
}

/// Extract a readable message from an error response body.
fn error_message(raw: &RawResponse, reason: Option<&str>) -> String {
    fn collect(value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::String(text) => out.push(text.clone()),
            serde_json::Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            serde_json::Value::Object(map) => {
                if let Some(message) = map.get("message") {
                    collect(message, out);
                }
            }
            _ => {}
        }
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw.body) {
        let mut messages = Vec::new();
        for key in ["errors", "error", "message"] {
            if let Some(field) = value.get(key) {
                collect(field, &mut messages);
            }
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
    }

    let body = raw.body.trim();
    if body.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        body.to_string()
    }
}

fn retry_after(error: &Error) -> Option<Duration> {
    error
        .response()?
        .header(RETRY_AFTER.as_str())?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn test_client(server: &MockServer) -> ServiceClient {
        ServiceClientBuilder::new(CisService::ZoneLockdown, server.uri())
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .build()
            .unwrap()
    }

    fn get_item() -> ServiceRequest {
        ServiceRequest::new(Method::GET, "get_item").with_path(["v1", "items", "abc"])
    }

    struct FailThenSucceed {
        failures: usize,
        status: u16,
        calls: Arc<AtomicUsize>,
    }

    impl Respond for FailThenSucceed {
        fn respond(&self, _: &Request) -> ResponseTemplate {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                ResponseTemplate::new(self.status).set_body_string("try again")
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"id": "abc"}))
            }
        }
    }

    #[test]
    fn test_timeout_constants() {
        assert_eq!(GLOBAL_LOAD_BALANCER_DEFAULT_TIMEOUT, 30);
        assert_eq!(RANGE_APPLICATIONS_DEFAULT_TIMEOUT, 30);
        assert_eq!(ZONE_LOCKDOWN_DEFAULT_TIMEOUT, 20);
    }

    #[test]
    fn test_retry_policy_new() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policy.initial_delay, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
        assert_eq!(policy.max_delay, Duration::from_secs(DEFAULT_RETRY_MAX_DELAY_SECS));
        assert!(policy.has_retries());
        assert!(!RetryPolicy::no_retry().has_retries());
    }

    #[test]
    fn test_retry_policy_with_limits_zero_selects_defaults() {
        let policy = RetryPolicy::with_limits(0, Duration::ZERO);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.max_delay, Duration::from_secs(30));

        let policy = RetryPolicy::with_limits(2, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_retry_policy_exponential_backoff() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(2)
            .with_max_delay(Duration::from_millis(500));

        assert_eq!(policy.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_millis(500));
    }

    #[test]
    fn test_client_config_defaults_disable_retries() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.retry_policy.has_retries());
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.enable_compression);
        assert!(!config.disable_ssl);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_retry_policy(RetryPolicy::new())
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false)
            .with_disable_ssl(true);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry_policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
        assert!(config.disable_ssl);
        assert!(!config.without_retries().retry_policy.has_retries());
    }

    #[tokio::test]
    async fn test_request_context_remaining() {
        assert!(RequestContext::background().remaining().is_none());
        let ctx = RequestContext::with_timeout(Duration::from_secs(60));
        let remaining = ctx.remaining().unwrap();
        assert!(remaining > Duration::from_secs(59));
        let expired = RequestContext::with_deadline(Instant::now() - Duration::from_secs(1));
        assert_eq!(expired.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_builder_requires_authenticator() {
        let err = ServiceClientBuilder::new(CisService::ZoneLockdown, "https://example.com")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = ServiceClientBuilder::new(CisService::ZoneLockdown, "{BAD_URL_STRING").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_builder_rejects_incomplete_basic_auth() {
        let err = ServiceClientBuilder::new(CisService::ZoneLockdown, "https://example.com")
            .unwrap()
            .with_authenticator(Authenticator::basic("", ""))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let client = ServiceClientBuilder::new(CisService::ZoneLockdown, "https://example.com/api/")
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .build()
            .unwrap();
        let url = client
            .build_url(&["v1".to_string(), "crn:v1:a/b".to_string()])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1/crn:v1:a%2Fb");
    }

    #[test]
    fn test_set_service_url() {
        let mut client = ServiceClientBuilder::new(CisService::ZoneLockdown, "https://example.com")
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .build()
            .unwrap();

        assert!(client.set_service_url("{BAD_URL_STRING").is_err());
        assert_eq!(client.base_url().unwrap().as_str(), "https://example.com/");

        client.set_service_url("").unwrap();
        assert!(client.base_url().is_none());
        assert_eq!(client.build_url(&[]).unwrap_err(), Error::ServiceUrlMissing);
    }

    #[test]
    fn test_enable_and_disable_retries() {
        let mut client = ServiceClientBuilder::new(CisService::ZoneLockdown, "https://example.com")
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .build()
            .unwrap();
        assert!(!client.retry_policy().has_retries());

        client.enable_retries(0, Duration::ZERO);
        assert_eq!(client.retry_policy().max_retries, DEFAULT_MAX_RETRIES);

        client.disable_retries();
        assert!(!client.retry_policy().has_retries());
    }

    struct MapSource(HashMap<&'static str, &'static str>);

    impl ConfigSource for MapSource {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|value| (*value).to_string())
        }
    }

    #[test]
    fn test_from_config_source_prefers_explicit_authenticator() {
        let empty = MapSource(HashMap::new());
        let options = ServiceOptions::new("crn", "zone").with_authenticator(Authenticator::NoAuth);
        let builder =
            ServiceClientBuilder::from_config_source(CisService::ZoneLockdown, options, &empty)
                .unwrap();
        assert_eq!(
            builder.authenticator.as_ref().unwrap().auth_type(),
            crate::auth::AuthType::NoAuth
        );

        let unknown = MapSource(HashMap::from([("ZONE_LOCKDOWN_AUTH_TYPE", "someOtherAuth")]));
        let options = ServiceOptions::new("crn", "zone")
            .with_authenticator(Authenticator::bearer_token("token-123"));
        let client =
            ServiceClientBuilder::from_config_source(CisService::ZoneLockdown, options, &unknown)
                .unwrap()
                .build()
                .unwrap();
        assert_eq!(
            client.authenticator().auth_type(),
            crate::auth::AuthType::BearerToken
        );

        let err = ServiceClientBuilder::from_config_source(
            CisService::ZoneLockdown,
            ServiceOptions::new("crn", "zone"),
            &empty,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_from_config_source_keeps_compression_default_when_unset() {
        let options = || ServiceOptions::new("crn", "zone").with_authenticator(Authenticator::NoAuth);
        let explicit = ServiceClientBuilder::new(CisService::ZoneLockdown, DEFAULT_SERVICE_URL)
            .unwrap();

        let unset = MapSource(HashMap::new());
        let builder =
            ServiceClientBuilder::from_config_source(CisService::ZoneLockdown, options(), &unset)
                .unwrap();
        assert!(builder.http_config.enable_compression);
        assert_eq!(
            builder.http_config.enable_compression,
            explicit.http_config.enable_compression
        );

        let disabled = MapSource(HashMap::from([("ZONE_LOCKDOWN_ENABLE_GZIP", "false")]));
        let builder =
            ServiceClientBuilder::from_config_source(CisService::ZoneLockdown, options(), &disabled)
                .unwrap();
        assert!(!builder.http_config.enable_compression);
    }

    #[test]
    fn test_with_http_config_replaces_external_settings() {
        let source = MapSource(HashMap::from([
            ("ZONE_LOCKDOWN_ENABLE_RETRIES", "true"),
            ("ZONE_LOCKDOWN_MAX_RETRIES", "3"),
            ("ZONE_LOCKDOWN_DISABLE_SSL", "true"),
        ]));
        let options = ServiceOptions::new("crn", "zone").with_authenticator(Authenticator::NoAuth);
        let builder =
            ServiceClientBuilder::from_config_source(CisService::ZoneLockdown, options, &source)
                .unwrap();
        assert_eq!(builder.http_config.retry_policy.max_retries, 3);
        assert!(builder.http_config.disable_ssl);
        assert_eq!(
            builder.http_config.timeout,
            Duration::from_secs(ZONE_LOCKDOWN_DEFAULT_TIMEOUT)
        );

        let replaced = builder.with_http_config(ClientConfig::new());
        assert_eq!(replaced.http_config.retry_policy.max_retries, 0);
        assert!(!replaced.http_config.disable_ssl);
        assert_eq!(replaced.http_config.timeout, ClientConfig::new().timeout);

        let client = replaced
            .with_retry_policy(RetryPolicy::new().with_max_retries(1))
            .build()
            .unwrap();
        assert_eq!(client.retry_policy().max_retries, 1);
    }

    #[test]
    fn test_invalid_header_is_validation_error() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "value".to_string());
        let request = ServiceRequest::new(Method::GET, "op").with_headers(&headers);
        assert!(matches!(
            request.header_map().unwrap_err(),
            Error::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn test_send_json_success_with_query_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/items"))
            .and(query_param("page", "2"))
            .and(header("x-test", "yes"))
            .and(header("accept", "application/json"))
            .and(body_json(json!({"name": "item"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-request-id", "req-1")
                    .set_body_json(json!({"id": "abc"})),
            )
            .mount(&server)
            .await;

        let mut query = QueryParams::new();
        query.push("page", 2);
        let mut headers = HashMap::new();
        headers.insert("X-Test".to_string(), "yes".to_string());
        let request = ServiceRequest::new(Method::POST, "create_item")
            .with_path(["v1", "items"])
            .with_query(query)
            .with_headers(&headers)
            .with_json_body(&json!({"name": "item"}))
            .unwrap();

        let client = test_client(&server);
        let response: DetailedResponse<Item> = client
            .send_json(&RequestContext::background(), request)
            .await
            .unwrap();
        assert_eq!(response.result.id, "abc");
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.response.header("X-Request-Id"), Some("req-1"));
    }

    #[tokio::test]
    async fn test_send_json_api_error_uses_envelope_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/items/abc"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "errors": [{"code": 1001, "message": "not found"}],
                "messages": [],
                "result": null
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            Error::Api {
                status,
                message,
                response,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
                assert!(response.body.contains("1001"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_json_decode_error_keeps_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/items/abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string("this is not json"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseDecode { .. }));
        let raw = err.response().unwrap();
        assert_eq!(raw.status_code, 200);
        assert_eq!(raw.body, "this is not json");
    }

    #[tokio::test]
    async fn test_send_json_without_service_url() {
        let client = ServiceClientBuilder::new(CisService::ZoneLockdown, "")
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .build()
            .unwrap();
        let err = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("service URL is empty"));
    }

    #[tokio::test]
    async fn test_send_json_retries_transient_status() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        Mock::given(method("GET"))
            .and(path("/v1/items/abc"))
            .respond_with(FailThenSucceed {
                failures: 2,
                status: 503,
                calls: Arc::clone(&calls),
            })
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(CisService::ZoneLockdown, server.uri())
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .with_retry_policy(
                RetryPolicy::new()
                    .with_max_retries(3)
                    .with_initial_delay(Duration::from_millis(5)),
            )
            .build()
            .unwrap();

        let response = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap();
        assert_eq!(response.result.id, "abc");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_send_json_retries_connection_failures() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ServiceClientBuilder::new(CisService::ZoneLockdown, format!("http://{addr}"))
            .unwrap()
            .with_authenticator(Authenticator::NoAuth)
            .with_retry_policy(
                RetryPolicy::new()
                    .with_max_retries(2)
                    .with_initial_delay(Duration::from_millis(20)),
            )
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let err = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)), "{err:?}");
        assert!(err.is_retryable());
        // 20ms then 40ms of backoff before giving up
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_send_json_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        Mock::given(method("GET"))
            .and(path("/v1/items/abc"))
            .respond_with(FailThenSucceed {
                failures: 1,
                status: 400,
                calls: Arc::clone(&calls),
            })
            .mount(&server)
            .await;

        let mut client = test_client(&server);
        client.enable_retries(3, Duration::from_millis(5));

        let err = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_json_deadline_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/items/abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "abc"}))
                    .set_delay(Duration::from_millis(100)),
            )
            .mount(&server)
            .await;

        let mut client = test_client(&server);
        let ctx = RequestContext::with_timeout(Duration::from_millis(80));
        let err = client
            .send_json::<Item>(&ctx, get_item())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(err.to_string().contains("deadline exceeded"));

        client.enable_retries(0, Duration::ZERO);
        let ctx = RequestContext::with_timeout(Duration::from_millis(80));
        let err = client
            .send_json::<Item>(&ctx, get_item())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deadline exceeded"));

        let ok = client
            .send_json::<Item>(&RequestContext::background(), get_item())
            .await
            .unwrap();
        assert_eq!(ok.result.id, "abc");
    }

    #[test]
    fn test_error_message_fallbacks() {
        let raw = RawResponse {
            status_code: 500,
            headers: BTreeMap::new(),
            body: String::new(),
        };
        assert_eq!(
            error_message(&raw, Some("Internal Server Error")),
            "Internal Server Error"
        );

        let raw = RawResponse {
            body: r#"{"errors": [["first"], ["second"]]}"#.to_string(),
            ..raw
        };
        assert_eq!(error_message(&raw, None), "first; second");

        let raw = RawResponse {
            body: "plain failure".to_string(),
            ..raw
        };
        assert_eq!(error_message(&raw, None), "plain failure");
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = BTreeMap::new();
        headers.insert("retry-after".to_string(), "7".to_string());
        let err = Error::Api {
            status: 429,
            message: "slow down".to_string(),
            response: Box::new(RawResponse {
                status_code: 429,
                headers,
                body: String::new(),
            }),
        };
        assert_eq!(retry_after(&err), Some(Duration::from_secs(7)));
        assert_eq!(retry_after(&Error::Timeout("t".to_string())), None);
    }
}
