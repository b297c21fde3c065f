//! Asynchronous range applications client implementation.

use crate::models::{
    CreateRangeAppOptions, DeleteRangeAppOptions, GetRangeAppOptions, ListRangeAppsOptions,
    RangeAppResp, RangeApps, UpdateRangeAppOptions,
};
use crate::Result;
use cis_core::client::{
    ClientConfig, RequestContext, RetryPolicy, ServiceClient, ServiceClientBuilder, ServiceRequest,
};
use cis_core::config::{ConfigSource, EnvConfigSource, ServiceOptions};
use cis_core::query::QueryParams;
use cis_core::response::DetailedResponse;
use cis_core::types::CisService;
use reqwest::Method;
use std::time::Duration;
use tracing::debug;
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("cis-range-applications/", env!("CARGO_PKG_VERSION"));
const SERVICE: CisService = CisService::RangeApplications;

/// Builder for [`RangeApplicationsV1`].
#[derive(Debug, Clone)]
pub struct RangeApplicationsV1Builder {
    inner: ServiceClientBuilder,
    crn: String,
    zone_identifier: String,
}

impl RangeApplicationsV1Builder {
    /// Create a builder from explicit service options.
    ///
    /// # Errors
    ///
    /// Fails when the CRN, zone or authenticator is missing or the URL is malformed.
    pub fn new(options: ServiceOptions) -> Result<Self> {
        let (crn, zone_identifier) = options.scope()?;
        let inner = ServiceClientBuilder::from_options(SERVICE, options)?;
        Ok(Self::wrap(inner, crn, zone_identifier))
    }

    /// Create a builder whose URL and authenticator come from a configuration source.
    ///
    /// # Errors
    ///
    /// Fails as [`RangeApplicationsV1Builder::new`] does, and when the external
    /// configuration is missing or invalid.
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        let (crn, zone_identifier) = options.scope()?;
        let inner = ServiceClientBuilder::from_config_source(SERVICE, options, source)?;
        Ok(Self::wrap(inner, crn, zone_identifier))
    }

    /// Create a builder configured from `RANGE_APPLICATIONS_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1Builder::from_config_source`].
    pub fn from_env(options: ServiceOptions) -> Result<Self> {
        Self::from_config_source(options, &EnvConfigSource)
    }

    fn wrap(inner: ServiceClientBuilder, crn: String, zone_identifier: String) -> Self {
        Self {
            inner: inner.with_user_agent(USER_AGENT),
            crn,
            zone_identifier,
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Replace the HTTP client configuration, including any settings loaded from
    /// external configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails when the authenticator is incomplete or the HTTP client cannot be built.
    pub fn build(self) -> Result<RangeApplicationsV1> {
        Ok(RangeApplicationsV1 {
            inner: self.inner.build()?,
            crn: self.crn,
            zone_identifier: self.zone_identifier,
        })
    }
}

/// Asynchronous range applications client.
#[derive(Debug, Clone)]
pub struct RangeApplicationsV1 {
    inner: ServiceClient,
    crn: String,
    zone_identifier: String,
}

impl RangeApplicationsV1 {
    /// Construct a client from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1Builder::new`].
    pub fn new(options: ServiceOptions) -> Result<Self> {
        RangeApplicationsV1Builder::new(options)?.build()
    }

    /// Construct a client configured from environment variables.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1Builder::from_env`].
    pub fn from_env(options: ServiceOptions) -> Result<Self> {
        RangeApplicationsV1Builder::from_env(options)?.build()
    }

    /// Construct a client configured from a configuration source.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1Builder::from_config_source`].
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        RangeApplicationsV1Builder::from_config_source(options, source)?.build()
    }

    /// Start a builder from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1Builder::new`].
    pub fn builder(options: ServiceOptions) -> Result<RangeApplicationsV1Builder> {
        RangeApplicationsV1Builder::new(options)
    }

    /// Full CRN of the service instance.
    #[must_use]
    pub fn crn(&self) -> &str {
        &self.crn
    }

    /// Zone identifier.
    #[must_use]
    pub fn zone_identifier(&self) -> &str {
        &self.zone_identifier
    }

    /// Return the service URL.
    #[must_use]
    pub fn service_url(&self) -> Option<&Url> {
        self.inner.base_url()
    }

    /// Replace the service URL; an empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn set_service_url(&mut self, url: &str) -> Result<()> {
        self.inner.set_service_url(url)
    }

    /// Enable retries; zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.inner.enable_retries(max_retries, max_interval);
    }

    /// Disable retries.
    pub fn disable_retries(&mut self) {
        self.inner.disable_retries();
    }

    /// List range applications of the zone.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors.
    pub async fn list_range_apps(
        &self,
        options: &ListRangeAppsOptions,
    ) -> Result<DetailedResponse<RangeApps>> {
        self.list_range_apps_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`RangeApplicationsV1::list_range_apps`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors, or a timeout when the deadline expires.
    pub async fn list_range_apps_with_context(
        &self,
        ctx: &RequestContext,
        options: &ListRangeAppsOptions,
    ) -> Result<DetailedResponse<RangeApps>> {
        let query = QueryParams::new()
            .with_opt("page", options.page)
            .with_opt("per_page", options.per_page)
            .with_opt("order", options.order.as_deref())
            .with_opt("direction", options.direction);
        let request = ServiceRequest::new(Method::GET, "list_range_apps")
            .with_path(self.apps_path(None))
            .with_query(query)
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Create a range application.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty protocol or origin DNS name, otherwise
    /// transport, API or decode errors.
    pub async fn create_range_app(
        &self,
        options: &CreateRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        self.create_range_app_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`RangeApplicationsV1::create_range_app`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1::create_range_app`]; a timeout is returned when the
    /// deadline expires.
    pub async fn create_range_app_with_context(
        &self,
        ctx: &RequestContext,
        options: &CreateRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::POST, "create_range_app")
            .with_path(self.apps_path(None))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    /// Fetch a range application.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn get_range_app(
        &self,
        options: &GetRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        self.get_range_app_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`RangeApplicationsV1::get_range_app`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1::get_range_app`]; a timeout is returned when the
    /// deadline expires.
    pub async fn get_range_app_with_context(
        &self,
        ctx: &RequestContext,
        options: &GetRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::GET, "get_range_app")
            .with_path(self.apps_path(Some(&options.app_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Replace a range application.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, protocol or origin DNS
    /// name, otherwise transport, API or decode errors.
    pub async fn update_range_app(
        &self,
        options: &UpdateRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        self.update_range_app_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`RangeApplicationsV1::update_range_app`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1::update_range_app`]; a timeout is returned when the
    /// deadline expires.
    pub async fn update_range_app_with_context(
        &self,
        ctx: &RequestContext,
        options: &UpdateRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::PUT, "update_range_app")
            .with_path(self.apps_path(Some(&options.app_identifier)))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    /// Delete a range application. The service echoes the deleted application.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn delete_range_app(
        &self,
        options: &DeleteRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        self.delete_range_app_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`RangeApplicationsV1::delete_range_app`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`RangeApplicationsV1::delete_range_app`]; a timeout is returned when the
    /// deadline expires.
    pub async fn delete_range_app_with_context(
        &self,
        ctx: &RequestContext,
        options: &DeleteRangeAppOptions,
    ) -> Result<DetailedResponse<RangeAppResp>> {
        options.validate()?;
        debug!(app = %options.app_identifier, zone = %self.zone_identifier, "Deleting range application");
        let request = ServiceRequest::new(Method::DELETE, "delete_range_app")
            .with_path(self.apps_path(Some(&options.app_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    fn apps_path(&self, id: Option<&str>) -> Vec<String> {
        let mut path = vec![
            "v1".to_string(),
            self.crn.clone(),
            "zones".to_string(),
            self.zone_identifier.clone(),
            "range".to_string(),
            "apps".to_string(),
        ];
        path.extend(id.map(str::to_string));
        path
    }
}
