//! Asynchronous global load balancer client implementation.

use crate::models::{
    CreateLoadBalancerOptions, DeleteLoadBalancerOptions, DeleteLoadBalancersResp,
    EditLoadBalancerOptions, GetLoadBalancerSettingsOptions, ListAllLoadBalancersOptions,
    ListLoadBalancersResp, LoadBalancersResp,
};
use crate::Result;
use cis_core::client::{
    ClientConfig, RequestContext, RetryPolicy, ServiceClient, ServiceClientBuilder, ServiceRequest,
};
use cis_core::config::{ConfigSource, EnvConfigSource, ServiceOptions};
use cis_core::response::DetailedResponse;
use cis_core::types::CisService;
use reqwest::Method;
use std::time::Duration;
use tracing::debug;
use url::Url;
use validator::Validate;

const USER_AGENT: &str = concat!("cis-global-load-balancer/", env!("CARGO_PKG_VERSION"));
const SERVICE: CisService = CisService::GlobalLoadBalancer;

/// Builder for [`GlobalLoadBalancerV1`].
#[derive(Debug, Clone)]
pub struct GlobalLoadBalancerV1Builder {
    inner: ServiceClientBuilder,
    crn: String,
    zone_identifier: String,
}

impl GlobalLoadBalancerV1Builder {
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
    /// Fails as [`GlobalLoadBalancerV1Builder::new`] does, and when the external
    /// configuration is missing or invalid.
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        let (crn, zone_identifier) = options.scope()?;
        let inner = ServiceClientBuilder::from_config_source(SERVICE, options, source)?;
        Ok(Self::wrap(inner, crn, zone_identifier))
    }

    /// Create a builder configured from `GLOBAL_LOAD_BALANCER_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1Builder::from_config_source`].
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
    pub fn build(self) -> Result<GlobalLoadBalancerV1> {
        let inner = self.inner.build()?;
        Ok(GlobalLoadBalancerV1 {
            inner,
            crn: self.crn,
            zone_identifier: self.zone_identifier,
        })
    }
}

/// Asynchronous global load balancer client.
///
/// Clones share the connection pool and authenticator.
#[derive(Debug, Clone)]
pub struct GlobalLoadBalancerV1 {
    inner: ServiceClient,
    crn: String,
    zone_identifier: String,
}

impl GlobalLoadBalancerV1 {
    /// Construct a client from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1Builder::new`].
    pub fn new(options: ServiceOptions) -> Result<Self> {
        GlobalLoadBalancerV1Builder::new(options)?.build()
    }

    /// Construct a client configured from environment variables.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1Builder::from_env`].
    pub fn from_env(options: ServiceOptions) -> Result<Self> {
        GlobalLoadBalancerV1Builder::from_env(options)?.build()
    }

    /// Construct a client configured from a configuration source.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1Builder::from_config_source`].
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        GlobalLoadBalancerV1Builder::from_config_source(options, source)?.build()
    }

    /// Start a builder from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1Builder::new`].
    pub fn builder(options: ServiceOptions) -> Result<GlobalLoadBalancerV1Builder> {
        GlobalLoadBalancerV1Builder::new(options)
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

    /// List all load balancers of the zone.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors.
    pub async fn list_all_load_balancers(
        &self,
        options: &ListAllLoadBalancersOptions,
    ) -> Result<DetailedResponse<ListLoadBalancersResp>> {
        self.list_all_load_balancers_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`GlobalLoadBalancerV1::list_all_load_balancers`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors, or a timeout when the deadline expires.
    pub async fn list_all_load_balancers_with_context(
        &self,
        ctx: &RequestContext,
        options: &ListAllLoadBalancersOptions,
    ) -> Result<DetailedResponse<ListLoadBalancersResp>> {
        let request = ServiceRequest::new(Method::GET, "list_all_load_balancers")
            .with_path(self.load_balancers_path(None))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Create a load balancer.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors.
    pub async fn create_load_balancer(
        &self,
        options: &CreateLoadBalancerOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        self.create_load_balancer_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`GlobalLoadBalancerV1::create_load_balancer`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors, or a timeout when the deadline expires.
    pub async fn create_load_balancer_with_context(
        &self,
        ctx: &RequestContext,
        options: &CreateLoadBalancerOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        let request = ServiceRequest::new(Method::POST, "create_load_balancer")
            .with_path(self.load_balancers_path(None))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    /// Replace the settings of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn edit_load_balancer(
        &self,
        options: &EditLoadBalancerOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        self.edit_load_balancer_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`GlobalLoadBalancerV1::edit_load_balancer`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1::edit_load_balancer`]; a timeout is returned when
    /// the deadline expires.
    pub async fn edit_load_balancer_with_context(
        &self,
        ctx: &RequestContext,
        options: &EditLoadBalancerOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::PUT, "edit_load_balancer")
            .with_path(self.load_balancers_path(Some(&options.load_balancer_identifier)))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    /// Delete a load balancer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn delete_load_balancer(
        &self,
        options: &DeleteLoadBalancerOptions,
    ) -> Result<DetailedResponse<DeleteLoadBalancersResp>> {
        self.delete_load_balancer_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`GlobalLoadBalancerV1::delete_load_balancer`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1::delete_load_balancer`]; a timeout is returned when
    /// the deadline expires.
    pub async fn delete_load_balancer_with_context(
        &self,
        ctx: &RequestContext,
        options: &DeleteLoadBalancerOptions,
    ) -> Result<DetailedResponse<DeleteLoadBalancersResp>> {
        options.validate()?;
        debug!(
            load_balancer = %options.load_balancer_identifier,
            zone = %self.zone_identifier,
            "Deleting load balancer"
        );
        let request = ServiceRequest::new(Method::DELETE, "delete_load_balancer")
            .with_path(self.load_balancers_path(Some(&options.load_balancer_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Read the settings of a load balancer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn get_load_balancer_settings(
        &self,
        options: &GetLoadBalancerSettingsOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        self.get_load_balancer_settings_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`GlobalLoadBalancerV1::get_load_balancer_settings`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`GlobalLoadBalancerV1::get_load_balancer_settings`]; a timeout is returned
    /// when the deadline expires.
    pub async fn get_load_balancer_settings_with_context(
        &self,
        ctx: &RequestContext,
        options: &GetLoadBalancerSettingsOptions,
    ) -> Result<DetailedResponse<LoadBalancersResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::GET, "get_load_balancer_settings")
            .with_path(self.load_balancers_path(Some(&options.load_balancer_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    fn load_balancers_path(&self, id: Option<&str>) -> Vec<String> {
        let mut path = vec![
            "v1".to_string(),
            self.crn.clone(),
            "zones".to_string(),
            self.zone_identifier.clone(),
            "load_balancers".to_string(),
        ];
        path.extend(id.map(str::to_string));
        path
    }
}
