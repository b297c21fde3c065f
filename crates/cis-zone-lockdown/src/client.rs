//! Asynchronous zone lockdown client implementation.

use crate::models::{
    CreateZoneLockdownRuleOptions, DeleteLockdownResp, DeleteZoneLockdownRuleOptions,
    GetLockdownOptions, ListAllZoneLockdownRulesOptions, ListLockdownResp, LockdownResp,
    UpdateLockdownRuleOptions,
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

const USER_AGENT: &str = concat!("cis-zone-lockdown/", env!("CARGO_PKG_VERSION"));
const SERVICE: CisService = CisService::ZoneLockdown;

/// Builder for [`ZoneLockdownV1`].
#[derive(Debug, Clone)]
pub struct ZoneLockdownV1Builder {
    inner: ServiceClientBuilder,
    crn: String,
    zone_identifier: String,
}

impl ZoneLockdownV1Builder {
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
    /// Fails as [`ZoneLockdownV1Builder::new`] does, and when the external
    /// configuration is missing or invalid.
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        let (crn, zone_identifier) = options.scope()?;
        let inner = ServiceClientBuilder::from_config_source(SERVICE, options, source)?;
        Ok(Self::wrap(inner, crn, zone_identifier))
    }

    /// Create a builder configured from `ZONE_LOCKDOWN_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1Builder::from_config_source`].
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
    pub fn build(self) -> Result<ZoneLockdownV1> {
        Ok(ZoneLockdownV1 {
            inner: self.inner.build()?,
            crn: self.crn,
            zone_identifier: self.zone_identifier,
        })
    }
}

/// Asynchronous zone lockdown client.
#[derive(Debug, Clone)]
pub struct ZoneLockdownV1 {
    inner: ServiceClient,
    crn: String,
    zone_identifier: String,
}

impl ZoneLockdownV1 {
    /// Construct a client from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1Builder::new`].
    pub fn new(options: ServiceOptions) -> Result<Self> {
        ZoneLockdownV1Builder::new(options)?.build()
    }

    /// Construct a client configured from environment variables.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1Builder::from_env`].
    pub fn from_env(options: ServiceOptions) -> Result<Self> {
        ZoneLockdownV1Builder::from_env(options)?.build()
    }

    /// Construct a client configured from a configuration source.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1Builder::from_config_source`].
    pub fn from_config_source(options: ServiceOptions, source: &dyn ConfigSource) -> Result<Self> {
        ZoneLockdownV1Builder::from_config_source(options, source)?.build()
    }

    /// Start a builder from explicit service options.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1Builder::new`].
    pub fn builder(options: ServiceOptions) -> Result<ZoneLockdownV1Builder> {
        ZoneLockdownV1Builder::new(options)
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

    /// List lockdown rules of the zone, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors.
    pub async fn list_all_zone_lockdown_rules(
        &self,
        options: &ListAllZoneLockdownRulesOptions,
    ) -> Result<DetailedResponse<ListLockdownResp>> {
        self.list_all_zone_lockdown_rules_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`ZoneLockdownV1::list_all_zone_lockdown_rules`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// Returns transport, API or decode errors, or a timeout when the deadline expires.
    pub async fn list_all_zone_lockdown_rules_with_context(
        &self,
        ctx: &RequestContext,
        options: &ListAllZoneLockdownRulesOptions,
    ) -> Result<DetailedResponse<ListLockdownResp>> {
        let query = QueryParams::new()
            .with_opt("page", options.page)
            .with_opt("per_page", options.per_page);
        let request = ServiceRequest::new(Method::GET, "list_all_zone_lockdown_rules")
            .with_path(self.lockdowns_path(None))
            .with_query(query)
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Create a lockdown rule.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid configuration item, otherwise
    /// transport, API or decode errors.
    pub async fn create_zone_lockdown_rule(
        &self,
        options: &CreateZoneLockdownRuleOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        self.create_zone_lockdown_rule_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`ZoneLockdownV1::create_zone_lockdown_rule`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1::create_zone_lockdown_rule`]; a timeout is returned when the
    /// deadline expires.
    pub async fn create_zone_lockdown_rule_with_context(
        &self,
        ctx: &RequestContext,
        options: &CreateZoneLockdownRuleOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::POST, "create_zone_lockdown_rule")
            .with_path(self.lockdowns_path(None))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    /// Delete a lockdown rule.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn delete_zone_lockdown_rule(
        &self,
        options: &DeleteZoneLockdownRuleOptions,
    ) -> Result<DetailedResponse<DeleteLockdownResp>> {
        self.delete_zone_lockdown_rule_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`ZoneLockdownV1::delete_zone_lockdown_rule`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1::delete_zone_lockdown_rule`]; a timeout is returned when the
    /// deadline expires.
    pub async fn delete_zone_lockdown_rule_with_context(
        &self,
        ctx: &RequestContext,
        options: &DeleteZoneLockdownRuleOptions,
    ) -> Result<DetailedResponse<DeleteLockdownResp>> {
        options.validate()?;
        debug!(
            rule = %options.lockdown_rule_identifier,
            zone = %self.zone_identifier,
            "Deleting lockdown rule"
        );
        let request = ServiceRequest::new(Method::DELETE, "delete_zone_lockdown_rule")
            .with_path(self.lockdowns_path(Some(&options.lockdown_rule_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Fetch a lockdown rule.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier, otherwise transport, API
    /// or decode errors.
    pub async fn get_lockdown(
        &self,
        options: &GetLockdownOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        self.get_lockdown_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`ZoneLockdownV1::get_lockdown`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1::get_lockdown`]; a timeout is returned when the deadline
    /// expires.
    pub async fn get_lockdown_with_context(
        &self,
        ctx: &RequestContext,
        options: &GetLockdownOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::GET, "get_lockdown")
            .with_path(self.lockdowns_path(Some(&options.lockdown_rule_identifier)))
            .with_headers(&options.headers);
        self.inner.send_json(ctx, request).await
    }

    /// Replace a lockdown rule.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier or an invalid configuration
    /// item, otherwise transport, API or decode errors.
    pub async fn update_lockdown_rule(
        &self,
        options: &UpdateLockdownRuleOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        self.update_lockdown_rule_with_context(&RequestContext::background(), options)
            .await
    }

    /// [`ZoneLockdownV1::update_lockdown_rule`] bounded by a request context.
    ///
    /// # Errors
    ///
    /// See [`ZoneLockdownV1::update_lockdown_rule`]; a timeout is returned when the
    /// deadline expires.
    pub async fn update_lockdown_rule_with_context(
        &self,
        ctx: &RequestContext,
        options: &UpdateLockdownRuleOptions,
    ) -> Result<DetailedResponse<LockdownResp>> {
        options.validate()?;
        let request = ServiceRequest::new(Method::PUT, "update_lockdown_rule")
            .with_path(self.lockdowns_path(Some(&options.lockdown_rule_identifier)))
            .with_headers(&options.headers)
            .with_json_body(&options.settings)?;
        self.inner.send_json(ctx, request).await
    }

    fn lockdowns_path(&self, id: Option<&str>) -> Vec<String> {
        let mut path = vec![
            "v1".to_string(),
            self.crn.clone(),
            "zones".to_string(),
            self.zone_identifier.clone(),
            "firewall".to_string(),
            "lockdowns".to_string(),
        ];
        path.extend(id.map(str::to_string));
        path
    }
}
