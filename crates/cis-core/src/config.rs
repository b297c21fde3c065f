//! Configuration structures for CIS service clients.
//!
//! Service clients are configured from explicit [`ServiceOptions`] and, optionally,
//! from external properties read through a [`ConfigSource`] (environment variables by
//! default). External property names follow `<SERVICE>_<PROPERTY>`, for example
//! `ZONE_LOCKDOWN_URL` or `GLOBAL_LOAD_BALANCER_AUTH_TYPE`.

use crate::auth::{AuthType, Authenticator};
use crate::types::{CisService, DEFAULT_SERVICE_URL};
use crate::Error;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Options shared by every CIS service constructor.
#[derive(Debug, Default, Validate)]
pub struct ServiceOptions {
    /// Service base URL (defaults to the public CIS endpoint)
    pub url: Option<String>,

    /// Authenticator used for every request
    pub authenticator: Option<Authenticator>,

    /// Full CRN of the service instance
    #[validate(required, length(min = 1))]
    pub crn: Option<String>,

    /// Zone identifier
    #[validate(required, length(min = 1))]
    pub zone_identifier: Option<String>,
}

impl ServiceOptions {
    /// Create options for a CRN and zone.
    #[must_use]
    pub fn new(crn: impl Into<String>, zone_identifier: impl Into<String>) -> Self {
        Self {
            url: None,
            authenticator: None,
            crn: Some(crn.into()),
            zone_identifier: Some(zone_identifier.into()),
        }
    }

    /// Set the service URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Validate required fields and return the CRN and zone identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either is missing or empty.
    pub fn scope(&self) -> Result<(String, String), Error> {
        self.validate()?;
        match (&self.crn, &self.zone_identifier) {
            (Some(crn), Some(zone)) => Ok((crn.clone(), zone.clone())),
            _ => Err(Error::ValidationError(
                "crn and zone_identifier are required".to_string(),
            )),
        }
    }

    /// Resolve the configured URL, falling back to the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        parse_service_url(self.url.as_deref().unwrap_or(DEFAULT_SERVICE_URL))
    }
}

/// Parse a service URL.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed or cannot carry a path.
pub fn parse_service_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::InvalidEndpoint(format!("Invalid service URL `{url}`: {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "Service URL `{url}` cannot be used as a base"
        )));
    }
    Ok(parsed)
}

/// Source of external configuration properties.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    /// Look up a property by its full name.
    fn get(&self, key: &str) -> Option<String>;
}

/// [`ConfigSource`] reading process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Service configuration loaded from external properties.
#[derive(Debug, Validate)]
pub struct ExternalConfig {
    /// Service URL (`<SERVICE>_URL`)
    pub url: Option<String>,

    /// Skip TLS verification (`<SERVICE>_DISABLE_SSL`)
    pub disable_ssl: bool,

    /// Accept gzip-compressed responses (`<SERVICE>_ENABLE_GZIP`); unset keeps the
    /// client default
    pub enable_gzip: Option<bool>,

    /// Enable retries (`<SERVICE>_ENABLE_RETRIES`)
    pub enable_retries: bool,

    /// Maximum retries (`<SERVICE>_MAX_RETRIES`)
    #[validate(range(max = 10))]
    pub max_retries: u32,

    /// Maximum retry interval in seconds (`<SERVICE>_RETRY_INTERVAL`)
    #[validate(range(max = 300))]
    pub retry_interval_secs: u64,
}

impl ExternalConfig {
    /// Load the transport properties of a service from a property source.
    ///
    /// Credentials are read separately by [`ExternalConfig::load_authenticator`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed or out-of-range values.
    pub fn load(service: CisService, source: &dyn ConfigSource) -> Result<Self, Error> {
        let prefix = service.config_prefix();
        let property = |name: &str| read_property(source, prefix, name);

        let config = Self {
            url: property("URL"),
            disable_ssl: parse_flag(prefix, "DISABLE_SSL", property("DISABLE_SSL"))?
                .unwrap_or_default(),
            enable_gzip: parse_flag(prefix, "ENABLE_GZIP", property("ENABLE_GZIP"))?,
            enable_retries: parse_flag(prefix, "ENABLE_RETRIES", property("ENABLE_RETRIES"))?
                .unwrap_or_default(),
            max_retries: parse_number(prefix, "MAX_RETRIES", property("MAX_RETRIES"))?,
            retry_interval_secs: parse_number(
                prefix,
                "RETRY_INTERVAL",
                property("RETRY_INTERVAL"),
            )?,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid {prefix} configuration: {e}")))?;

        Ok(config)
    }

    /// Build the authenticator described by `<SERVICE>_AUTH_TYPE` and its credentials.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the auth type is missing, unknown, or
    /// its credentials are incomplete.
    pub fn load_authenticator(
        service: CisService,
        source: &dyn ConfigSource,
    ) -> Result<Authenticator, Error> {
        let prefix = service.config_prefix();
        let property = |name: &str| read_property(source, prefix, name);

        let auth_type: AuthType = property("AUTH_TYPE")
            .ok_or_else(|| {
                Error::Authentication(format!("{prefix}_AUTH_TYPE is not configured"))
            })?
            .parse()?;

        let authenticator = match auth_type {
            AuthType::NoAuth => Authenticator::NoAuth,
            AuthType::Basic => Authenticator::basic(
                property("USERNAME").unwrap_or_default(),
                property("PASSWORD").unwrap_or_default(),
            ),
            AuthType::BearerToken => {
                Authenticator::bearer_token(property("BEARER_TOKEN").unwrap_or_default())
            }
        };
        authenticator.validate()?;
        Ok(authenticator)
    }

    /// Load configuration for a service from environment variables.
    ///
    /// # Errors
    ///
    /// See [`ExternalConfig::load`].
    pub fn from_env(service: CisService) -> Result<Self, Error> {
        Self::load(service, &EnvConfigSource)
    }

    /// Maximum retry interval as a Duration.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

fn read_property(source: &dyn ConfigSource, prefix: &str, name: &str) -> Option<String> {
    source
        .get(&format!("{prefix}_{name}"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(prefix: &str, name: &str, value: Option<String>) -> Result<Option<bool>, Error> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1") => Ok(Some(true)),
        Some("false" | "0") => Ok(Some(false)),
        Some(other) => Err(Error::ConfigError(format!(
            "{prefix}_{name} must be a boolean, got `{other}`"
        ))),
    }
}

fn parse_number<T>(prefix: &str, name: &str, value: Option<String>) -> Result<T, Error>
where
    T: std::str::FromStr + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|_| {
            Error::ConfigError(format!("{prefix}_{name} must be a number, got `{raw}`"))
        }),
    }
}
