//! Core CIS domain types.
//!
//! This module enumerates the CIS services covered by the SDK together with the
//! per-service naming conventions (configuration prefixes, user agents, timeouts).

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::client::{
    GLOBAL_LOAD_BALANCER_DEFAULT_TIMEOUT, RANGE_APPLICATIONS_DEFAULT_TIMEOUT,
    ZONE_LOCKDOWN_DEFAULT_TIMEOUT,
};
use crate::error::{Error, Result};

/// Default public endpoint shared by all CIS services.
pub const DEFAULT_SERVICE_URL: &str = "https://api.cis.cloud.ibm.com";

/// Supported CIS services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CisService {
    /// Global load balancers
    GlobalLoadBalancer,
    /// Range (spectrum) applications
    RangeApplications,
    /// Zone lockdown firewall rules
    ZoneLockdown,
}

impl CisService {
    /// Returns the service name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GlobalLoadBalancer => "global_load_balancer",
            Self::RangeApplications => "range_applications",
            Self::ZoneLockdown => "zone_lockdown",
        }
    }

    /// Returns all available services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GlobalLoadBalancer,
            Self::RangeApplications,
            Self::ZoneLockdown,
        ]
    }

    /// Prefix of the environment variables configuring this service,
    /// e.g. `GLOBAL_LOAD_BALANCER` for `GLOBAL_LOAD_BALANCER_URL`.
    #[must_use]
    pub const fn config_prefix(&self) -> &'static str {
        match self {
            Self::GlobalLoadBalancer => "GLOBAL_LOAD_BALANCER",
            Self::RangeApplications => "RANGE_APPLICATIONS",
            Self::ZoneLockdown => "ZONE_LOCKDOWN",
        }
    }

    /// Returns the default request timeout for the service.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        match self {
            Self::GlobalLoadBalancer => Duration::from_secs(GLOBAL_LOAD_BALANCER_DEFAULT_TIMEOUT),
            Self::RangeApplications => Duration::from_secs(RANGE_APPLICATIONS_DEFAULT_TIMEOUT),
            Self::ZoneLockdown => Duration::from_secs(ZONE_LOCKDOWN_DEFAULT_TIMEOUT),
        }
    }
}

impl FromStr for CisService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "global_load_balancer" => Ok(Self::GlobalLoadBalancer),
            "range_applications" => Ok(Self::RangeApplications),
            "zone_lockdown" => Ok(Self::ZoneLockdown),
            _ => Err(Error::ConfigError(format!("Unknown service: {s}"))),
        }
    }
}

impl std::fmt::Display for CisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Regional endpoints known for CIS services.
const REGIONAL_ENDPOINTS: &[(&str, &str)] = &[
    ("global", DEFAULT_SERVICE_URL),
    ("private", "https://api.private.cis.cloud.ibm.com"),
];

/// Resolve the service URL for a region.
///
/// # Errors
///
/// Returns a configuration error when the region is unknown.
pub fn service_url_for_region(region: &str) -> Result<&'static str> {
    REGIONAL_ENDPOINTS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, url)| *url)
        .ok_or_else(|| Error::ConfigError(format!("service URL for region '{region}' not found")))
}
