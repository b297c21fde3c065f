//! Global load balancer models: operation options and response payloads.

use chrono::{DateTime, Utc};
use cis_core::response::ResponseEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

/// Session affinity applied by a load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAffinity {
    /// No affinity
    None,
    /// Cookie based affinity
    Cookie,
    /// Cookie with client IP fallback
    IpCookie,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// Pool steering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringPolicy {
    /// Failover order
    Off,
    /// Region and PoP pools
    Geo,
    /// Random pool selection
    Random,
    /// Lowest latency pool
    DynamicLatency,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// Load balancer as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancerPack {
    /// Identifier
    pub id: String,
    /// Creation time
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "cis_core::timestamp::option"
    )]
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "cis_core::timestamp::option"
    )]
    pub modified_on: Option<DateTime<Utc>>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// DNS name the load balancer answers for
    pub name: String,
    /// DNS TTL in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Pool used when all other pools are unhealthy
    #[serde(default)]
    pub fallback_pool: String,
    /// Pools in failover order
    #[serde(default)]
    pub default_pools: Vec<String>,
    /// Pools per region code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub region_pools: BTreeMap<String, Value>,
    /// Pools per point of presence
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pop_pools: BTreeMap<String, Value>,
    /// Whether traffic is proxied
    #[serde(default)]
    pub proxied: bool,
    /// Whether the load balancer is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Session affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_affinity: Option<SessionAffinity>,
    /// Steering policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_policy: Option<SteeringPolicy>,
}

/// Result of a delete: the identifier of the removed load balancer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteLoadBalancersRespResult {
    /// Identifier
    pub id: String,
}

/// Paginated list of load balancers.
pub type ListLoadBalancersResp = ResponseEnvelope<Vec<LoadBalancerPack>>;

/// Single load balancer.
pub type LoadBalancersResp = ResponseEnvelope<LoadBalancerPack>;

/// Acknowledgment of a deleted load balancer.
pub type DeleteLoadBalancersResp = ResponseEnvelope<DeleteLoadBalancersRespResult>;

/// Options for `list_all_load_balancers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllLoadBalancersOptions {
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl ListAllLoadBalancersOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Load balancer fields sent on create and edit. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancerSettings {
    /// DNS name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fallback pool identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_pool: Option<String>,
    /// Pools in failover order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pools: Option<Vec<String>>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// DNS TTL in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Pools per region code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_pools: Option<BTreeMap<String, Value>>,
    /// Pools per point of presence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pop_pools: Option<BTreeMap<String, Value>>,
    /// Proxy traffic through CIS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Enable the load balancer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Session affinity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_affinity: Option<SessionAffinity>,
    /// Steering policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steering_policy: Option<SteeringPolicy>,
}

/// Options for `create_load_balancer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLoadBalancerOptions {
    /// Request body
    pub settings: LoadBalancerSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl CreateLoadBalancerOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for `edit_load_balancer`.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct EditLoadBalancerOptions {
    /// Load balancer identifier
    #[validate(length(min = 1, message = "load_balancer_identifier must not be empty"))]
    pub load_balancer_identifier: String,
    /// Request body
    pub settings: LoadBalancerSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl EditLoadBalancerOptions {
    /// Create options for a load balancer.
    #[must_use]
    pub fn new(load_balancer_identifier: impl Into<String>) -> Self {
        Self {
            load_balancer_identifier: load_balancer_identifier.into(),
            ..Self::default()
        }
    }

    /// Set the load balancer identifier.
    #[must_use]
    pub fn with_load_balancer_identifier(mut self, id: impl Into<String>) -> Self {
        self.load_balancer_identifier = id.into();
        self
    }
}

/// Generates the body setters shared by create and edit options.
macro_rules! impl_settings_setters {
    ($($options:ty),+) => {
        $(
            impl $options {
                /// Set the DNS name.
                #[must_use]
                pub fn with_name(mut self, name: impl Into<String>) -> Self {
                    self.settings.name = Some(name.into());
                    self
                }

                /// Set the fallback pool.
                #[must_use]
                pub fn with_fallback_pool(mut self, pool: impl Into<String>) -> Self {
                    self.settings.fallback_pool = Some(pool.into());
                    self
                }

                /// Set the default pools.
                #[must_use]
                pub fn with_default_pools(mut self, pools: Vec<String>) -> Self {
                    self.settings.default_pools = Some(pools);
                    self
                }

                /// Set the description.
                #[must_use]
                pub fn with_description(mut self, description: impl Into<String>) -> Self {
                    self.settings.description = Some(description.into());
                    self
                }

                /// Set the DNS TTL.
                #[must_use]
                pub fn with_ttl(mut self, ttl: i64) -> Self {
                    self.settings.ttl = Some(ttl);
                    self
                }

                /// Set the region pools.
                #[must_use]
                pub fn with_region_pools(mut self, pools: BTreeMap<String, Value>) -> Self {
                    self.settings.region_pools = Some(pools);
                    self
                }

                /// Set the PoP pools.
                #[must_use]
                pub fn with_pop_pools(mut self, pools: BTreeMap<String, Value>) -> Self {
                    self.settings.pop_pools = Some(pools);
                    self
                }

                /// Set the proxied flag.
                #[must_use]
                pub fn with_proxied(mut self, proxied: bool) -> Self {
                    self.settings.proxied = Some(proxied);
                    self
                }

                /// Set the enabled flag.
                #[must_use]
                pub fn with_enabled(mut self, enabled: bool) -> Self {
                    self.settings.enabled = Some(enabled);
                    self
                }

                /// Set the session affinity.
                #[must_use]
                pub fn with_session_affinity(mut self, affinity: SessionAffinity) -> Self {
                    self.settings.session_affinity = Some(affinity);
                    self
                }

                /// Set the steering policy.
                #[must_use]
                pub fn with_steering_policy(mut self, policy: SteeringPolicy) -> Self {
                    self.settings.steering_policy = Some(policy);
                    self
                }
            }
        )+
    };
}

impl_settings_setters!(CreateLoadBalancerOptions, EditLoadBalancerOptions);

/// Options for `delete_load_balancer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct DeleteLoadBalancerOptions {
    /// Load balancer identifier
    #[validate(length(min = 1, message = "load_balancer_identifier must not be empty"))]
    pub load_balancer_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl DeleteLoadBalancerOptions {
    /// Create options for a load balancer.
    #[must_use]
    pub fn new(load_balancer_identifier: impl Into<String>) -> Self {
        Self {
            load_balancer_identifier: load_balancer_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the load balancer identifier.
    #[must_use]
    pub fn with_load_balancer_identifier(mut self, id: impl Into<String>) -> Self {
        self.load_balancer_identifier = id.into();
        self
    }
}

/// Options for `get_load_balancer_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GetLoadBalancerSettingsOptions {
    /// Load balancer identifier
    #[validate(length(min = 1, message = "load_balancer_identifier must not be empty"))]
    pub load_balancer_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl GetLoadBalancerSettingsOptions {
    /// Create options for a load balancer.
    #[must_use]
    pub fn new(load_balancer_identifier: impl Into<String>) -> Self {
        Self {
            load_balancer_identifier: load_balancer_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the load balancer identifier.
    #[must_use]
    pub fn with_load_balancer_identifier(mut self, id: impl Into<String>) -> Self {
        self.load_balancer_identifier = id.into();
        self
    }
}

cis_core::impl_custom_headers!(
    ListAllLoadBalancersOptions,
    CreateLoadBalancerOptions,
    EditLoadBalancerOptions,
    DeleteLoadBalancerOptions,
    GetLoadBalancerSettingsOptions,
);
