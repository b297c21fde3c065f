//! Range application models.

use chrono::{DateTime, Utc};
use cis_core::response::ResponseEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::{Validate, ValidationError};

/// DNS record type of a range application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DnsType {
    /// CNAME record
    #[serde(rename = "CNAME")]
    Cname,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// PROXY protocol sent to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyProtocol {
    /// Disabled
    Off,
    /// PROXY protocol v1
    V1,
    /// PROXY protocol v2
    V2,
    /// Simple proxy protocol
    Simple,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// Edge IP allocation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeIpsType {
    /// Dynamically allocated edge IPs
    Dynamic,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// IP families served at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// IPv4 and IPv6
    All,
    /// IPv4 only
    Ipv4,
    /// IPv6 only
    Ipv6,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// TLS termination mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// No TLS termination
    Off,
    /// TLS at the edge, plain to the origin
    Flexible,
    /// TLS end to end without origin certificate validation
    Full,
    /// TLS end to end with origin certificate validation
    Strict,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// How traffic is handled at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficType {
    /// Pass-through
    Direct,
    /// HTTP features applied
    Http,
    /// HTTPS features applied
    Https,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

/// Sort direction of list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// DNS record fronting the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAppReqDns {
    /// Record type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub dns_type: Option<DnsType>,
    /// Record name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RangeAppReqDns {
    /// A CNAME record with the given name.
    #[must_use]
    pub fn cname(name: impl Into<String>) -> Self {
        Self {
            dns_type: Some(DnsType::Cname),
            name: Some(name.into()),
        }
    }
}

fn dns_has_name(dns: &RangeAppReqDns) -> Result<(), ValidationError> {
    match dns.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(ValidationError::new("dns_name")
            .with_message("dns name must not be empty".into())),
    }
}

/// Origin addressed by DNS name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RangeAppReqOriginDns {
    /// Origin host name
    #[validate(length(min = 1, message = "origin_dns.name must not be empty"))]
    pub name: String,
}

impl RangeAppReqOriginDns {
    /// Create an origin DNS entry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Edge IP configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAppReqEdgeIps {
    /// Allocation type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ips_type: Option<EdgeIpsType>,
    /// Served IP families
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<Connectivity>,
}

/// Range application as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeApplicationObject {
    /// Identifier
    pub id: String,
    /// Edge protocol and port, e.g. `tcp/22`
    #[serde(default)]
    pub protocol: String,
    /// DNS record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<RangeAppReqDns>,
    /// Origin addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_direct: Option<Vec<String>>,
    /// Origin by DNS name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_dns: Option<RangeAppReqOriginDns>,
    /// Origin port used with `origin_dns`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_port: Option<i64>,
    /// IP firewall enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_firewall: Option<bool>,
    /// PROXY protocol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<ProxyProtocol>,
    /// Edge IPs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_ips: Option<RangeAppReqEdgeIps>,
    /// TLS mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsMode>,
    /// Traffic type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_type: Option<TrafficType>,
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
}

/// List of range applications. The endpoint sends no pagination metadata.
pub type RangeApps = ResponseEnvelope<Vec<RangeApplicationObject>>;

/// Single range application.
pub type RangeAppResp = ResponseEnvelope<RangeApplicationObject>;

/// Options for `list_range_apps`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRangeAppsOptions {
    /// Page number
    pub page: Option<i64>,
    /// Applications per page
    pub per_page: Option<i64>,
    /// Field to order by
    pub order: Option<String>,
    /// Sort direction
    pub direction: Option<SortDirection>,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl ListRangeAppsOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number.
    #[must_use]
    pub const fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the field to order by.
    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Range application fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct RangeAppSettings {
    /// Edge protocol and port
    #[validate(length(min = 1, message = "protocol must not be empty"))]
    pub protocol: String,
    /// DNS record
    #[validate(custom(function = "dns_has_name"))]
    pub dns: RangeAppReqDns,
    /// Origin addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_direct: Option<Vec<String>>,
    /// Origin by DNS name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub origin_dns: Option<RangeAppReqOriginDns>,
    /// Origin port used with `origin_dns`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_port: Option<i64>,
    /// IP firewall enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_firewall: Option<bool>,
    /// PROXY protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<ProxyProtocol>,
    /// Edge IPs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_ips: Option<RangeAppReqEdgeIps>,
    /// Traffic type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_type: Option<TrafficType>,
    /// TLS mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsMode>,
}

/// Options for `create_range_app`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CreateRangeAppOptions {
    /// Request body
    #[validate(nested)]
    pub settings: RangeAppSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl CreateRangeAppOptions {
    /// Create options with the required protocol and DNS record.
    #[must_use]
    pub fn new(protocol: impl Into<String>, dns: RangeAppReqDns) -> Self {
        Self {
            settings: RangeAppSettings {
                protocol: protocol.into(),
                dns,
                ..RangeAppSettings::default()
            },
            headers: HashMap::new(),
        }
    }
}

/// Options for `update_range_app`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UpdateRangeAppOptions {
    /// Application identifier
    #[validate(length(min = 1, message = "app_identifier must not be empty"))]
    pub app_identifier: String,
    /// Request body
    #[validate(nested)]
    pub settings: RangeAppSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl UpdateRangeAppOptions {
    /// Create options with the identifier, protocol and DNS record.
    #[must_use]
    pub fn new(
        app_identifier: impl Into<String>,
        protocol: impl Into<String>,
        dns: RangeAppReqDns,
    ) -> Self {
        let CreateRangeAppOptions { settings, headers } = CreateRangeAppOptions::new(protocol, dns);
        Self {
            app_identifier: app_identifier.into(),
            settings,
            headers,
        }
    }

    /// Set the application identifier.
    #[must_use]
    pub fn with_app_identifier(mut self, id: impl Into<String>) -> Self {
        self.app_identifier = id.into();
        self
    }
}

/// Generates the body setters shared by create and update options.
macro_rules! impl_settings_setters {
    ($($options:ty),+) => {
        $(
            impl $options {
                /// Set the edge protocol and port.
                #[must_use]
                pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
                    self.settings.protocol = protocol.into();
                    self
                }

                /// Set the DNS record.
                #[must_use]
                pub fn with_dns(mut self, dns: RangeAppReqDns) -> Self {
                    self.settings.dns = dns;
                    self
                }

                /// Set the origin addresses.
                #[must_use]
                pub fn with_origin_direct(mut self, origins: Vec<String>) -> Self {
                    self.settings.origin_direct = Some(origins);
                    self
                }

                /// Set the origin DNS name.
                #[must_use]
                pub fn with_origin_dns(mut self, origin_dns: RangeAppReqOriginDns) -> Self {
                    self.settings.origin_dns = Some(origin_dns);
                    self
                }

                /// Set the origin port.
                #[must_use]
                pub fn with_origin_port(mut self, port: i64) -> Self {
                    self.settings.origin_port = Some(port);
                    self
                }

                /// Enable or disable the IP firewall.
                #[must_use]
                pub fn with_ip_firewall(mut self, enabled: bool) -> Self {
                    self.settings.ip_firewall = Some(enabled);
                    self
                }

                /// Set the PROXY protocol.
                #[must_use]
                pub fn with_proxy_protocol(mut self, protocol: ProxyProtocol) -> Self {
                    self.settings.proxy_protocol = Some(protocol);
                    self
                }

                /// Set the edge IPs.
                #[must_use]
                pub fn with_edge_ips(mut self, edge_ips: RangeAppReqEdgeIps) -> Self {
                    self.settings.edge_ips = Some(edge_ips);
                    self
                }

                /// Set the traffic type.
                #[must_use]
                pub fn with_traffic_type(mut self, traffic_type: TrafficType) -> Self {
                    self.settings.traffic_type = Some(traffic_type);
                    self
                }

                /// Set the TLS mode.
                #[must_use]
                pub fn with_tls(mut self, tls: TlsMode) -> Self {
                    self.settings.tls = Some(tls);
                    self
                }
            }
        )+
    };
}

impl_settings_setters!(CreateRangeAppOptions, UpdateRangeAppOptions);

/// Options for `get_range_app`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GetRangeAppOptions {
    /// Application identifier
    #[validate(length(min = 1, message = "app_identifier must not be empty"))]
    pub app_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl GetRangeAppOptions {
    /// Create options for an application.
    #[must_use]
    pub fn new(app_identifier: impl Into<String>) -> Self {
        Self {
            app_identifier: app_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the application identifier.
    #[must_use]
    pub fn with_app_identifier(mut self, id: impl Into<String>) -> Self {
        self.app_identifier = id.into();
        self
    }
}

/// Options for `delete_range_app`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct DeleteRangeAppOptions {
    /// Application identifier
    #[validate(length(min = 1, message = "app_identifier must not be empty"))]
    pub app_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl DeleteRangeAppOptions {
    /// Create options for an application.
    #[must_use]
    pub fn new(app_identifier: impl Into<String>) -> Self {
        Self {
            app_identifier: app_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the application identifier.
    #[must_use]
    pub fn with_app_identifier(mut self, id: impl Into<String>) -> Self {
        self.app_identifier = id.into();
        self
    }
}

cis_core::impl_custom_headers!(
    ListRangeAppsOptions,
    CreateRangeAppOptions,
    UpdateRangeAppOptions,
    GetRangeAppOptions,
    DeleteRangeAppOptions,
);
