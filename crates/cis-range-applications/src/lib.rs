//! Range application client and data models for CIS.
//!
//! Range applications proxy arbitrary TCP/UDP traffic through the CIS edge. This crate
//! provides the request and response models and an asynchronous client covering list,
//! create, get, update and delete.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{RangeApplicationsV1, RangeApplicationsV1Builder};
pub use models::{
    Connectivity, CreateRangeAppOptions, DeleteRangeAppOptions, DnsType, EdgeIpsType,
    GetRangeAppOptions, ListRangeAppsOptions, ProxyProtocol, RangeAppReqDns, RangeAppReqEdgeIps,
    RangeAppReqOriginDns, RangeAppResp, RangeAppSettings, RangeApplicationObject, RangeApps,
    SortDirection, TlsMode, TrafficType, UpdateRangeAppOptions,
};

/// Convenient result alias that reuses the shared CIS error type.
pub type Result<T> = cis_core::Result<T>;
