//! Global load balancer client and data models for CIS.
//!
//! Provides typed structures and an asynchronous client for the load balancers of a
//! CIS zone: list, create, edit, delete and read settings.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{GlobalLoadBalancerV1, GlobalLoadBalancerV1Builder};
pub use models::{
    CreateLoadBalancerOptions, DeleteLoadBalancerOptions, DeleteLoadBalancersResp,
    DeleteLoadBalancersRespResult, EditLoadBalancerOptions, GetLoadBalancerSettingsOptions,
    ListAllLoadBalancersOptions, ListLoadBalancersResp, LoadBalancerPack, LoadBalancerSettings,
    LoadBalancersResp, SessionAffinity, SteeringPolicy,
};

/// Convenient result alias that reuses the shared CIS error type.
pub type Result<T> = cis_core::Result<T>;
