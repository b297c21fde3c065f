//! Zone lockdown client and data models for CIS.
//!
//! Lockdown rules restrict URL patterns of a zone to a set of client IP addresses or
//! ranges. This crate covers listing, creating, reading, updating and deleting them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ZoneLockdownV1, ZoneLockdownV1Builder};
pub use models::{
    CreateZoneLockdownRuleOptions, DeleteLockdownResp, DeleteLockdownRespResult,
    DeleteZoneLockdownRuleOptions, GetLockdownOptions, ListAllZoneLockdownRulesOptions,
    ListLockdownResp, LockdownInputConfigurationsItem, LockdownObject, LockdownResp,
    LockdownSettings, LockdownTarget, UpdateLockdownRuleOptions,
};

/// Convenient result alias that reuses the shared CIS error type.
pub type Result<T> = cis_core::Result<T>;
