//! # cis-core
//!
//! Core types and utilities shared by the Cloud Internet Services (CIS) SDK crates.
//!
//! ## Modules
//!
//! - [`error`] - Error type carrying raw responses for API and decode failures
//! - [`auth`] - Request authenticators
//! - [`config`] - Service options and external (environment) configuration
//! - [`client`] - HTTP service client, retry policy and request deadlines
//! - [`response`] - Response envelope and raw transport response
//! - [`headers`] - Custom header setters for operation options
//! - [`query`] - Query parameter builder
//! - [`timestamp`] - Serde helpers for CIS timestamps
//! - [`types`] - Service catalogue and regional endpoints

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod query;
pub mod response;
pub mod timestamp;
pub mod types;

// Re-export commonly used types
pub use auth::{AuthType, Authenticator};
pub use client::{ClientConfig, RequestContext, RetryPolicy, ServiceClient, ServiceClientBuilder};
pub use config::{ConfigSource, EnvConfigSource, ExternalConfig, ServiceOptions};
pub use error::{Error, Result};
pub use response::{DetailedResponse, RawResponse, ResponseEnvelope, ResultInfo};
pub use types::{service_url_for_region, CisService, DEFAULT_SERVICE_URL};
