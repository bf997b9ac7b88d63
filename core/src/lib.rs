//! Blocking client for the RedisGreen hosted Redis API.
//!
//! # Overview
//! `RedisGreenClient` acts as one account, identified by its API token, and
//! exposes list/create/get/delete for servers and monitors. Each call is a
//! single synchronous HTTP round-trip; there are no retries and no state
//! beyond the token and the `ClientConfig`.
//!
//! # Design
//! - One pipeline (`RedisGreenClient::execute`) owns headers, transport and
//!   status-to-error mapping. Resource methods are thin wrappers.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default; tests can substitute their own.
//! - Payloads are typed structs (`CreateServer`, `CreateMonitor`) that
//!   serialize to the service's wire format.
//! - All validation of plans, regions and URLs is left to the service.
//!
//! ```no_run
//! use redisgreen_core::{CreateServer, RedisGreenClient};
//!
//! let client = RedisGreenClient::new("my-token");
//! let server = client.create_server(&CreateServer::new("cache", "dev").with_replicas(1))?;
//! println!("{} -> {}", server.name, server.url);
//! # Ok::<(), redisgreen_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod monitors;
mod servers;
pub mod types;

pub use client::{check_response, RedisGreenClient};
pub use config::ClientConfig;
pub use error::{ApiError, Result, ServiceError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{CreateMonitor, CreateServer, Monitor, Server};
