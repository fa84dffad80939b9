//! Monitoring API interaction module
//!
//! This module provides the core plumbing for talking to the monitoring
//! service: the HTTP transport, response decoding, resource identity
//! resolution and the client tying them together.
//!
//! # Module Structure
//!
//! - [`http`] - HTTP transport wrapper over the REST API
//! - [`response`] - status interpretation and body decoding
//! - [`location`] - location-header to resource-id resolution
//! - [`client`] - main client and shared create/update/delete helpers
//!
//! # Example
//!
//! ```ignore
//! use cloudmon::{Config, MonitoringClient};
//! use cloudmon::resources::entity;
//!
//! async fn example() -> cloudmon::Result<()> {
//!     let client = MonitoringClient::new(&Config::load())?;
//!     let mut entities = entity::list_entities(&client, None);
//!     while let Some(e) = entities.next().await? {
//!         println!("{} {}", e.id, e.label);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod location;
pub mod response;
