//! Async client for a cloud monitoring management API.
//!
//! The service manages entities (monitored hosts), checks, alarms,
//! notifications and notification plans over a paginated REST interface.
//! Two mechanisms carry the whole surface:
//!
//! - every list operation runs through the cursor pagination engine in
//!   [`pager`]: a lazy sequence that fetches one page at a time, strictly
//!   on demand;
//! - every create/update resolves the new resource's identity from the
//!   response's `Location` header ([`api::location`]) and re-fetches the
//!   canonical record, because those endpoints return no body.
//!
//! # Example
//!
//! ```ignore
//! use cloudmon::{Config, MonitoringClient};
//! use cloudmon::resources::{check, entity};
//!
//! #[tokio::main]
//! async fn main() -> cloudmon::Result<()> {
//!     let client = MonitoringClient::new(&Config::load())?;
//!
//!     let mut entities = entity::list_entities(&client, None);
//!     while let Some(e) = entities.next().await? {
//!         let checks = check::list_checks(&client, &e.id, None).try_collect().await?;
//!         println!("{}: {} checks", e.label, checks.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod pager;
pub mod resources;

pub use api::client::MonitoringClient;
pub use config::Config;
pub use error::{Error, Result};
