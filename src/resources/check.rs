//! Check resource
//!
//! A check is a periodic probe bound to an entity: what to measure, from
//! which monitoring zones, how often and with what timeout.

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{opt_str, require_i64, require_str, str_vec};
use serde::Serialize;
use serde_json::Value;

/// A check bound to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub id: String,
    pub label: Option<String>,
    /// Check type id, e.g. `remote.ping`
    pub kind: String,
    /// Type-specific probe settings
    pub details: Value,
    pub monitoring_zones: Vec<String>,
    pub target_alias: Option<String>,
    pub target_resolver: Option<String>,
    pub timeout: i64,
    pub period: i64,
    /// Owning entity
    pub entity_id: String,
}

impl Check {
    /// Build a check from a decoded JSON record; `entity_id` comes from the
    /// request context, not the record itself.
    pub fn from_json(value: &Value, entity_id: &str) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "check", "id")?.to_string(),
            label: opt_str(value, "label"),
            kind: require_str(value, "check", "type")?.to_string(),
            details: value.get("details").cloned().unwrap_or(Value::Null),
            monitoring_zones: str_vec(value, "monitoring_zones_poll"),
            target_alias: opt_str(value, "target_alias"),
            target_resolver: opt_str(value, "target_resolver"),
            timeout: require_i64(value, "check", "timeout")?,
            period: require_i64(value, "check", "period")?,
            entity_id: entity_id.to_string(),
        })
    }
}

/// Fields for creating, updating or test-running a check. Absent fields are
/// omitted from the wire payload. The default carries the service's
/// conventional timeout/period so a minimal params value is valid.
#[derive(Debug, Clone, Serialize)]
pub struct CheckParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<i64>,
    #[serde(rename = "monitoring_zones_poll", skip_serializing_if = "Option::is_none")]
    pub monitoring_zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resolver: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            who: None,
            why: None,
            label: None,
            timeout: Some(29),
            period: Some(30),
            monitoring_zones: None,
            target_alias: None,
            target_resolver: None,
            kind: None,
            details: None,
        }
    }
}

/// List an entity's checks, optionally resuming from a marker
pub fn list_checks(
    client: &MonitoringClient,
    entity_id: &str,
    start_marker: Option<&str>,
) -> PagedSequence<Check> {
    let owner = entity_id.to_string();
    let descriptor = FetchDescriptor::items(format!("/entities/{entity_id}/checks"), move |value| {
        Check::from_json(value, &owner)
    })
    .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Fetch one check by id
pub async fn get_check(
    client: &MonitoringClient,
    entity_id: &str,
    check_id: &str,
) -> Result<Check> {
    let value = client
        .get_object(&format!("/entities/{entity_id}/checks/{check_id}"))
        .await?;
    Check::from_json(&value, entity_id)
}

/// Create a check and re-fetch its canonical record from the resolved
/// location ids
pub async fn create_check(
    client: &MonitoringClient,
    entity_id: &str,
    params: &CheckParams,
) -> Result<Check> {
    let location = client
        .create_resource(&format!("/entities/{entity_id}/checks"), params)
        .await?;
    get_check(
        client,
        location.require("entity_id")?,
        location.require("check_id")?,
    )
    .await
}

/// Update a check and re-fetch its canonical record
pub async fn update_check(
    client: &MonitoringClient,
    entity_id: &str,
    check_id: &str,
    params: &CheckParams,
) -> Result<Check> {
    let location = client
        .update_resource(&format!("/entities/{entity_id}/checks/{check_id}"), params)
        .await?;
    get_check(
        client,
        location.require("entity_id")?,
        location.require("check_id")?,
    )
    .await
}

/// Delete a check; true iff the service confirmed with 204
pub async fn delete_check(
    client: &MonitoringClient,
    entity_id: &str,
    check_id: &str,
) -> Result<bool> {
    client
        .delete_resource(&format!("/entities/{entity_id}/checks/{check_id}"))
        .await
}

/// Run a check once without persisting it, returning the raw probe data
pub async fn test_check(
    client: &MonitoringClient,
    entity_id: &str,
    params: &CheckParams,
) -> Result<Value> {
    client
        .post_object(&format!("/entities/{entity_id}/test-check"), params)
        .await
}

/// Delete every check on an entity, enumerating them from the service
pub async fn delete_all_checks(client: &MonitoringClient, entity_id: &str) -> Result<()> {
    let mut checks = list_checks(client, entity_id, None);
    while let Some(check) = checks.next().await? {
        delete_check(client, &check.entity_id, &check.id).await?;
    }
    Ok(())
}
