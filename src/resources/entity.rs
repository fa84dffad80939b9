//! Entity resource
//!
//! An entity is the monitored thing - a host or device with addresses that
//! checks and alarms hang off. Deleting an entity that still has children
//! fails with a `childrenExistError`; [`delete_entity`] can optionally clear
//! the children and retry, a bounded number of times.

use crate::api::client::MonitoringClient;
use crate::error::{Error, Result};
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{alarm, check, require_str};
use serde::Serialize;
use serde_json::{Map, Value};

/// A monitored entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub label: String,
    /// (label, address) pairs from the entity's ip_addresses mapping
    pub ip_addresses: Vec<(String, String)>,
    pub metadata: Map<String, Value>,
}

impl Entity {
    /// Build an entity from a decoded JSON record
    pub fn from_json(value: &Value) -> Result<Self> {
        let ip_addresses = value
            .get("ip_addresses")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(label, addr)| {
                        (
                            label.clone(),
                            addr.as_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: require_str(value, "entity", "id")?.to_string(),
            label: require_str(value, "entity", "label")?.to_string(),
            ip_addresses,
            metadata: value
                .get("metadata")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// Fields for creating or updating an entity. Absent fields are omitted
/// from the wire payload entirely, never sent as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// List all entities, optionally resuming from a marker
pub fn list_entities(client: &MonitoringClient, start_marker: Option<&str>) -> PagedSequence<Entity> {
    let descriptor =
        FetchDescriptor::items("/entities", Entity::from_json).with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Fetch one entity by id
pub async fn get_entity(client: &MonitoringClient, entity_id: &str) -> Result<Entity> {
    let value = client.get_object(&format!("/entities/{entity_id}")).await?;
    Entity::from_json(&value)
}

/// Create an entity. The canonical record is re-fetched from the id the
/// location header resolves to; the create response body is not used.
pub async fn create_entity(client: &MonitoringClient, params: &EntityParams) -> Result<Entity> {
    let location = client.create_resource("/entities", params).await?;
    get_entity(client, location.require("entity_id")?).await
}

/// Update an entity and re-fetch its canonical record
pub async fn update_entity(
    client: &MonitoringClient,
    entity_id: &str,
    params: &EntityParams,
) -> Result<Entity> {
    let location = client
        .update_resource(&format!("/entities/{entity_id}"), params)
        .await?;
    get_entity(client, location.require("entity_id")?).await
}

/// Bound on child-clearing passes before the last validation error is
/// surfaced to the caller.
pub const MAX_DELETE_CHILD_PASSES: usize = 3;

/// Delete an entity; true iff the service confirmed with 204.
///
/// With `delete_children` set, a `childrenExistError` rejection triggers
/// deletion of the reported child kind (checks or alarms) followed by a
/// retry, at most [`MAX_DELETE_CHILD_PASSES`] times. Children are
/// re-enumerated from the service on every pass, so a failure partway
/// through one pass is recovered by the next.
pub async fn delete_entity(
    client: &MonitoringClient,
    entity_id: &str,
    delete_children: bool,
) -> Result<bool> {
    let url = format!("/entities/{entity_id}");
    let mut passes = 0;

    loop {
        match client.delete_resource(&url).await {
            Ok(deleted) => return Ok(deleted),
            Err(Error::Validation {
                code,
                kind,
                message,
                details,
            }) if delete_children
                && kind == "childrenExistError"
                && passes < MAX_DELETE_CHILD_PASSES =>
            {
                match details.get("type").and_then(Value::as_str) {
                    Some("Check") => check::delete_all_checks(client, entity_id).await?,
                    Some("Alarm") => alarm::delete_all_alarms(client, entity_id).await?,
                    _ => {
                        return Err(Error::Validation {
                            code,
                            kind,
                            message,
                            details,
                        })
                    }
                }
                passes += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_from_json_maps_addresses_and_metadata() {
        let raw = json!({
            "id": "enABC",
            "label": "web-1",
            "ip_addresses": {"public": "203.0.113.5", "private": "10.0.0.5"},
            "metadata": {"rack": "r12"}
        });

        let entity = Entity::from_json(&raw).unwrap();
        assert_eq!(entity.id, "enABC");
        assert_eq!(entity.label, "web-1");
        assert_eq!(entity.ip_addresses.len(), 2);
        assert!(entity
            .ip_addresses
            .contains(&("public".to_string(), "203.0.113.5".to_string())));
        assert_eq!(entity.metadata["rack"], "r12");
    }

    #[test]
    fn entity_from_json_tolerates_null_metadata() {
        let raw = json!({"id": "enABC", "label": "web-1", "metadata": null});
        let entity = Entity::from_json(&raw).unwrap();
        assert!(entity.metadata.is_empty());
        assert!(entity.ip_addresses.is_empty());
    }

    #[test]
    fn entity_from_json_requires_id() {
        let raw = json!({"label": "web-1"});
        assert!(matches!(
            Entity::from_json(&raw),
            Err(Error::MissingField { record: "entity", field: "id" })
        ));
    }

    #[test]
    fn entity_params_omit_absent_fields() {
        let params = EntityParams {
            label: Some("web-1".to_string()),
            ..EntityParams::default()
        };
        let wire = serde_json::to_value(&params).unwrap();
        assert_eq!(wire, json!({"label": "web-1"}));
    }
}
