//! Service catalog resources
//!
//! Read-only listings describing what the service supports: available check
//! types, notification types and the monitoring zones probes run from.

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{opt_str, require_str, str_vec};
use serde_json::Value;

/// One configurable field of a check or notification type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeField {
    pub name: String,
    pub description: Option<String>,
    pub optional: bool,
}

impl TypeField {
    fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            name: require_str(value, "type field", "name")?.to_string(),
            description: opt_str(value, "description"),
            optional: value
                .get("optional")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    fn vec_from_json(value: &Value) -> Result<Vec<Self>> {
        value
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().map(Self::from_json).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A kind of check the service can run, e.g. `remote.ping`
#[derive(Debug, Clone, PartialEq)]
pub struct CheckType {
    pub id: String,
    pub fields: Vec<TypeField>,
    /// Whether probes run from monitoring zones rather than on the host
    pub is_remote: bool,
}

impl CheckType {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "check type", "id")?.to_string(),
            fields: TypeField::vec_from_json(value)?,
            is_remote: value.get("type").and_then(Value::as_str) == Some("remote"),
        })
    }
}

/// A kind of notification endpoint the service can deliver to
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationType {
    pub id: String,
    pub fields: Vec<TypeField>,
}

impl NotificationType {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "notification type", "id")?.to_string(),
            fields: TypeField::vec_from_json(value)?,
        })
    }
}

/// A location remote checks probe from
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringZone {
    pub id: String,
    pub label: String,
    pub country_code: String,
    pub source_ips: Vec<String>,
}

impl MonitoringZone {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "monitoring zone", "id")?.to_string(),
            label: require_str(value, "monitoring zone", "label")?.to_string(),
            country_code: require_str(value, "monitoring zone", "country_code")?.to_string(),
            source_ips: str_vec(value, "source_ips"),
        })
    }
}

/// List the check types the service supports
pub fn list_check_types(client: &MonitoringClient) -> PagedSequence<CheckType> {
    client.paged(FetchDescriptor::items("/check_types", CheckType::from_json))
}

/// List the notification types the service supports
pub fn list_notification_types(client: &MonitoringClient) -> PagedSequence<NotificationType> {
    client.paged(FetchDescriptor::items(
        "/notification_types",
        NotificationType::from_json,
    ))
}

/// List the monitoring zones remote checks can probe from
pub fn list_monitoring_zones(client: &MonitoringClient) -> PagedSequence<MonitoringZone> {
    client.paged(FetchDescriptor::items(
        "/monitoring_zones",
        MonitoringZone::from_json,
    ))
}
