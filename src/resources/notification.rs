//! Notification resource
//!
//! A notification is a delivery endpoint (email address, webhook, ...)
//! referenced from notification plans.

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::require_str;
use serde::Serialize;
use serde_json::Value;

/// A notification endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub label: String,
    /// Notification type id, e.g. `email` or `webhook`
    pub kind: String,
    /// Type-specific delivery settings
    pub details: Value,
}

impl Notification {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "notification", "id")?.to_string(),
            label: require_str(value, "notification", "label")?.to_string(),
            kind: require_str(value, "notification", "type")?.to_string(),
            details: value.get("details").cloned().unwrap_or(Value::Null),
        })
    }
}

/// Fields for creating or updating a notification. Absent fields are
/// omitted from the wire payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// List all notifications, optionally resuming from a marker
pub fn list_notifications(
    client: &MonitoringClient,
    start_marker: Option<&str>,
) -> PagedSequence<Notification> {
    let descriptor = FetchDescriptor::items("/notifications", Notification::from_json)
        .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Fetch one notification by id
pub async fn get_notification(
    client: &MonitoringClient,
    notification_id: &str,
) -> Result<Notification> {
    let value = client
        .get_object(&format!("/notifications/{notification_id}"))
        .await?;
    Notification::from_json(&value)
}

/// Create a notification and re-fetch its canonical record
pub async fn create_notification(
    client: &MonitoringClient,
    params: &NotificationParams,
) -> Result<Notification> {
    let location = client.create_resource("/notifications", params).await?;
    get_notification(client, location.require("notification_id")?).await
}

/// Update a notification and re-fetch its canonical record
pub async fn update_notification(
    client: &MonitoringClient,
    notification_id: &str,
    params: &NotificationParams,
) -> Result<Notification> {
    let location = client
        .update_resource(&format!("/notifications/{notification_id}"), params)
        .await?;
    get_notification(client, location.require("notification_id")?).await
}

/// Delete a notification; true iff the service confirmed with 204
pub async fn delete_notification(
    client: &MonitoringClient,
    notification_id: &str,
) -> Result<bool> {
    client
        .delete_resource(&format!("/notifications/{notification_id}"))
        .await
}
