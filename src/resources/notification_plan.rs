//! Notification plan resource
//!
//! A plan names the notifications to fire for each alarm state transition.

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{require_str, str_vec};
use serde::Serialize;
use serde_json::Value;

/// A notification plan
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPlan {
    pub id: String,
    pub label: String,
    /// Notification ids fired on transition to CRITICAL
    pub critical_state: Vec<String>,
    /// Notification ids fired on transition to WARNING
    pub warning_state: Vec<String>,
    /// Notification ids fired on transition to OK
    pub ok_state: Vec<String>,
}

impl NotificationPlan {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "notification plan", "id")?.to_string(),
            label: require_str(value, "notification plan", "label")?.to_string(),
            critical_state: str_vec(value, "critical_state"),
            warning_state: str_vec(value, "warning_state"),
            ok_state: str_vec(value, "ok_state"),
        })
    }
}

/// Fields for creating or updating a notification plan. Absent fields are
/// omitted from the wire payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationPlanParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_state: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_state: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok_state: Option<Vec<String>>,
}

/// List all notification plans, optionally resuming from a marker
pub fn list_notification_plans(
    client: &MonitoringClient,
    start_marker: Option<&str>,
) -> PagedSequence<NotificationPlan> {
    let descriptor = FetchDescriptor::items("/notification_plans", NotificationPlan::from_json)
        .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Fetch one notification plan by id
pub async fn get_notification_plan(
    client: &MonitoringClient,
    notification_plan_id: &str,
) -> Result<NotificationPlan> {
    let value = client
        .get_object(&format!("/notification_plans/{notification_plan_id}"))
        .await?;
    NotificationPlan::from_json(&value)
}

/// Create a notification plan and re-fetch its canonical record
pub async fn create_notification_plan(
    client: &MonitoringClient,
    params: &NotificationPlanParams,
) -> Result<NotificationPlan> {
    let location = client.create_resource("/notification_plans", params).await?;
    get_notification_plan(client, location.require("notification_plan_id")?).await
}

/// Update a notification plan and re-fetch its canonical record
pub async fn update_notification_plan(
    client: &MonitoringClient,
    notification_plan_id: &str,
    params: &NotificationPlanParams,
) -> Result<NotificationPlan> {
    let location = client
        .update_resource(
            &format!("/notification_plans/{notification_plan_id}"),
            params,
        )
        .await?;
    get_notification_plan(client, location.require("notification_plan_id")?).await
}

/// Delete a notification plan; true iff the service confirmed with 204
pub async fn delete_notification_plan(
    client: &MonitoringClient,
    notification_plan_id: &str,
) -> Result<bool> {
    client
        .delete_resource(&format!("/notification_plans/{notification_plan_id}"))
        .await
}
