//! Alarm resource
//!
//! An alarm binds a check to a notification plan through a criteria
//! expression. This module also covers the account-wide alarm changelog and
//! per-alarm history endpoints.

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{check, opt_str, require_str};
use serde::Serialize;
use serde_json::{json, Value};

/// An alarm bound to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub id: String,
    /// Check type id the alarm's criteria applies to
    pub check_type: String,
    /// Criteria expression in the service's alarm DSL
    pub criteria: Option<String>,
    pub notification_plan_id: String,
    /// Owning entity
    pub entity_id: String,
}

impl Alarm {
    /// Build an alarm from a decoded JSON record; `entity_id` comes from the
    /// request context, not the record itself.
    pub fn from_json(value: &Value, entity_id: &str) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "alarm", "id")?.to_string(),
            check_type: require_str(value, "alarm", "check_type")?.to_string(),
            criteria: opt_str(value, "criteria"),
            notification_plan_id: require_str(value, "alarm", "notification_plan_id")?.to_string(),
            entity_id: entity_id.to_string(),
        })
    }
}

/// One entry in the account's alarm changelog
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmChangelog {
    pub id: String,
    pub alarm_id: String,
    pub entity_id: String,
    pub check_id: String,
    pub state: String,
    /// Epoch milliseconds, when present
    pub timestamp: Option<i64>,
}

impl AlarmChangelog {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "alarm changelog", "id")?.to_string(),
            alarm_id: require_str(value, "alarm changelog", "alarm_id")?.to_string(),
            entity_id: require_str(value, "alarm changelog", "entity_id")?.to_string(),
            check_id: require_str(value, "alarm changelog", "check_id")?.to_string(),
            state: require_str(value, "alarm changelog", "state")?.to_string(),
            timestamp: value.get("timestamp").and_then(Value::as_i64),
        })
    }
}

/// Fields for creating or updating an alarm. Absent fields are omitted from
/// the wire payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlarmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_plan_id: Option<String>,
}

/// List an entity's alarms, optionally resuming from a marker
pub fn list_alarms(
    client: &MonitoringClient,
    entity_id: &str,
    start_marker: Option<&str>,
) -> PagedSequence<Alarm> {
    let owner = entity_id.to_string();
    let descriptor = FetchDescriptor::items(format!("/entities/{entity_id}/alarms"), move |value| {
        Alarm::from_json(value, &owner)
    })
    .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Fetch one alarm by id
pub async fn get_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    alarm_id: &str,
) -> Result<Alarm> {
    let value = client
        .get_object(&format!("/entities/{entity_id}/alarms/{alarm_id}"))
        .await?;
    Alarm::from_json(&value, entity_id)
}

/// Create an alarm and re-fetch its canonical record from the resolved
/// location ids
pub async fn create_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    params: &AlarmParams,
) -> Result<Alarm> {
    let location = client
        .create_resource(&format!("/entities/{entity_id}/alarms"), params)
        .await?;
    get_alarm(
        client,
        location.require("entity_id")?,
        location.require("alarm_id")?,
    )
    .await
}

/// Update an alarm and re-fetch its canonical record
pub async fn update_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    alarm_id: &str,
    params: &AlarmParams,
) -> Result<Alarm> {
    let location = client
        .update_resource(&format!("/entities/{entity_id}/alarms/{alarm_id}"), params)
        .await?;
    get_alarm(
        client,
        location.require("entity_id")?,
        location.require("alarm_id")?,
    )
    .await
}

/// Delete an alarm; true iff the service confirmed with 204
pub async fn delete_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    alarm_id: &str,
) -> Result<bool> {
    client
        .delete_resource(&format!("/entities/{entity_id}/alarms/{alarm_id}"))
        .await
}

/// Evaluate alarm criteria against captured check data without persisting
/// anything, returning the evaluation result
pub async fn test_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    criteria: &str,
    check_data: &Value,
) -> Result<Value> {
    let payload = json!({
        "criteria": criteria,
        "check_data": check_data,
    });
    client
        .post_object(&format!("/entities/{entity_id}/test-alarm"), &payload)
        .await
}

/// Run a one-shot check and immediately evaluate alarm criteria against the
/// captured data
pub async fn test_check_and_alarm(
    client: &MonitoringClient,
    entity_id: &str,
    criteria: &str,
    check_params: &check::CheckParams,
) -> Result<Value> {
    let check_data = check::test_check(client, entity_id, check_params).await?;
    test_alarm(client, entity_id, criteria, &check_data).await
}

/// Delete every alarm on an entity, enumerating them from the service
pub async fn delete_all_alarms(client: &MonitoringClient, entity_id: &str) -> Result<()> {
    let mut alarms = list_alarms(client, entity_id, None);
    while let Some(alarm) = alarms.next().await? {
        delete_alarm(client, &alarm.entity_id, &alarm.id).await?;
    }
    Ok(())
}

/// List the account-wide alarm changelog
pub fn list_alarm_changelog(
    client: &MonitoringClient,
    start_marker: Option<&str>,
) -> PagedSequence<AlarmChangelog> {
    let descriptor = FetchDescriptor::items("/changelogs/alarms", AlarmChangelog::from_json)
        .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Checks that have history entries for an alarm
pub async fn list_alarm_history_checks(
    client: &MonitoringClient,
    entity_id: &str,
    alarm_id: &str,
) -> Result<Value> {
    client
        .get_object(&format!("/entities/{entity_id}/alarms/{alarm_id}/history"))
        .await
}

/// History entries for one alarm/check pair, as raw records
pub fn list_alarm_history(
    client: &MonitoringClient,
    entity_id: &str,
    alarm_id: &str,
    check_id: &str,
) -> PagedSequence<Value> {
    let descriptor = FetchDescriptor::items(
        format!("/entities/{entity_id}/alarms/{alarm_id}/history/{check_id}"),
        |value| Ok(value.clone()),
    );
    client.paged(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn alarm_from_json_carries_context_entity_id() {
        let raw = json!({
            "id": "alGHI",
            "check_type": "remote.ping",
            "criteria": "if (metric[\"duration\"] > 100) { return CRITICAL }",
            "notification_plan_id": "npXYZ"
        });

        let alarm = Alarm::from_json(&raw, "enABC").unwrap();
        assert_eq!(alarm.entity_id, "enABC");
        assert_eq!(alarm.notification_plan_id, "npXYZ");
        assert!(alarm.criteria.is_some());
    }

    #[test]
    fn alarm_from_json_requires_check_type() {
        let raw = json!({"id": "alGHI", "notification_plan_id": "npXYZ"});
        assert!(matches!(
            Alarm::from_json(&raw, "enABC"),
            Err(Error::MissingField { record: "alarm", field: "check_type" })
        ));
    }

    #[test]
    fn changelog_from_json_maps_all_ids() {
        let raw = json!({
            "id": "chl1",
            "alarm_id": "alGHI",
            "entity_id": "enABC",
            "check_id": "chDEF",
            "state": "CRITICAL",
            "timestamp": 1320890228991i64
        });

        let entry = AlarmChangelog::from_json(&raw).unwrap();
        assert_eq!(entry.alarm_id, "alGHI");
        assert_eq!(entry.state, "CRITICAL");
        assert_eq!(entry.timestamp, Some(1320890228991));
    }
}
