//! Overview view
//!
//! The overview endpoint returns an aggregate per entity: the entity record
//! together with its checks, alarms and latest alarm states. Unlike the
//! plain list endpoints its pages are mapped as a whole rather than
//! per-item.

use crate::api::client::MonitoringClient;
use crate::error::{Error, Result};
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::alarm::Alarm;
use crate::resources::check::Check;
use crate::resources::entity::Entity;
use crate::resources::{require_i64, require_str};
use serde_json::Value;

/// Most recent evaluated state for one alarm/check pair
#[derive(Debug, Clone, PartialEq)]
pub struct LatestAlarmState {
    pub entity_id: String,
    pub check_id: String,
    pub alarm_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub state: String,
}

impl LatestAlarmState {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            entity_id: require_str(value, "latest alarm state", "entity_id")?.to_string(),
            check_id: require_str(value, "latest alarm state", "check_id")?.to_string(),
            alarm_id: require_str(value, "latest alarm state", "alarm_id")?.to_string(),
            timestamp: require_i64(value, "latest alarm state", "timestamp")?,
            state: require_str(value, "latest alarm state", "state")?.to_string(),
        })
    }
}

/// One entity's aggregate view: the entity plus its derived collections
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub entity: Entity,
    pub checks: Vec<Check>,
    pub alarms: Vec<Alarm>,
    pub latest_alarm_states: Vec<LatestAlarmState>,
}

impl Overview {
    /// Build one overview record from an element of the page's `values`
    pub fn from_json(value: &Value) -> Result<Self> {
        let entity = Entity::from_json(value.get("entity").ok_or(Error::MissingField {
            record: "overview",
            field: "entity",
        })?)?;

        let checks = value
            .get("checks")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|check| Check::from_json(check, &entity.id))
                    .collect::<Result<Vec<_>>>()
            })
            .unwrap_or_else(|| Ok(Vec::new()))?;

        let alarms = value
            .get("alarms")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|alarm| Alarm::from_json(alarm, &entity.id))
                    .collect::<Result<Vec<_>>>()
            })
            .unwrap_or_else(|| Ok(Vec::new()))?;

        let latest_alarm_states = value
            .get("latest_alarm_states")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(LatestAlarmState::from_json)
                    .collect::<Result<Vec<_>>>()
            })
            .unwrap_or_else(|| Ok(Vec::new()))?;

        Ok(Self {
            entity,
            checks,
            alarms,
            latest_alarm_states,
        })
    }
}

/// Iterate the account's overview, one aggregate record per entity.
///
/// Goes through the page-mapping path: the whole decoded page body is
/// turned into that page's overview records, while the pagination engine
/// still owns the cursor in `metadata.next_marker`.
pub fn views_overview(
    client: &MonitoringClient,
    start_marker: Option<&str>,
) -> PagedSequence<Overview> {
    let descriptor = FetchDescriptor::page("/views/overview", |body| {
        body.get("values")
            .and_then(Value::as_array)
            .ok_or(Error::MissingField {
                record: "overview page",
                field: "values",
            })?
            .iter()
            .map(Overview::from_json)
            .collect()
    })
    .with_start_marker(start_marker);
    client.paged(descriptor)
}
