//! Resource records and operations
//!
//! One module per resource kind, each holding the typed record, its wire
//! payload struct and the operations that act on it. Operations are free
//! functions taking a [`crate::MonitoringClient`], so a consumer of one
//! module sees only that resource's surface.
//!
//! - [`entity`] - monitored entities, including cascading delete
//! - [`check`] - checks bound to an entity
//! - [`alarm`] - alarms, alarm changelog and alarm history
//! - [`notification`] - notification endpoints
//! - [`notification_plan`] - plans wiring alarm states to notifications
//! - [`catalog`] - check types, notification types, monitoring zones
//! - [`account`] - audits, usage and limits
//! - [`overview`] - the aggregate entity/check/alarm overview view

pub mod account;
pub mod alarm;
pub mod catalog;
pub mod check;
pub mod entity;
pub mod notification;
pub mod notification_plan;
pub mod overview;

use crate::error::{Error, Result};
use serde_json::Value;

/// Extract a required string field from a decoded record
pub(crate) fn require_str<'a>(
    value: &'a Value,
    record: &'static str,
    field: &'static str,
) -> Result<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or(Error::MissingField { record, field })
}

/// Extract a required integer field from a decoded record
pub(crate) fn require_i64(value: &Value, record: &'static str, field: &'static str) -> Result<i64> {
    value
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(Error::MissingField { record, field })
}

/// Extract an optional string field
pub(crate) fn opt_str(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Extract a string array field, defaulting to empty
pub(crate) fn str_vec(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
