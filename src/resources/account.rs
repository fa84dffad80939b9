//! Account-level operations: the audit log, usage and limits

use crate::api::client::MonitoringClient;
use crate::error::Result;
use crate::pager::{FetchDescriptor, PagedSequence};
use crate::resources::{opt_str, require_i64, require_str};
use serde_json::Value;

/// Page size requested from the audits endpoint
const AUDITS_PAGE_LIMIT: &str = "200";

/// One audit record: an API-modifying request the service logged
#[derive(Debug, Clone, PartialEq)]
pub struct Audit {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub app: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub who: Option<String>,
    pub why: Option<String>,
    /// Request headers as logged by the service
    pub headers: Value,
    pub query: Value,
}

impl Audit {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            id: require_str(value, "audit", "id")?.to_string(),
            timestamp: require_i64(value, "audit", "timestamp")?,
            app: opt_str(value, "app"),
            url: opt_str(value, "url"),
            method: opt_str(value, "method"),
            who: opt_str(value, "who"),
            why: opt_str(value, "why"),
            headers: value.get("headers").cloned().unwrap_or(Value::Null),
            query: value.get("query").cloned().unwrap_or(Value::Null),
        })
    }
}

/// List the account's audit log, newest first, optionally resuming from a
/// marker
pub fn list_audits(client: &MonitoringClient, start_marker: Option<&str>) -> PagedSequence<Audit> {
    let descriptor = FetchDescriptor::items("/audits", Audit::from_json)
        .with_param("limit", AUDITS_PAGE_LIMIT)
        .with_start_marker(start_marker);
    client.paged(descriptor)
}

/// Account resource usage as reported by the service
pub async fn usage(client: &MonitoringClient) -> Result<Value> {
    client.get_object("/usage").await
}

/// Account rate and resource limits
pub async fn limits(client: &MonitoringClient) -> Result<Value> {
    client.get_object("/limits").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audit_from_json_keeps_raw_headers() {
        let raw = json!({
            "id": "aud1",
            "timestamp": 1320890228991i64,
            "app": "monitoring",
            "url": "/entities",
            "method": "POST",
            "headers": {"x-request-id": "r1"},
            "query": {}
        });
        let audit = Audit::from_json(&raw).unwrap();
        assert_eq!(audit.method.as_deref(), Some("POST"));
        assert_eq!(audit.headers["x-request-id"], "r1");
    }
}
