//! Monitoring API client
//!
//! Main entry point combining configuration and transport, plus the shared
//! helpers every resource module builds on: single-object GET/POST, the
//! unified create/update flow and resource deletion.

use crate::api::http::{ApiResponse, ApiTransport};
use crate::api::location::{resolve_location, ResourceLocation};
use crate::api::response::{self, DecodedBody};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pager::{FetchDescriptor, PagedSequence};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Main monitoring API client
#[derive(Clone)]
pub struct MonitoringClient {
    transport: ApiTransport,
}

impl MonitoringClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ApiTransport::new(&config.base_url(), &config.effective_token())?;
        Ok(Self { transport })
    }

    /// Create a client against an explicit base URL and token. Useful for
    /// pointing at staging endpoints or a mock server.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            transport: ApiTransport::new(base_url, token)?,
        })
    }

    /// Start a lazy paged sequence for a fetch descriptor
    pub fn paged<T>(&self, descriptor: FetchDescriptor<T>) -> PagedSequence<T> {
        PagedSequence::new(self.transport.clone(), descriptor)
    }

    /// GET a single resource, decoded as JSON
    pub async fn get_object(&self, path: &str) -> Result<Value> {
        let resp = self.transport.get(path, &[]).await?;
        if !response::is_success(resp.status) {
            return Err(response::decode_error(&resp, path));
        }
        Self::json_body(resp, path)
    }

    /// POST a payload and decode the JSON result. Used by the test-check and
    /// test-alarm endpoints, which return data instead of a location.
    pub async fn post_object(&self, path: &str, payload: &impl Serialize) -> Result<Value> {
        let body = encode_payload(payload)?;
        let resp = self.transport.post(path, &body).await?;
        if !response::is_success(resp.status) {
            return Err(response::decode_error(&resp, path));
        }
        Self::json_body(resp, path)
    }

    /// Create a resource: POST with null fields stripped, require
    /// 201 Created, then resolve the location header into resource ids.
    ///
    /// The create response body is never the source of truth; callers
    /// re-fetch the canonical record from the resolved ids.
    pub async fn create_resource(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<ResourceLocation> {
        let body = encode_payload(payload)?;
        let resp = self.transport.post(path, &body).await?;
        self.resolve_written(resp, path, StatusCode::CREATED)
    }

    /// Update a resource: PUT with null fields stripped, require
    /// 204 No Content, then resolve the location header. Shares every step
    /// with [`Self::create_resource`] except method and expected status.
    pub async fn update_resource(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<ResourceLocation> {
        let body = encode_payload(payload)?;
        let resp = self.transport.put(path, &body).await?;
        self.resolve_written(resp, path, StatusCode::NO_CONTENT)
    }

    /// DELETE a resource; true iff the service confirmed with 204
    pub async fn delete_resource(&self, path: &str) -> Result<bool> {
        let resp = self.transport.delete(path).await?;
        if !response::is_success(resp.status) {
            return Err(response::decode_error(&resp, path));
        }
        Ok(resp.status == StatusCode::NO_CONTENT)
    }

    /// Shared tail of create/update: status gate, then location resolution
    fn resolve_written(
        &self,
        resp: ApiResponse,
        path: &str,
        expected: StatusCode,
    ) -> Result<ResourceLocation> {
        if resp.status != expected {
            return Err(response::decode_error(&resp, path));
        }
        let location = resp.location().ok_or(Error::MissingLocation)?;
        resolve_location(location, &self.transport.path_prefix())
    }

    fn json_body(resp: ApiResponse, path: &str) -> Result<Value> {
        match response::decode_body(&resp)? {
            Some(DecodedBody::Json(value)) => Ok(value),
            Some(DecodedBody::Text(_)) => Err(Error::MalformedResponse {
                reason: format!("expected a JSON object from {path}"),
            }),
            None => Ok(Value::Null),
        }
    }
}

/// Serialize a payload and strip null-valued top-level fields. The wire
/// format distinguishes "omitted" from "explicit null", and null is never
/// sent.
fn encode_payload(payload: &impl Serialize) -> Result<Value> {
    let mut body = serde_json::to_value(payload).map_err(Error::Encode)?;
    strip_null_fields(&mut body);
    Ok(body)
}

fn strip_null_fields(body: &mut Value) {
    if let Value::Object(map) = body {
        map.retain(|_, v| !v.is_null());
    }
}
