//! Response decoding for the monitoring API
//!
//! Interprets a raw transport response: success vs failure from the status
//! code (409 Conflict is benign), body decode keyed on the declared content
//! type, and structured validation errors for 400-class semantic failures.

use crate::api::http::ApiResponse;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

/// True for 2xx statuses and for 409 Conflict, which the service uses as a
/// benign "already exists" signal. Callers that care about the conflict
/// case must check the status explicitly.
pub fn is_success(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::CONFLICT
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// `application/json` body, parsed
    Json(Value),
    /// `text/plain` or unrecognized content type, returned verbatim
    Text(String),
}

impl DecodedBody {
    /// The JSON value, or a malformed-response error for a text body
    pub fn into_json(self) -> Result<Value> {
        match self {
            DecodedBody::Json(value) => Ok(value),
            DecodedBody::Text(_) => Err(Error::MalformedResponse {
                reason: "expected a JSON body".to_string(),
            }),
        }
    }
}

/// Decode a response body according to its declared content type.
///
/// Returns `None` for an empty body. A non-empty body without a
/// content-type header is a contract violation by the service.
pub fn decode_body(response: &ApiResponse) -> Result<Option<DecodedBody>> {
    if response.body.is_empty() {
        return Ok(None);
    }

    let content_type = response
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::MissingContentType)?;

    // Drop parameters like `; charset=UTF-8`
    let content_type = content_type.split(';').next().unwrap_or("").trim();

    match content_type {
        "application/json" => {
            let value = serde_json::from_str(&response.body).map_err(|e| {
                Error::MalformedResponse {
                    reason: e.to_string(),
                }
            })?;
            Ok(Some(DecodedBody::Json(value)))
        }
        _ => Ok(Some(DecodedBody::Text(response.body.clone()))),
    }
}

/// Turn a non-success response into the error the caller sees: a structured
/// validation error for 400 Bad Request, otherwise the unexpected-status
/// catch-all with best-effort details extraction.
pub fn decode_error(response: &ApiResponse, url: &str) -> Error {
    if response.status == StatusCode::BAD_REQUEST {
        if let Ok(Some(DecodedBody::Json(body))) = decode_body(response) {
            return Error::Validation {
                code: body
                    .get("code")
                    .and_then(Value::as_i64)
                    .unwrap_or_else(|| i64::from(response.status.as_u16())),
                kind: body
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                details: body.get("details").cloned().unwrap_or(Value::Null),
            };
        }
    }

    let details = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("details").cloned())
        .map(|d| d.to_string())
        .unwrap_or_default();

    Error::UnexpectedStatus {
        status: response.status.as_u16(),
        url: url.to_string(),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> ApiResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, ct.parse().unwrap());
        }
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn conflict_counts_as_success() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::NO_CONTENT));
        assert!(is_success(StatusCode::CONFLICT));
        assert!(!is_success(StatusCode::NOT_FOUND));
        assert!(!is_success(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn empty_body_decodes_to_none() {
        let resp = response(204, None, "");
        assert_eq!(decode_body(&resp).unwrap(), None);
    }

    #[test]
    fn missing_content_type_is_an_error() {
        let resp = response(200, None, "{}");
        assert!(matches!(
            decode_body(&resp),
            Err(Error::MissingContentType)
        ));
    }

    #[test]
    fn json_content_type_parses_body() {
        let resp = response(200, Some("application/json; charset=UTF-8"), r#"{"id":"en1"}"#);
        let decoded = decode_body(&resp).unwrap().unwrap();
        assert_eq!(decoded, DecodedBody::Json(json!({"id": "en1"})));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let resp = response(200, Some("application/json"), "{not json");
        assert!(matches!(
            decode_body(&resp),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn unrecognized_content_type_returns_raw_text() {
        let resp = response(200, Some("text/plain"), "pong");
        let decoded = decode_body(&resp).unwrap().unwrap();
        assert_eq!(decoded, DecodedBody::Text("pong".to_string()));

        let resp = response(200, Some("application/octet-stream"), "blob");
        let decoded = decode_body(&resp).unwrap().unwrap();
        assert_eq!(decoded, DecodedBody::Text("blob".to_string()));
    }

    #[test]
    fn bad_request_decodes_to_validation_error() {
        let body = r#"{"code":400,"type":"invalidJson","message":"bad input","details":{}}"#;
        let resp = response(400, Some("application/json"), body);

        match decode_error(&resp, "/entities") {
            Error::Validation {
                code,
                kind,
                message,
                details,
            } => {
                assert_eq!(code, 400);
                assert_eq!(kind, "invalidJson");
                assert_eq!(message, "bad input");
                assert_eq!(details, json!({}));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_decode_to_unexpected_status() {
        let resp = response(
            503,
            Some("application/json"),
            r#"{"details":"try later"}"#,
        );
        match decode_error(&resp, "/entities") {
            Error::UnexpectedStatus {
                status,
                url,
                details,
            } => {
                assert_eq!(status, 503);
                assert_eq!(url, "/entities");
                assert_eq!(details, "\"try later\"");
            }
            other => panic!("expected unexpected-status error, got {other:?}"),
        }
    }
}
