//! HTTP utilities for monitoring REST API calls

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Raw response handed to the decoding layer: status, headers and the
/// undecoded body text.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// The `Location` header, if the service sent one
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// HTTP client wrapper for the monitoring API
///
/// Performs authenticated requests against the tenant-scoped base URL and
/// returns the raw response. Success/error interpretation belongs to
/// [`crate::api::response`]; retry policy, if any, belongs to the caller.
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiTransport {
    /// Create a new transport rooted at `base_url` (version and tenant
    /// segments included) authenticating with `token`.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cloudmon/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// The tenant-scoped base URL every request path is joined onto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path component of the base URL (e.g. `/v1.0/12345`), the prefix
    /// stripped from location references before resolving resource ids.
    pub fn path_prefix(&self) -> String {
        url::Url::parse(&self.base_url)
            .map(|u| u.path().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    /// Perform one request and return the raw response
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if method == Method::POST || method == Method::PUT {
            let payload = body.cloned().unwrap_or_else(|| Value::Object(Default::default()));
            request = request
                .header(CONTENT_TYPE, "application/json; charset=UTF-8")
                .body(serde_json::to_string(&payload).map_err(Error::Encode)?);
        }

        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if !status.is_success() && status != StatusCode::CONFLICT {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse> {
        self.request(Method::GET, path, query, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, &[], None).await
    }
}
