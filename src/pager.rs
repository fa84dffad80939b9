//! Cursor pagination engine
//!
//! Every list operation in the API runs through one mechanism: a
//! [`FetchDescriptor`] names the URL, an optional starting cursor, extra
//! query parameters and a mapping from raw JSON to domain records; a
//! [`PagedSequence`] pulls pages on demand and yields mapped items one at a
//! time. At most one page is fetched ahead of consumption, and a page is
//! never fetched twice.
//!
//! The wire contract: the server accepts a `marker` query parameter and
//! responds with `{"values": [...], "metadata": {"next_marker": ...}}`;
//! 204 No Content signals an empty result set.

use crate::api::http::ApiTransport;
use crate::api::response;
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;

/// Maps one element of a page's `values` array
pub type ItemMapper<T> = Box<dyn Fn(&Value) -> Result<T> + Send + Sync>;

/// Maps an entire decoded page body into that page's items
pub type PageMapper<T> = Box<dyn Fn(&Value) -> Result<Vec<T>> + Send + Sync>;

/// How a page's raw JSON becomes domain records.
///
/// Exactly one shape per descriptor: most endpoints return a homogeneous
/// `values` list and map per item; aggregate endpoints (the overview view)
/// map the whole body at once.
pub enum PageMapping<T> {
    Items(ItemMapper<T>),
    Page(PageMapper<T>),
}

/// Immutable description of a paginated fetch, consumed by [`PagedSequence`]
pub struct FetchDescriptor<T> {
    url: String,
    start_marker: Option<String>,
    params: Vec<(String, String)>,
    mapping: PageMapping<T>,
}

impl<T> FetchDescriptor<T> {
    /// Describe a fetch that maps each element of `values` independently
    pub fn items<F>(url: impl Into<String>, mapper: F) -> Self
    where
        F: Fn(&Value) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            url: url.into(),
            start_marker: None,
            params: Vec::new(),
            mapping: PageMapping::Items(Box::new(mapper)),
        }
    }

    /// Describe a fetch that maps the whole decoded page body at once
    pub fn page<F>(url: impl Into<String>, mapper: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<T>> + Send + Sync + 'static,
    {
        Self {
            url: url.into(),
            start_marker: None,
            params: Vec::new(),
            mapping: PageMapping::Page(Box::new(mapper)),
        }
    }

    /// Resume the sequence from a cursor returned by an earlier page
    pub fn with_start_marker(mut self, marker: Option<&str>) -> Self {
        self.start_marker = marker.map(str::to_string);
        self
    }

    /// Add a fixed query parameter sent with every page request
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }
}

/// Lazily-evaluated sequence of mapped items spanning server-side pages.
///
/// Forward-only: a sequence never rewinds past items already yielded. The
/// cursor advances only on a successful page fetch, and once the sequence is
/// exhausted it stays exhausted. Not shareable: one consumer owns the
/// cursor and buffer state.
pub struct PagedSequence<T> {
    transport: ApiTransport,
    descriptor: FetchDescriptor<T>,
    last_marker: Option<String>,
    started: bool,
    exhausted: bool,
    buffer: VecDeque<T>,
}

impl<T> PagedSequence<T> {
    pub(crate) fn new(transport: ApiTransport, descriptor: FetchDescriptor<T>) -> Self {
        Self {
            transport,
            descriptor,
            last_marker: None,
            started: false,
            exhausted: false,
            buffer: VecDeque::new(),
        }
    }

    /// Pull the next item, fetching at most one more page if the buffer ran
    /// dry. `Ok(None)` means the sequence is exhausted.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    /// Drain the rest of the sequence into a vector
    pub async fn try_collect(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// The cursor a fresh sequence would need to resume after the pages
    /// fetched so far. `None` before the first fetch and after exhaustion.
    pub fn last_marker(&self) -> Option<&str> {
        self.last_marker.as_deref()
    }

    /// Whether the final page has been fetched
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Adapt the sequence to a pull-based [`Stream`]. No read-ahead: each
    /// poll consumes from the same single-page buffer.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::try_unfold(self, |mut seq| async move {
            let item = seq.next().await?;
            Ok(item.map(|item| (item, seq)))
        })
    }

    /// Fetch exactly one page and append its mapped items to the buffer
    async fn fetch_next_page(&mut self) -> Result<()> {
        let mut query = self.descriptor.params.clone();

        // The cursor from the previous page wins; the descriptor's start
        // marker only seeds the very first fetch.
        let marker = match (&self.last_marker, self.started) {
            (Some(marker), _) => Some(marker.clone()),
            (None, false) => self.descriptor.start_marker.clone(),
            (None, true) => None,
        };
        if let Some(marker) = marker {
            query.push(("marker".to_string(), marker));
        }

        let resp = self.transport.get(&self.descriptor.url, &query).await?;

        if resp.status == StatusCode::NO_CONTENT {
            // Empty result set: exhausted immediately
            self.started = true;
            self.exhausted = true;
            return Ok(());
        }

        if !resp.status.is_success() {
            return Err(response::decode_error(&resp, &self.descriptor.url));
        }

        let body = response::decode_body(&resp)?
            .ok_or(Error::MalformedResponse {
                reason: "empty page body on a success status".to_string(),
            })?
            .into_json()?;

        let metadata = body.get("metadata").ok_or(Error::MissingField {
            record: "page",
            field: "metadata",
        })?;
        let next_marker = metadata
            .get("next_marker")
            .and_then(Value::as_str)
            .map(str::to_string);

        let items = match &self.descriptor.mapping {
            PageMapping::Items(mapper) => {
                let values = body
                    .get("values")
                    .and_then(Value::as_array)
                    .ok_or(Error::MissingField {
                        record: "page",
                        field: "values",
                    })?;
                values.iter().map(|item| mapper(item)).collect::<Result<Vec<_>>>()?
            }
            PageMapping::Page(mapper) => mapper(&body)?,
        };

        self.buffer.extend(items);
        self.exhausted = next_marker.is_none();
        self.last_marker = next_marker;
        self.started = true;

        Ok(())
    }
}
