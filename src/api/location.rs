//! Resource identity resolution
//!
//! Create and update responses carry no usable body; the identity of the
//! resulting resource comes from a `Location` header whose path encodes the
//! resource ancestry as alternating `{collection}/{id}` segments.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Plural collection name -> singular id-key stem
const COLLECTIONS: &[(&str, &str)] = &[
    ("entities", "entity"),
    ("alarms", "alarm"),
    ("checks", "check"),
    ("notifications", "notification"),
    ("notification_plans", "notification_plan"),
];

fn plural_to_singular(name: &str) -> Result<&'static str> {
    COLLECTIONS
        .iter()
        .find(|(plural, _)| *plural == name)
        .map(|(_, singular)| *singular)
        .ok_or_else(|| Error::UnknownCollection(name.to_string()))
}

/// Parent/child resource ids extracted from a location reference,
/// keyed `{singular}_id` (e.g. `entity_id`, `check_id`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLocation {
    ids: HashMap<String, String>,
}

impl ResourceLocation {
    /// Look up an id by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    /// Look up an id, failing if the location did not carry it
    pub fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(Error::MissingField {
            record: "location",
            field: key,
        })
    }

    /// Number of resolved ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolve a location reference (absolute URL or bare path) into resource ids.
///
/// `request_path_prefix` (the version/tenant part of the request path, e.g.
/// `/v1.0/12345`) is stripped from the front when present; the remaining
/// segments are walked two at a time as `(collection, id)` pairs.
pub fn resolve_location(location: &str, request_path_prefix: &str) -> Result<ResourceLocation> {
    let path = match url::Url::parse(location) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL; treat it as a bare path
        Err(_) => location.to_string(),
    };

    let path = path
        .strip_prefix(request_path_prefix)
        .unwrap_or(&path)
        .to_string();

    let chunks: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();

    if chunks.len() % 2 != 0 {
        return Err(Error::MalformedResponse {
            reason: format!("dangling segment in location path: {path}"),
        });
    }

    let mut ids = HashMap::new();
    for pair in chunks.chunks(2) {
        let key = format!("{}_id", plural_to_singular(pair[0])?);
        ids.insert(key, pair[1].to_string());
    }

    Ok(ResourceLocation { ids })
}
