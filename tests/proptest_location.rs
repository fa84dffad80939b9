//! Property-based tests using proptest
//!
//! These tests verify location resolution over randomized resource
//! hierarchies and id shapes.

use cloudmon::api::location::resolve_location;
use proptest::prelude::*;

const COLLECTIONS: &[(&str, &str)] = &[
    ("entities", "entity_id"),
    ("checks", "check_id"),
    ("alarms", "alarm_id"),
    ("notifications", "notification_id"),
    ("notification_plans", "notification_plan_id"),
];

/// Generate a chain of distinct collections paired with random ids
fn arb_hierarchy() -> impl Strategy<Value = Vec<(&'static str, &'static str, String)>> {
    (
        prop::sample::subsequence(COLLECTIONS.to_vec(), 1..=COLLECTIONS.len()),
        prop::collection::vec("[a-zA-Z0-9]{1,16}", COLLECTIONS.len()),
    )
        .prop_map(|(collections, ids)| {
            collections
                .into_iter()
                .zip(ids)
                .map(|((plural, key), id)| (plural, key, id))
                .collect()
        })
}

fn hierarchy_path(hierarchy: &[(&str, &str, String)]) -> String {
    let mut path = String::new();
    for (plural, _, id) in hierarchy {
        path.push('/');
        path.push_str(plural);
        path.push('/');
        path.push_str(id);
    }
    path
}

proptest! {
    /// Every (collection, id) pair in a location path lands under its
    /// singular `_id` key.
    #[test]
    fn resolves_every_pair(hierarchy in arb_hierarchy()) {
        let path = format!("/v1.0/12345{}", hierarchy_path(&hierarchy));
        let resolved = resolve_location(&path, "/v1.0/12345").unwrap();

        prop_assert_eq!(resolved.len(), hierarchy.len());
        for (_, key, id) in &hierarchy {
            prop_assert_eq!(resolved.get(key), Some(id.as_str()));
        }
    }

    /// Stripping the request prefix yields the same ids as resolving the
    /// bare path.
    #[test]
    fn prefix_stripping_matches_bare_path(hierarchy in arb_hierarchy()) {
        let bare = hierarchy_path(&hierarchy);
        let prefixed = format!("/v1.0/12345{bare}");

        let from_bare = resolve_location(&bare, "/v1.0/12345").unwrap();
        let from_prefixed = resolve_location(&prefixed, "/v1.0/12345").unwrap();
        prop_assert_eq!(from_bare, from_prefixed);
    }

    /// Collections outside the fixed vocabulary are always rejected.
    #[test]
    fn unknown_collections_are_rejected(
        name in "[a-z]{3,12}",
        id in "[a-zA-Z0-9]{1,16}",
    ) {
        prop_assume!(!COLLECTIONS.iter().any(|(plural, _)| *plural == name));
        let path = format!("/{name}/{id}");
        prop_assert!(resolve_location(&path, "").is_err());
    }
}
