// ABOUTME: Integration tests for the origin mutator.
// ABOUTME: Verifies single-field changes, idempotence, and untouched passthrough.

mod support;

use edgeflip::distribution::{Repoint, repoint};
use edgeflip::types::OriginId;
use proptest::prelude::*;
use serde_json::{Value, json};

fn origin_items(config: &Value) -> &Vec<Value> {
    config["Origins"]["Items"].as_array().unwrap()
}

#[test]
fn only_matched_origin_path_changes() {
    let config = support::distribution_config();
    let result = repoint(&config, &OriginId::new("O1"), "/app/deploy/prod/2024.05.01");
    let updated = result.config();

    // Everything except the one field is identical
    let mut expected = config.clone();
    expected["Origins"]["Items"][0]["OriginPath"] = json!("/app/deploy/prod/2024.05.01");
    assert_eq!(updated, &expected);

    assert_eq!(origin_items(updated)[1], origin_items(&config)[1]);
    assert_eq!(updated["DefaultCacheBehavior"], config["DefaultCacheBehavior"]);
}

#[test]
fn serialized_key_order_is_preserved() {
    let config = support::distribution_config();
    let result = repoint(&config, &OriginId::new("O1"), "/app/new");

    let before = serde_json::to_string(&config).unwrap();
    let after = serde_json::to_string(result.config()).unwrap();
    assert_eq!(after, before.replace("\"/app/old\"", "\"/app/new\""));
}

#[test]
fn repointing_twice_matches_once() {
    let config = support::distribution_config();
    let origin = OriginId::new("O1");

    let once = repoint(&config, &origin, "/app/r1").into_config();
    let twice = repoint(&once, &origin, "/app/r1");

    assert_eq!(twice.config(), &once);
    assert_eq!(
        twice,
        Repoint::Changed {
            config: once.clone(),
            previous_path: "/app/r1".to_string(),
        }
    );
}

#[test]
fn unknown_origin_returns_input_unchanged() {
    let config = support::distribution_config();
    let result = repoint(&config, &OriginId::new("missing"), "/app/r1");

    assert!(!result.is_changed());
    assert_eq!(result.into_config(), config);
}

#[test]
fn id_match_is_exact() {
    let config = support::distribution_config();
    let result = repoint(&config, &OriginId::new("o1"), "/app/r1");
    assert!(!result.is_changed());
}

#[test]
fn origins_without_items_pass_through() {
    let config = json!({ "Origins": { "Quantity": 0 } });
    let result = repoint(&config, &OriginId::new("O1"), "/app/r1");
    assert_eq!(result, Repoint::NotFound { config });
}

proptest! {
    #[test]
    fn repoint_touches_nothing_but_the_path(
        path in "/[a-z0-9/._-]{0,40}",
        target in 0usize..3,
    ) {
        let config = json!({
            "Origins": { "Quantity": 3, "Items": [
                { "Id": "a", "OriginPath": "/a", "DomainName": "a.example.com" },
                { "Id": "b", "OriginPath": "/b", "DomainName": "b.example.com" },
                { "Id": "c", "OriginPath": "/c", "DomainName": "c.example.com" }
            ]},
            "Enabled": true
        });
        let ids = ["a", "b", "c"];

        let once = repoint(&config, &OriginId::new(ids[target]), &path).into_config();
        let twice = repoint(&once, &OriginId::new(ids[target]), &path).into_config();
        prop_assert_eq!(&once, &twice);

        for (i, item) in origin_items(&once).iter().enumerate() {
            let before = &origin_items(&config)[i];
            if i == target {
                prop_assert_eq!(item["OriginPath"].as_str(), Some(path.as_str()));
                prop_assert_eq!(&item["DomainName"], &before["DomainName"]);
                prop_assert_eq!(&item["Id"], &before["Id"]);
            } else {
                prop_assert_eq!(item, before);
            }
        }
        prop_assert_eq!(&once["Enabled"], &config["Enabled"]);
    }
}
