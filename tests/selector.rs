//! End-to-end selector behavior: config file → selector → decisions.

use std::sync::Arc;

use policy_proxy::config::{self, load_config, ConfigError, PolicySelectorConfig};
use policy_proxy::routing::PolicyTable;
use policy_proxy::selector::{
    Claims, PolicySelector, SelectionInput, SelectionSource, SelectorError, ROUTING_POLICY_CLAIM,
};

mod common;

#[test]
fn test_demo_config_loads() {
    let config = load_config(&common::demo_config_path()).expect("demo config");
    let selector = PolicySelector::load(&config.policy_selector).expect("selector");
    let table = PolicyTable::from_config(&config.policies);

    assert_eq!(selector.kind(), "regex");

    let mary = common::user("mary@example.org", "mary", None);
    let policy = selector.select(&SelectionInput::new().with_user(&mary));
    assert_eq!(policy, "opencloud");
    let route = table.route(policy, "/graph/v1.0/me").unwrap();
    assert_eq!(route.backend, "http://localhost:9120");

    let einstein = common::user("einstein@example.org", "einstein", None);
    assert_eq!(selector.select(&SelectionInput::new().with_user(&einstein)), "oc10");

    // Unmatched mail falls through to the username rules.
    let dennis = common::user("dennis@other.org", "dennis", None);
    assert_eq!(selector.select(&SelectionInput::new().with_user(&dennis)), "opencloud");

    assert_eq!(selector.select(&SelectionInput::new()), "oc10");
}

#[test]
fn test_claim_precedence() {
    let selector = common::claims_selector();
    let claims = Claims::new().with(ROUTING_POLICY_CLAIM, "oc10");
    let input = SelectionInput::new().with_claims(&claims).with_cookie("opencloud");
    assert_eq!(selector.select(&input), "oc10");
}

#[test]
fn test_claim_fallback_chain() {
    let selector = common::claims_selector();
    let claims = Claims::new();

    let input = SelectionInput::new().with_claims(&claims).with_cookie("opencloud");
    assert_eq!(selector.select(&input), "opencloud");

    let input = SelectionInput::new().with_claims(&claims);
    assert_eq!(selector.select(&input), "default");

    assert_eq!(selector.select(&SelectionInput::new()), "unauthenticated");
}

#[test]
fn test_pattern_precedence() {
    let selector = common::regex_selector();
    let mary = common::user("mary@example.org", "mary", None);

    let selection = selector.select_with_source(&SelectionInput::new().with_user(&mary));
    assert_eq!(selection.policy, "opencloud");
    assert_eq!(selection.source, SelectionSource::Rule { priority: 10 });

    let input = SelectionInput::new().with_user(&mary).with_cookie("oc10");
    assert_eq!(selector.select(&input), "oc10");

    let nobody = common::user("nobody@nowhere.org", "nobody", None);
    assert_eq!(selector.select(&SelectionInput::new().with_user(&nobody)), "default");
}

#[test]
fn test_both_static_and_regex_rejected() {
    let config = config::loader::from_toml_str(
        r#"
        [policy_selector.static]
        policy = "opencloud"

        [policy_selector.regex]
        unauthenticated_policy = "oc10"
        "#,
    )
    .unwrap();
    let err = PolicySelector::load(&config.policy_selector).unwrap_err();
    assert!(matches!(err, SelectorError::MultipleSelectors));
}

#[test]
fn test_empty_selector_rejected() {
    let err = PolicySelector::load(&PolicySelectorConfig::default()).unwrap_err();
    assert!(matches!(err, SelectorError::SelectorConfigIncomplete));
}

#[test]
fn test_bad_pattern_identifies_rule() {
    let config = config::loader::from_toml_str(
        r#"
        [policy_selector.regex]
        default_policy = "opencloud"

        [[policy_selector.regex.matches_policies]]
        priority = 10
        property = "mail"
        match = ".*"
        policy = "opencloud"

        [[policy_selector.regex.matches_policies]]
        priority = 5
        property = "username"
        match = "*oops"
        policy = "oc10"
        "#,
    )
    .unwrap();

    let err = PolicySelector::load(&config.policy_selector).unwrap_err();
    match err {
        SelectorError::InvalidRulePattern { index, priority, .. } => {
            assert_eq!(index, 1);
            assert_eq!(priority, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_config() {
    let config = config::loader::from_json_str(
        r#"{
            "policy_selector": {
                "claims": {
                    "default_policy": "opencloud",
                    "unauthenticated_policy": "oc10",
                    "selector_cookie_name": "shard"
                }
            }
        }"#,
    )
    .unwrap();
    let selector = PolicySelector::load(&config.policy_selector).unwrap();
    assert_eq!(selector.cookie_name(), Some("shard"));
    assert_eq!(selector.select(&SelectionInput::new()), "oc10");
}

#[test]
fn test_invalid_file_reported() {
    let err = load_config(std::path::Path::new("/nonexistent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_selection_is_deterministic() {
    let selector = Arc::new(common::regex_selector());

    let mut handles = Vec::new();
    for worker in 0..16 {
        let selector = selector.clone();
        handles.push(tokio::spawn(async move {
            let mary = common::user("mary@example.org", "mary", None);
            let einstein = common::user("einstein@example.org", "einstein", None);
            let mut seen = Vec::new();
            for i in 0..200 {
                let user = if (worker + i) % 2 == 0 { &mary } else { &einstein };
                let policy = selector.select(&SelectionInput::new().with_user(user));
                seen.push((user.username.clone(), policy.to_string()));
            }
            seen
        }));
    }

    for handle in handles {
        for (username, policy) in handle.await.unwrap() {
            let expected = if username == "mary" { "opencloud" } else { "oc10" };
            assert_eq!(policy, expected);
        }
    }
}
