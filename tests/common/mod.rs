//! Shared utilities for integration tests.

use std::path::PathBuf;

use policy_proxy::config::{
    ClaimsSelectorConfig, PolicySelectorConfig, RegexRuleConfig, RegexSelectorConfig, UserProperty,
};
use policy_proxy::selector::{PolicySelector, User};

/// Path of the sample configuration shipped with the crate.
#[allow(dead_code)]
pub fn demo_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/policy-proxy.toml")
}

#[allow(dead_code)]
pub fn user(mail: &str, username: &str, id: Option<&str>) -> User {
    User {
        mail: mail.into(),
        username: username.into(),
        id: id.map(Into::into),
    }
}

#[allow(dead_code)]
pub fn rule(priority: i32, property: UserProperty, pattern: &str, policy: &str) -> RegexRuleConfig {
    RegexRuleConfig {
        priority,
        property,
        pattern: pattern.into(),
        policy: policy.into(),
    }
}

/// A claims selector with `default` / `unauthenticated` fallbacks.
#[allow(dead_code)]
pub fn claims_selector() -> PolicySelector {
    PolicySelector::load(&PolicySelectorConfig {
        claims: Some(ClaimsSelectorConfig {
            default_policy: "default".into(),
            unauthenticated_policy: "unauthenticated".into(),
            selector_cookie_name: None,
        }),
        ..PolicySelectorConfig::default()
    })
    .unwrap()
}

/// A regex selector with the two overlapping mail rules.
#[allow(dead_code)]
pub fn regex_selector() -> PolicySelector {
    PolicySelector::load(&PolicySelectorConfig {
        regex: Some(RegexSelectorConfig {
            matches_policies: vec![
                rule(20, UserProperty::Mail, "[^@]+@example.org", "oc10"),
                rule(10, UserProperty::Mail, "mary@example.org", "opencloud"),
            ],
            default_policy: "default".into(),
            unauthenticated_policy: "unauthenticated".into(),
            selector_cookie_name: None,
        }),
        ..PolicySelectorConfig::default()
    })
    .unwrap()
}
