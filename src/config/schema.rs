//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy's
//! policy engine. All types derive Serde traits for deserialization from
//! config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the policy proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Which selection strategy picks a policy for each request.
    pub policy_selector: PolicySelectorConfig,

    /// Named route sets the selected policy keys into.
    pub policies: Vec<PolicyConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Policy selector configuration.
///
/// At most one of the three strategies may be set; the selector loader
/// rejects anything else.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PolicySelectorConfig {
    /// Always route to one policy.
    #[serde(rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_selector: Option<StaticSelectorConfig>,

    /// Route by the identity provider's routing claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<ClaimsSelectorConfig>,

    /// Route by regular expressions over user properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexSelectorConfig>,
}

/// Configuration for the static selector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticSelectorConfig {
    pub policy: String,
}

/// Configuration for the claims selector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClaimsSelectorConfig {
    /// Policy for authenticated requests without a routing claim or cookie.
    #[serde(default)]
    pub default_policy: String,

    /// Policy for unauthenticated requests without a cookie.
    #[serde(default)]
    pub unauthenticated_policy: String,

    /// Sticky cookie name; the loader fills in the default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_cookie_name: Option<String>,
}

/// Configuration for the regex selector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RegexSelectorConfig {
    /// Rules, evaluated in ascending priority order.
    #[serde(default)]
    pub matches_policies: Vec<RegexRuleConfig>,

    /// Policy for users no rule matches.
    #[serde(default)]
    pub default_policy: String,

    /// Policy for requests without a resolved user.
    #[serde(default)]
    pub unauthenticated_policy: String,

    /// Sticky cookie name; the loader fills in the default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_cookie_name: Option<String>,
}

/// A single regex routing rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegexRuleConfig {
    /// Lower values are checked first.
    #[serde(default)]
    pub priority: i32,

    /// User property the pattern is applied to.
    pub property: UserProperty,

    /// Regular expression source (unanchored).
    #[serde(rename = "match")]
    pub pattern: String,

    /// Policy selected when the pattern matches.
    pub policy: String,
}

/// User property a regex rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserProperty {
    Mail,
    Username,
    Id,
}

impl UserProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserProperty::Mail => "mail",
            UserProperty::Username => "username",
            UserProperty::Id => "id",
        }
    }
}

impl fmt::Display for UserProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named set of routes to backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Policy name, as returned by the selector.
    pub name: String,

    /// Routes served under this policy.
    #[serde(default)]
    pub routes: Vec<PolicyRouteConfig>,
}

/// A route inside a policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyRouteConfig {
    /// Path prefix to match.
    pub endpoint: String,

    /// Backend URL requests are forwarded to.
    pub backend: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record selection metrics.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
