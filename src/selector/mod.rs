//! Policy selection subsystem.
//!
//! A policy names a set of proxy routes (see [`crate::routing`]). For every
//! request the selector decides which policy serves it.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     PolicySelectorConfig
//!     → PolicySelector::load (exactly one strategy, cookie name default)
//!     → rules.rs (sort + compile regex rules, regex strategy only)
//!     → immutable PolicySelector, shared via Arc
//!
//! Per request:
//!     Request (extensions: Claims, User; Cookie header)
//!     → input.rs (SelectionInput)
//!     → fixed.rs | claims.rs | pattern.rs
//!     → policy name
//! ```
//!
//! # Design Decisions
//! - Strategy is chosen once at load time; requests only dispatch on the enum
//! - Selection never fails: missing identity, claim, cookie or attribute all
//!   resolve through fallback policies
//! - Invalid configuration fails the load, never a request
//! - No interior mutability: safe to share across workers without locks

pub mod claims;
pub mod fixed;
pub mod input;
pub mod pattern;
pub mod rules;

use std::fmt;

use axum::http::Request;
use thiserror::Error;

use crate::config::schema::{PolicySelectorConfig, UserProperty};

pub use claims::ClaimsSelector;
pub use fixed::StaticSelector;
pub use input::{Claims, SelectionInput, User, ROUTING_POLICY_CLAIM};
pub use pattern::RegexSelector;
pub use rules::{CompiledRule, CompiledRuleSet};

/// Sticky cookie name used when the config doesn't set one.
pub const SELECTOR_COOKIE_NAME: &str = "opencloud-selector";

/// Errors raised while building a selector.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("only one type of policy-selector (static, claims or regex) can be configured")]
    MultipleSelectors,

    #[error("missing either \"static\", \"claims\" or \"regex\" configuration in policy_selector config")]
    SelectorConfigIncomplete,

    #[error("could not initialize policy-selector for given config")]
    UnexpectedConfig,

    #[error("invalid pattern {pattern:?} in regex rule #{index} (priority {priority}, property {property}): {source}")]
    InvalidRulePattern {
        /// Position of the rule in the configured list.
        index: usize,
        priority: i32,
        property: UserProperty,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// What decided a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// The `static` selector's only policy.
    Static,
    /// The routing policy claim.
    Claim,
    /// The sticky cookie.
    Cookie,
    /// A regex rule matched.
    Rule { priority: i32 },
    /// Authenticated, but nothing more specific applied.
    Default,
    /// No identity on the request.
    Unauthenticated,
}

impl SelectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionSource::Static => "static",
            SelectionSource::Claim => "claim",
            SelectionSource::Cookie => "cookie",
            SelectionSource::Rule { .. } => "rule",
            SelectionSource::Default => "default",
            SelectionSource::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for SelectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionSource::Rule { priority } => write!(f, "rule (priority {priority})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A selected policy and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub policy: &'a str,
    pub source: SelectionSource,
}

impl<'a> Selection<'a> {
    pub fn new(policy: &'a str, source: SelectionSource) -> Self {
        Self { policy, source }
    }
}

/// The configured selection strategy.
#[derive(Debug, Clone)]
pub enum PolicySelector {
    Static(StaticSelector),
    Claims(ClaimsSelector),
    Regex(RegexSelector),
}

impl PolicySelector {
    /// Build the selector described by `config`.
    ///
    /// Exactly one strategy must be configured.
    pub fn load(config: &PolicySelectorConfig) -> Result<Self, SelectorError> {
        let configured = [
            config.static_selector.is_some(),
            config.claims.is_some(),
            config.regex.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();

        if configured > 1 {
            return Err(SelectorError::MultipleSelectors);
        }
        if configured == 0 {
            return Err(SelectorError::SelectorConfigIncomplete);
        }

        let selector = if let Some(cfg) = &config.static_selector {
            PolicySelector::Static(StaticSelector::new(cfg))
        } else if let Some(cfg) = &config.claims {
            PolicySelector::Claims(ClaimsSelector::new(cfg))
        } else if let Some(cfg) = &config.regex {
            PolicySelector::Regex(RegexSelector::new(cfg)?)
        } else {
            return Err(SelectorError::UnexpectedConfig);
        };

        match &selector {
            PolicySelector::Regex(regex) => tracing::info!(
                strategy = selector.kind(),
                rules = regex.rules().len(),
                cookie = %regex.cookie_name(),
                "Policy selector loaded"
            ),
            _ => tracing::info!(
                strategy = selector.kind(),
                cookie = selector.cookie_name().unwrap_or("-"),
                "Policy selector loaded"
            ),
        }

        Ok(selector)
    }

    /// Strategy name as it appears in the config.
    pub fn kind(&self) -> &'static str {
        match self {
            PolicySelector::Static(_) => "static",
            PolicySelector::Claims(_) => "claims",
            PolicySelector::Regex(_) => "regex",
        }
    }

    /// Sticky cookie the strategy reads, if any.
    pub fn cookie_name(&self) -> Option<&str> {
        match self {
            PolicySelector::Static(_) => None,
            PolicySelector::Claims(s) => Some(s.cookie_name()),
            PolicySelector::Regex(s) => Some(s.cookie_name()),
        }
    }

    /// Choose a policy and report what decided it.
    pub fn select_with_source<'a>(&'a self, input: &SelectionInput<'a>) -> Selection<'a> {
        match self {
            PolicySelector::Static(s) => Selection::new(s.select(), SelectionSource::Static),
            PolicySelector::Claims(s) => s.select(input),
            PolicySelector::Regex(s) => s.select(input),
        }
    }

    /// Choose a policy.
    pub fn select<'a>(&'a self, input: &SelectionInput<'a>) -> &'a str {
        self.select_with_source(input).policy
    }

    /// Choose a policy for an inbound request.
    pub fn select_request<'a, B>(&'a self, req: &'a Request<B>) -> Selection<'a> {
        let input = SelectionInput::from_request(req, self.cookie_name());
        self.select_with_source(&input)
    }
}
