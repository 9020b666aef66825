//! The `regex` selector.
//!
//! Routes by matching user properties (`mail`, `username`, `id`) against
//! priority-ordered regular expressions.
//!
//! # Decision Order
//! ```text
//! sticky cookie present        → cookie value (rules are not evaluated)
//! resolved user, rule matches  → rule policy (lowest priority value first)
//! resolved user, no match      → default_policy
//! no user                      → unauthenticated_policy
//! ```
//!
//! # Design Decisions
//! - The cookie overrides everything here, while the `claims` selector only
//!   uses it as a fallback
//! - A cookie that is present but empty still short-circuits

use crate::config::schema::RegexSelectorConfig;
use crate::selector::input::SelectionInput;
use crate::selector::rules::CompiledRuleSet;
use crate::selector::{Selection, SelectionSource, SelectorError, SELECTOR_COOKIE_NAME};

#[derive(Debug, Clone)]
pub struct RegexSelector {
    rules: CompiledRuleSet,
    default_policy: String,
    unauthenticated_policy: String,
    cookie_name: String,
}

impl RegexSelector {
    /// Build the selector, compiling every rule.
    pub fn new(config: &RegexSelectorConfig) -> Result<Self, SelectorError> {
        Ok(Self {
            rules: CompiledRuleSet::compile(&config.matches_policies)?,
            default_policy: config.default_policy.clone(),
            unauthenticated_policy: config.unauthenticated_policy.clone(),
            cookie_name: config
                .selector_cookie_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| SELECTOR_COOKIE_NAME.to_string()),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn rules(&self) -> &CompiledRuleSet {
        &self.rules
    }

    pub fn select<'a>(&'a self, input: &SelectionInput<'a>) -> Selection<'a> {
        if let Some(policy) = input.cookie {
            return Selection::new(policy, SelectionSource::Cookie);
        }

        let Some(user) = input.user else {
            return Selection::new(&self.unauthenticated_policy, SelectionSource::Unauthenticated);
        };

        match self.rules.first_match(user) {
            Some(rule) => Selection::new(
                rule.policy(),
                SelectionSource::Rule {
                    priority: rule.priority(),
                },
            ),
            None => Selection::new(&self.default_policy, SelectionSource::Default),
        }
    }
}
