//! Regex rule compilation.
//!
//! # Responsibilities
//! - Sort rules by ascending priority (stable, ties keep config order)
//! - Compile every pattern once at load time
//! - Fail the whole load on the first invalid pattern
//!
//! # Design Decisions
//! - Patterns are unanchored: a rule matches when the regex finds a match
//!   anywhere in the property value
//! - `regex` crate semantics (linear time, no backtracking)

use regex::Regex;

use crate::config::schema::{RegexRuleConfig, UserProperty};
use crate::selector::input::User;
use crate::selector::SelectorError;

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    priority: i32,
    property: UserProperty,
    pattern: Regex,
    policy: String,
}

impl CompiledRule {
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn property(&self) -> UserProperty {
        self.property
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Test the rule against a user.
    ///
    /// A property the user doesn't have never matches.
    pub fn matches(&self, user: &User) -> bool {
        let value = match self.property {
            UserProperty::Mail => Some(user.mail.as_str()),
            UserProperty::Username => Some(user.username.as_str()),
            UserProperty::Id => user.id.as_deref(),
        };
        value.is_some_and(|v| self.pattern.is_match(v))
    }
}

/// Immutable, priority-ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    /// Compile the configured rules.
    pub fn compile(configs: &[RegexRuleConfig]) -> Result<Self, SelectorError> {
        let mut indexed: Vec<(usize, &RegexRuleConfig)> = configs.iter().enumerate().collect();
        indexed.sort_by_key(|(_, cfg)| cfg.priority);

        let rules = indexed
            .into_iter()
            .map(|(index, cfg)| {
                let pattern =
                    Regex::new(&cfg.pattern).map_err(|source| SelectorError::InvalidRulePattern {
                        index,
                        priority: cfg.priority,
                        property: cfg.property,
                        pattern: cfg.pattern.clone(),
                        source,
                    })?;
                Ok(CompiledRule {
                    priority: cfg.priority,
                    property: cfg.property,
                    pattern,
                    policy: cfg.policy.clone(),
                })
            })
            .collect::<Result<Vec<_>, SelectorError>>()?;

        Ok(Self { rules })
    }

    /// First rule, in priority order, that matches the user.
    pub fn first_match(&self, user: &User) -> Option<&CompiledRule> {
        self.rules.iter().find(|rule| rule.matches(user))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(priority: i32, property: UserProperty, pattern: &str, policy: &str) -> RegexRuleConfig {
        RegexRuleConfig {
            priority,
            property,
            pattern: pattern.into(),
            policy: policy.into(),
        }
    }

    #[test]
    fn test_sorted_by_priority() {
        let set = CompiledRuleSet::compile(&[
            rule(30, UserProperty::Username, "c", "three"),
            rule(10, UserProperty::Mail, "a", "one"),
            rule(20, UserProperty::Id, "b", "two"),
        ])
        .unwrap();

        let order: Vec<i32> = set.iter().map(CompiledRule::priority).collect();
        assert_eq!(order, vec![10, 20, 30]);
    }

    #[test]
    fn test_ties_keep_config_order() {
        let set = CompiledRuleSet::compile(&[
            rule(5, UserProperty::Username, ".+", "first"),
            rule(1, UserProperty::Username, "^$", "zero"),
            rule(5, UserProperty::Username, ".+", "second"),
        ])
        .unwrap();

        let policies: Vec<&str> = set.iter().map(CompiledRule::policy).collect();
        assert_eq!(policies, vec!["zero", "first", "second"]);

        let user = User {
            username: "einstein".into(),
            ..User::default()
        };
        assert_eq!(set.first_match(&user).map(CompiledRule::policy), Some("first"));
    }

    #[test]
    fn test_invalid_pattern_names_rule() {
        let err = CompiledRuleSet::compile(&[
            rule(10, UserProperty::Mail, ".*", "ok"),
            rule(20, UserProperty::Username, "(unclosed", "broken"),
        ])
        .unwrap_err();

        match &err {
            SelectorError::InvalidRulePattern {
                index,
                priority,
                property,
                pattern,
                ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(*priority, 20);
                assert_eq!(*property, UserProperty::Username);
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_unanchored_match() {
        let set = CompiledRuleSet::compile(&[rule(1, UserProperty::Mail, "example", "p")]).unwrap();
        let user = User {
            mail: "mary@example.org".into(),
            ..User::default()
        };
        assert!(set.first_match(&user).is_some());
    }

    #[test]
    fn test_missing_id_skipped() {
        let set = CompiledRuleSet::compile(&[
            rule(1, UserProperty::Id, ".*", "by-id"),
            rule(2, UserProperty::Username, ".*", "by-name"),
        ])
        .unwrap();

        let user = User::default();
        assert_eq!(set.first_match(&user).map(CompiledRule::policy), Some("by-name"));

        let user = User {
            id: Some("b1f74ec4".into()),
            ..User::default()
        };
        assert_eq!(set.first_match(&user).map(CompiledRule::policy), Some("by-id"));
    }
}
