//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (selector references declared policies)
//! - Reject empty or duplicate policy names and incomplete routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Selector-count checks belong to the selector loader, not here

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{PolicyConfig, PolicySelectorConfig, ProxyConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("policy at index {0} has an empty name")]
    EmptyPolicyName(usize),

    #[error("policy {0:?} is declared more than once")]
    DuplicatePolicy(String),

    #[error("policy {policy:?} has a route with an empty endpoint")]
    EmptyRouteEndpoint { policy: String },

    #[error("policy {policy:?} route {endpoint:?} has an empty backend")]
    EmptyRouteBackend { policy: String, endpoint: String },

    #[error("{field} references undeclared policy {policy:?}")]
    UnknownPolicy { field: String, policy: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let declared = validate_policies(&config.policies, &mut errors);

    // Without declared policies the routing table lives elsewhere.
    if !config.policies.is_empty() {
        for (field, policy) in selector_references(&config.policy_selector) {
            if !declared.contains(policy) {
                errors.push(ValidationError::UnknownPolicy {
                    field,
                    policy: policy.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_policies<'a>(
    policies: &'a [PolicyConfig],
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut declared = HashSet::new();

    for (index, policy) in policies.iter().enumerate() {
        if policy.name.is_empty() {
            errors.push(ValidationError::EmptyPolicyName(index));
        } else if !declared.insert(policy.name.as_str()) {
            errors.push(ValidationError::DuplicatePolicy(policy.name.clone()));
        }

        for route in &policy.routes {
            if route.endpoint.is_empty() {
                errors.push(ValidationError::EmptyRouteEndpoint {
                    policy: policy.name.clone(),
                });
            } else if route.backend.is_empty() {
                errors.push(ValidationError::EmptyRouteBackend {
                    policy: policy.name.clone(),
                    endpoint: route.endpoint.clone(),
                });
            }
        }
    }

    declared
}

/// Every policy name the selector configuration names statically.
fn selector_references(selector: &PolicySelectorConfig) -> Vec<(String, &str)> {
    let mut refs = Vec::new();

    if let Some(cfg) = &selector.static_selector {
        refs.push(("static.policy".to_string(), cfg.policy.as_str()));
    }
    if let Some(cfg) = &selector.claims {
        push_fallback(&mut refs, "claims.default_policy", &cfg.default_policy);
        push_fallback(&mut refs, "claims.unauthenticated_policy", &cfg.unauthenticated_policy);
    }
    if let Some(cfg) = &selector.regex {
        push_fallback(&mut refs, "regex.default_policy", &cfg.default_policy);
        push_fallback(&mut refs, "regex.unauthenticated_policy", &cfg.unauthenticated_policy);
        for (i, rule) in cfg.matches_policies.iter().enumerate() {
            refs.push((format!("regex.matches_policies[{i}].policy"), rule.policy.as_str()));
        }
    }

    refs
}

/// Fallback policies are optional; an unset one references nothing.
fn push_fallback<'a>(refs: &mut Vec<(String, &'a str)>, field: &str, policy: &'a str) {
    if !policy.is_empty() {
        refs.push((field.to_string(), policy));
    }
}
