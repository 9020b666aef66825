//! Policy route table.
//!
//! # Responsibilities
//! - Store each policy's routes
//! - Look up the route for a (policy, path) pair
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) policy lookup via HashMap
//! - Longest endpoint prefix wins; equal prefixes keep config order
//! - Path matching is case-sensitive

use std::collections::HashMap;

use crate::config::schema::PolicyConfig;

/// A single route of a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRoute {
    pub endpoint: String,
    pub backend: String,
}

impl PolicyRoute {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.endpoint)
    }
}

/// Routes of every configured policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    policies: HashMap<String, Vec<PolicyRoute>>,
}

impl PolicyTable {
    pub fn from_config(configs: &[PolicyConfig]) -> Self {
        let mut policies: HashMap<String, Vec<PolicyRoute>> = HashMap::new();
        for config in configs {
            let routes = policies.entry(config.name.clone()).or_default();
            routes.extend(config.routes.iter().map(|r| PolicyRoute {
                endpoint: r.endpoint.clone(),
                backend: r.backend.clone(),
            }));
        }
        Self { policies }
    }

    pub fn contains(&self, policy: &str) -> bool {
        self.policies.contains_key(policy)
    }

    pub fn policy_names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Find the route serving `path` under `policy`.
    pub fn route(&self, policy: &str, path: &str) -> Option<&PolicyRoute> {
        let routes = self.policies.get(policy)?;
        let mut best: Option<&PolicyRoute> = None;
        for route in routes.iter().filter(|r| r.matches(path)) {
            if best.map_or(true, |b| route.endpoint.len() > b.endpoint.len()) {
                best = Some(route);
            }
        }
        best
    }
}
