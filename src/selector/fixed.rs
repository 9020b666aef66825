//! The `static` selector: one policy for every request.

use crate::config::schema::StaticSelectorConfig;

#[derive(Debug, Clone)]
pub struct StaticSelector {
    policy: String,
}

impl StaticSelector {
    pub fn new(config: &StaticSelectorConfig) -> Self {
        Self {
            policy: config.policy.clone(),
        }
    }

    pub fn select(&self) -> &str {
        &self.policy
    }
}
