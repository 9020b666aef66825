//! The `claims` selector.
//!
//! Routes by the identity provider's routing claim. Used for migrations and
//! sharded deployments, where the IdP is the authority on which cluster owns
//! an account.
//!
//! # Decision Order
//! ```text
//! authenticated (claims present):
//!     routing claim (non-empty) → sticky cookie (non-empty) → default_policy
//! unauthenticated:
//!     sticky cookie (non-empty) → unauthenticated_policy
//! ```
//!
//! Basic-auth clients carry no routing claim, so the cookie is their only
//! way to stay on the cluster they were first sent to.

use crate::config::schema::ClaimsSelectorConfig;
use crate::selector::input::SelectionInput;
use crate::selector::{Selection, SelectionSource, SELECTOR_COOKIE_NAME};

#[derive(Debug, Clone)]
pub struct ClaimsSelector {
    default_policy: String,
    unauthenticated_policy: String,
    cookie_name: String,
}

impl ClaimsSelector {
    pub fn new(config: &ClaimsSelectorConfig) -> Self {
        Self {
            default_policy: config.default_policy.clone(),
            unauthenticated_policy: config.unauthenticated_policy.clone(),
            cookie_name: config
                .selector_cookie_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| SELECTOR_COOKIE_NAME.to_string()),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn select<'a>(&'a self, input: &SelectionInput<'a>) -> Selection<'a> {
        let cookie = input.cookie.filter(|c| !c.is_empty());

        match input.claims {
            Some(claims) => {
                if let Some(policy) = claims.routing_policy() {
                    Selection::new(policy, SelectionSource::Claim)
                } else if let Some(policy) = cookie {
                    Selection::new(policy, SelectionSource::Cookie)
                } else {
                    Selection::new(&self.default_policy, SelectionSource::Default)
                }
            }
            None => match cookie {
                Some(policy) => Selection::new(policy, SelectionSource::Cookie),
                None => Selection::new(&self.unauthenticated_policy, SelectionSource::Unauthenticated),
            },
        }
    }
}
