//! Request-scoped selector inputs.
//!
//! The authentication layer runs before the selector and leaves what it
//! learned about the caller in the request extensions: a [`Claims`] bag for
//! token-authenticated requests and a resolved [`User`] record. The sticky
//! cookie is read straight from the `Cookie` headers.

use std::collections::HashMap;

use axum::http::{header, Request};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim carrying the identity provider's routing decision.
pub const ROUTING_POLICY_CLAIM: &str = "opencloud.routing.policy";

/// Authenticated claims of the caller, keyed by claim name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(HashMap<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, returning the bag for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The routing policy claim, if it is a non-empty string.
    pub fn routing_policy(&self) -> Option<&str> {
        self.get(ROUTING_POLICY_CLAIM)
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }
}

impl From<HashMap<String, Value>> for Claims {
    fn from(claims: HashMap<String, Value>) -> Self {
        Self(claims)
    }
}

/// The resolved account behind a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub mail: String,
    pub username: String,
    /// Opaque account id; absent until the user has been provisioned.
    pub id: Option<String>,
}

/// Everything a strategy may look at when choosing a policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionInput<'a> {
    pub claims: Option<&'a Claims>,
    pub user: Option<&'a User>,
    pub cookie: Option<&'a str>,
}

impl<'a> SelectionInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claims(mut self, claims: &'a Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn with_user(mut self, user: &'a User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_cookie(mut self, cookie: &'a str) -> Self {
        self.cookie = Some(cookie);
        self
    }

    /// Collect the inputs from an inbound request.
    ///
    /// `cookie_name` is `None` for strategies that never read the cookie.
    pub fn from_request<B>(req: &'a Request<B>, cookie_name: Option<&str>) -> Self {
        let extensions = req.extensions();
        Self {
            claims: extensions.get::<Claims>(),
            user: extensions.get::<User>(),
            cookie: cookie_name.and_then(|name| find_cookie(req, name)),
        }
    }
}

/// Return the value of the first cookie called `name`.
///
/// A bare name without `=` is a cookie with an empty value.
fn find_cookie<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .map(|pair| pair.trim().split_once('=').unwrap_or((pair.trim(), "")))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| strip_quotes(v.trim()))
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
