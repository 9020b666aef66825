//! Policy Selection Middleware.
//! Tags each request with the policy that serves it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::ObservabilityConfig;
use crate::observability::metrics;
use crate::selector::PolicySelector;

/// State required for policy selection.
#[derive(Clone)]
pub struct PolicySelectorState {
    pub selector: Arc<PolicySelector>,
    pub metrics_enabled: bool,
}

impl PolicySelectorState {
    pub fn new(selector: Arc<PolicySelector>, observability: &ObservabilityConfig) -> Self {
        Self {
            selector,
            metrics_enabled: observability.metrics_enabled,
        }
    }
}

/// Policy chosen for a request, attached to its extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedPolicy(pub String);

/// Must run after the authentication layer so `Claims` and `User` are
/// already in the request extensions.
pub async fn policy_selector_middleware(
    State(state): State<PolicySelectorState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let (policy, source) = {
        let selection = state.selector.select_request(&req);
        (selection.policy.to_string(), selection.source)
    };

    tracing::debug!(
        strategy = state.selector.kind(),
        policy = %policy,
        source = %source,
        path = %req.uri().path(),
        "Policy selected"
    );

    if state.metrics_enabled {
        metrics::record_selection(state.selector.kind(), source);
    }

    req.extensions_mut().insert(SelectedPolicy(policy));
    next.run(req).await
}
