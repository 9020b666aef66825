//! Selection metrics.
//!
//! # Metrics
//! - `policy_selections_total` (counter): decisions by strategy and source
//!
//! # Design Decisions
//! - Recorded by the HTTP layer; `select` itself has no side effects
//! - Exporter installation is left to the host process

use crate::selector::SelectionSource;

pub const POLICY_SELECTIONS_TOTAL: &str = "policy_selections_total";

/// Count one policy decision.
pub fn record_selection(strategy: &'static str, source: SelectionSource) {
    ::metrics::counter!(
        POLICY_SELECTIONS_TOTAL,
        "strategy" => strategy,
        "source" => source.as_str()
    )
    .increment(1);
}
