//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! Request (from the host proxy's listener)
//!     → [authentication layer inserts Claims / User]
//!     → middleware/policy.rs (select policy, insert SelectedPolicy)
//!     → [dispatch: routing::PolicyTable lookup, forwarding]
//! ```

pub mod middleware;

pub use middleware::{policy_selector_middleware, PolicySelectorState, SelectedPolicy};
