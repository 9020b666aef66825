//! Request middleware.

pub mod policy;

pub use policy::{policy_selector_middleware, PolicySelectorState, SelectedPolicy};
