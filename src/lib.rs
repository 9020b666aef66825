//! Request-routing policy engine for a multi-cluster reverse proxy.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod selector;

pub use config::schema::ProxyConfig;
pub use http::{policy_selector_middleware, PolicySelectorState, SelectedPolicy};
pub use routing::PolicyTable;
pub use selector::{PolicySelector, Selection, SelectionInput, SelectionSource, SelectorError};
