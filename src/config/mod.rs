//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → selector::PolicySelector::load (strategy choice, rule compilation)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClaimsSelectorConfig;
pub use schema::ObservabilityConfig;
pub use schema::PolicyConfig;
pub use schema::PolicyRouteConfig;
pub use schema::PolicySelectorConfig;
pub use schema::ProxyConfig;
pub use schema::RegexRuleConfig;
pub use schema::RegexSelectorConfig;
pub use schema::StaticSelectorConfig;
pub use schema::UserProperty;
pub use validation::ValidationError;
