//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! selector, config loader, middleware produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (selection counters)
//!
//! Consumers:
//!     → Log aggregation (stderr)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
