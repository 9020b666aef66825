//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → selector (policy name)
//!     → policy_table.rs (policy → routes, longest endpoint prefix)
//!     → Return: matched route or None
//!
//! Table Compilation (at startup):
//!     PolicyConfig[]
//!     → Group routes by policy name
//!     → Freeze as immutable PolicyTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same policy and path always match the same route
//! - Unknown policies are a lookup miss, not an error; the caller decides

pub mod policy_table;

pub use policy_table::{PolicyRoute, PolicyTable};
