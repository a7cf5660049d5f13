//! Configuration assembly.
//!
//! Two sources feed the launch configuration: CLI flags (see [`crate::cli`])
//! and environment variables ([`env`]). CLI values win per key; defaults fill
//! last. The merged [`LaunchConfig`] is owned by the bootstrapper and never
//! mutated after the server starts.

pub mod env;
pub mod schema;

pub use schema::{LaunchConfig, ListenMode, PartialConfig};
