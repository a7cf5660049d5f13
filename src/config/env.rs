//! Environment variable configuration source.
//!
//! # Responsibilities
//! - Map the fixed set of variable names onto configuration keys
//! - Leave unset variables absent, never defaulted (defaulting happens in
//!   the merge layer)
//!
//! Reading the environment has no side effects and no error conditions:
//! values that do not parse for a typed key are dropped as if unset.

use std::path::PathBuf;

use crate::config::schema::PartialConfig;

pub const ENV_PORT: &str = "FASTIFY_PORT";
pub const ENV_SOCKET: &str = "FASTIFY_SOCKET";
pub const ENV_OPTIONS: &str = "FASTIFY_OPTIONS";
pub const ENV_ADDRESS: &str = "FASTIFY_ADDRESS";
pub const ENV_PREFIX: &str = "FASTIFY_PREFIX";
pub const ENV_LOG_LEVEL: &str = "FASTIFY_LOG_LEVEL";
pub const ENV_PRETTY_LOGS: &str = "FASTIFY_PRETTY_LOGS";
/// Historical spelling, kept because existing deployments set it.
pub const ENV_BODY_LIMIT: &str = "FASTIFT_BODY_LIMIT";

/// Read the configuration layer from the process environment.
pub fn from_env() -> PartialConfig {
    from_vars(std::env::vars())
}

/// Build the environment layer from an explicit variable list.
///
/// `from_env` delegates here; tests call this directly instead of mutating
/// the process environment.
pub fn from_vars(vars: impl Iterator<Item = (String, String)>) -> PartialConfig {
    let mut config = PartialConfig::default();

    for (name, value) in vars {
        match name.as_str() {
            ENV_PORT => config.port = value.parse().ok(),
            ENV_SOCKET => config.socket = Some(PathBuf::from(value)),
            ENV_OPTIONS => config.plugin_options = Some(truthy(&value)),
            ENV_ADDRESS => config.address = Some(value),
            ENV_PREFIX => config.prefix = Some(value),
            ENV_LOG_LEVEL => config.log_level = Some(value),
            ENV_PRETTY_LOGS => config.pretty_logs = Some(truthy(&value)),
            ENV_BODY_LIMIT => config.body_limit = value.parse().ok(),
            _ => {}
        }
    }

    config
}

fn truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
