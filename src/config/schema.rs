//! Configuration schema definitions.
//!
//! The launch configuration is assembled exactly once per invocation, from
//! three layers in precedence order: CLI flags, environment variables, then
//! built-in defaults. After assembly it is read-only for the lifetime of the
//! process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port used when neither the CLI nor the environment provides one.
pub const DEFAULT_PORT: u16 = 3000;

/// Log level used when neither the CLI nor the environment provides one.
pub const DEFAULT_LOG_LEVEL: &str = "fatal";

/// Host used when listening on a bare port.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// One layer of configuration: every key optional.
///
/// Both the argument parser and the environment reader produce one of these.
/// Absent keys mean "this source did not set the option", which is distinct
/// from any concrete value — the merge must be able to tell them apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialConfig {
    pub port: Option<u16>,
    pub socket: Option<PathBuf>,
    pub address: Option<String>,
    pub prefix: Option<String>,
    pub log_level: Option<String>,
    pub pretty_logs: Option<bool>,
    pub plugin_options: Option<bool>,
    pub body_limit: Option<usize>,
}

impl PartialConfig {
    /// Overlay `self` on top of `base`: per key, `self` wins when set.
    pub fn overlay(self, base: PartialConfig) -> PartialConfig {
        PartialConfig {
            port: self.port.or(base.port),
            socket: self.socket.or(base.socket),
            address: self.address.or(base.address),
            prefix: self.prefix.or(base.prefix),
            log_level: self.log_level.or(base.log_level),
            pretty_logs: self.pretty_logs.or(base.pretty_logs),
            plugin_options: self.plugin_options.or(base.plugin_options),
            body_limit: self.body_limit.or(base.body_limit),
        }
    }
}

/// Fully merged and defaulted launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Path to the plugin library, as given on the command line.
    pub file: PathBuf,

    /// TCP port to listen on.
    pub port: u16,

    /// Unix socket path to listen on instead of a TCP port.
    pub socket: Option<PathBuf>,

    /// Address to bind; when set, takes priority over the socket path.
    pub address: Option<String>,

    /// Routing prefix the plugin's routes are mounted under.
    pub prefix: Option<String>,

    /// Log level name (`fatal`, `error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,

    /// Emit human-readable log output instead of the compact format.
    pub pretty_logs: bool,

    /// Let the plugin's exported server options override the derived ones.
    pub plugin_options: bool,

    /// Maximum request body size in bytes, unlimited when absent.
    pub body_limit: Option<usize>,
}

impl LaunchConfig {
    /// Assemble the final configuration: `cli` overlays `env`, defaults fill
    /// whatever is still missing.
    pub fn from_sources(file: PathBuf, cli: PartialConfig, env: PartialConfig) -> Self {
        let merged = cli.overlay(env);
        LaunchConfig {
            file,
            port: merged.port.unwrap_or(DEFAULT_PORT),
            socket: merged.socket,
            address: merged.address,
            prefix: merged.prefix,
            log_level: merged
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            pretty_logs: merged.pretty_logs.unwrap_or(false),
            plugin_options: merged.plugin_options.unwrap_or(false),
            body_limit: merged.body_limit,
        }
    }

    /// Select the listen mode. Exactly one applies, checked in priority
    /// order: explicit address, then socket path, then bare port.
    pub fn listen_mode(&self) -> ListenMode {
        if let Some(address) = &self.address {
            ListenMode::Address(address.clone(), self.port)
        } else if let Some(socket) = &self.socket {
            ListenMode::Socket(socket.clone())
        } else {
            ListenMode::Port(self.port)
        }
    }
}

/// Where the server binds.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenMode {
    /// Bind `address:port`.
    Address(String, u16),
    /// Bind a unix socket path.
    Socket(PathBuf),
    /// Bind the default host on `port`.
    Port(u16),
}

impl ListenMode {
    /// The TCP bind target, if this mode is TCP at all.
    pub fn tcp_target(&self) -> Option<(String, u16)> {
        match self {
            ListenMode::Address(address, port) => Some((address.clone(), *port)),
            ListenMode::Port(port) => Some((DEFAULT_HOST.to_string(), *port)),
            ListenMode::Socket(_) => None,
        }
    }
}
