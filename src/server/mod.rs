//! Server bootstrapping and log setup.

pub mod bootstrap;
pub mod logging;

pub use bootstrap::{build_app, listen, resolve_options, run, ServerOptions};
