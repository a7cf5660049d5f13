//! plugboot: boot an HTTP server around a compiled plugin library.
//!
//! ```text
//!   CLI flags ──┐
//!               ├─ merge (CLI wins) ─▶ LaunchConfig
//!   env vars ───┘                          │
//!                                          ▼
//!   plugin path ─▶ loader ─▶ declaration ─▶ validator ─▶ bootstrapper
//!                                                            │
//!                                            register ─▶ listen ─▶ serve
//! ```
//!
//! The launcher is one-shot glue: it merges configuration, loads the plugin
//! library, checks its declared contract, and hands the rest to the HTTP
//! framework. Every failure past argument parsing is fatal by design.
//!
//! Plugins are cdylibs exporting a declaration via [`declare_plugin!`]; see
//! the `demos/` directory for both accepted shapes.

pub mod cli;
pub mod config;
pub mod error;
pub mod plugin;
pub mod server;

pub use config::schema::LaunchConfig;
pub use error::LaunchError;
pub use plugin::abi::{
    BoxError, PluginDeclaration, PluginFuture, PluginKind, PluginOptions, Registrar,
    RegisterAsyncFn, RegisterCallbackFn, ServerOptionsFn, ServerOverrides, ABI_VERSION,
    CORE_VERSION,
};
pub use plugin::loader::LoadedPlugin;
