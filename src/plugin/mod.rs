//! Plugin loading, declaration, and contract validation.
//!
//! A plugin is a cdylib exporting a [`abi::PluginDeclaration`] (normally via
//! the [`declare_plugin!`](crate::declare_plugin) macro). The loader reads
//! the declaration; the validator checks it against the launcher's contract
//! and yields the single entry point the bootstrapper will call.

pub mod abi;
pub mod loader;
pub mod validate;

pub use abi::{PluginDeclaration, PluginKind, PluginOptions, Registrar, ServerOverrides};
pub use loader::{LoadedPlugin, ResolutionError};
pub use validate::{ContractError, PluginEntry};
