//! Plugin contract validation.
//!
//! A malformed plugin handed straight to the framework would surface as a
//! confusing framework-internal failure. Validating the declaration first
//! turns that into a clear user-facing error before anything runs.

use thiserror::Error;

use crate::plugin::abi::{
    PluginDeclaration, PluginKind, RegisterAsyncFn, RegisterCallbackFn, ABI_VERSION, CORE_VERSION,
};

/// Contract violations in a loaded plugin declaration.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("plugin was built against ABI version {found}, this launcher expects {expected}")]
    AbiVersion { expected: u32, found: u32 },

    #[error("plugin was built against plugboot {found}, this launcher is {expected}")]
    CoreVersion {
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "callback plugin function should provide the three-argument entry point \
         (server, options, done). Refer to documentation for more information."
    )]
    CallbackShape,

    #[error(
        "async plugin function should provide the two-argument entry point \
         (server, options). Refer to documentation for more information."
    )]
    AsyncShape,
}

/// The validated way into a plugin.
#[derive(Clone, Copy)]
pub enum PluginEntry {
    Callback(RegisterCallbackFn),
    Async(RegisterAsyncFn),
}

/// Check a declaration against the launcher's contract.
///
/// Version checks run first; the shape check then requires the declared kind
/// to carry exactly its own entry point and not the other one.
pub fn validate(declaration: &PluginDeclaration) -> Result<PluginEntry, ContractError> {
    if declaration.abi_version != ABI_VERSION {
        return Err(ContractError::AbiVersion {
            expected: ABI_VERSION,
            found: declaration.abi_version,
        });
    }

    if declaration.core_version != CORE_VERSION {
        return Err(ContractError::CoreVersion {
            expected: CORE_VERSION,
            found: declaration.core_version,
        });
    }

    match declaration.kind {
        PluginKind::Callback => match (declaration.register_callback, declaration.register_async) {
            (Some(register), None) => Ok(PluginEntry::Callback(register)),
            _ => Err(ContractError::CallbackShape),
        },
        PluginKind::Async => match (declaration.register_callback, declaration.register_async) {
            (None, Some(register)) => Ok(PluginEntry::Async(register)),
            _ => Err(ContractError::AsyncShape),
        },
    }
}
