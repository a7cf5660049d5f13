//! Plugin library resolution and loading.
//!
//! The positional path is resolved against the current working directory,
//! never against the launcher's own location: the plugin belongs to the
//! target project, so relative paths must mean what they mean in the shell
//! that invoked us. Every failure here is fatal.

use std::path::{Path, PathBuf};

use libloading::Library;
use thiserror::Error;

use crate::plugin::abi::{PluginDeclaration, DECLARATION_SYMBOL};

/// Errors locating or loading the plugin library.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed to resolve the working directory: {0}")]
    WorkingDir(#[from] std::io::Error),

    #[error("plugin not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to load plugin library {path}: {source}")]
    Load {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("plugin library {path} does not export a plugin_declaration; was it built with declare_plugin!?")]
    MissingDeclaration {
        path: PathBuf,
        source: libloading::Error,
    },
}

/// Resolve the positional path relative to the current working directory.
pub fn resolve(file: &Path) -> Result<PathBuf, ResolutionError> {
    let cwd = std::env::current_dir()?;
    let path = cwd.join(file);
    if path.exists() {
        Ok(path)
    } else {
        Err(ResolutionError::NotFound { path })
    }
}

/// A plugin library with its declaration read out.
///
/// The library handle must outlive every call into the plugin, so it is kept
/// alongside the copied declaration for the whole launch.
pub struct LoadedPlugin {
    declaration: PluginDeclaration,
    _library: Library,
}

impl LoadedPlugin {
    /// Load the library at `path` and read its exported declaration.
    pub fn load(path: &Path) -> Result<Self, ResolutionError> {
        // SAFETY: loading a library runs its initializers. The whole point
        // of the launcher is to execute the user-supplied plugin, so this is
        // the trust boundary the user opted into by naming the file.
        let library = unsafe { Library::new(path) }.map_err(|source| ResolutionError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: the symbol is declared by declare_plugin! as a static
        // PluginDeclaration; the validator rejects mismatched ABI versions
        // before any entry point is called.
        let declaration = unsafe {
            library
                .get::<*const PluginDeclaration>(DECLARATION_SYMBOL)
                .map_err(|source| ResolutionError::MissingDeclaration {
                    path: path.to_path_buf(),
                    source,
                })
                .map(|symbol| **symbol)
        }?;

        Ok(LoadedPlugin {
            declaration,
            _library: library,
        })
    }

    pub fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }
}
