//! Launch error taxonomy.
//!
//! Every failure is fatal: the launcher is a one-shot process, so nothing is
//! retried or recovered. Errors surface on the terminal and the process
//! exits non-zero. The only non-erroring "failure" is a missing positional
//! argument, which shows help and exits zero — handled in `main`, not here.

use thiserror::Error;

use crate::plugin::abi::BoxError;
use crate::plugin::loader::ResolutionError;
use crate::plugin::validate::ContractError;

/// Everything that can abort a launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Plugin file or declaration could not be located/loaded.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Plugin declaration violates the launcher contract.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Global log subscriber could not be installed.
    #[error("failed to install the log subscriber: {0}")]
    LogInit(String),

    /// The plugin reported a registration failure.
    #[error("plugin registration failed: {0}")]
    Register(BoxError),

    /// Could not bind the listen target.
    #[error("failed to bind {target}: {source}")]
    Bind {
        target: String,
        source: std::io::Error,
    },

    /// The server failed while serving.
    #[error("server error: {0}")]
    Serve(std::io::Error),

    /// Socket-path listening requested on a platform without unix sockets.
    #[error("unix socket listening is not supported on this platform")]
    SocketUnsupported,
}
