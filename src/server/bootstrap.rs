//! Server bootstrapping.
//!
//! # Responsibilities
//! - Derive the final server options (plugin overrides included)
//! - Run the plugin's registration entry point over a fresh router
//! - Apply prefix nesting and middleware layers
//! - Bind exactly one listen target and serve until failure
//!
//! The stages run strictly in order — configure, register, listen — and any
//! stage's failure aborts the launch.

use std::path::Path;

use axum::routing::MethodRouter;
use axum::Router;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::schema::{LaunchConfig, ListenMode, DEFAULT_HOST};
use crate::error::LaunchError;
use crate::plugin::abi::{BoxError, PluginDeclaration, PluginOptions, Registrar, ServerOverrides};
use crate::plugin::loader::LoadedPlugin;
use crate::plugin::validate::{self, PluginEntry};
use crate::server::logging;

/// Options handed to the framework, derived from the launch configuration
/// and optionally overridden by the plugin's exported hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerOptions {
    pub log_level: String,
    pub body_limit: Option<usize>,
    pub pretty_logs: bool,
}

impl ServerOptions {
    pub fn from_config(config: &LaunchConfig) -> Self {
        ServerOptions {
            log_level: config.log_level.clone(),
            body_limit: config.body_limit,
            pretty_logs: config.pretty_logs,
        }
    }

    /// Merge plugin-exported overrides over the derived options.
    pub fn apply(&mut self, overrides: ServerOverrides) {
        if let Some(level) = overrides.log_level {
            self.log_level = level.to_string();
        }
        if let Some(limit) = overrides.body_limit {
            self.body_limit = Some(limit);
        }
        if let Some(pretty) = overrides.pretty_logs {
            self.pretty_logs = pretty;
        }
    }
}

/// Registrar over an axum router.
struct RouterRegistrar {
    router: Option<Router>,
}

impl RouterRegistrar {
    fn new() -> Self {
        RouterRegistrar { router: None }
    }

    fn into_router(self) -> Router {
        self.router.unwrap_or_default()
    }
}

impl Registrar for RouterRegistrar {
    fn route(&mut self, path: &str, handler: MethodRouter) {
        let router = self.router.take().unwrap_or_default();
        self.router = Some(router.route(path, handler));
    }
}

/// Run the whole launch: validate, configure, register, listen.
///
/// Returns only on failure; on success the server serves until the process
/// is killed.
pub async fn run(config: LaunchConfig, plugin: LoadedPlugin) -> Result<(), LaunchError> {
    let entry = validate::validate(plugin.declaration())?;

    let options = resolve_options(&config, plugin.declaration());

    logging::init(&options)?;
    tracing::info!(
        file = %config.file.display(),
        log_level = %options.log_level,
        "Plugin validated"
    );

    let app = build_app(&options, config.prefix.as_deref(), entry).await?;
    listen(&config, app).await
}

/// Final server options: the plugin's exported hook applies only when the
/// launcher was told to honor it.
pub fn resolve_options(
    config: &LaunchConfig,
    declaration: &PluginDeclaration,
) -> ServerOptions {
    let mut options = ServerOptions::from_config(config);
    if config.plugin_options {
        if let Some(hook) = declaration.server_options {
            // SAFETY: the declaration passed validation and the library
            // handle is still alive.
            options.apply(unsafe { hook() });
        }
    }
    options
}

/// Register the plugin and assemble the final router.
pub async fn build_app(
    options: &ServerOptions,
    prefix: Option<&str>,
    entry: PluginEntry,
) -> Result<Router, LaunchError> {
    let mut registrar = RouterRegistrar::new();
    let plugin_options = PluginOptions {
        prefix: prefix.map(str::to_string),
    };

    match entry {
        PluginEntry::Callback(register) => {
            let mut outcome: Option<Result<(), BoxError>> = None;
            let mut done = |result: Result<(), BoxError>| outcome = Some(result);
            // SAFETY: entry point signature was checked by the validator;
            // the registrar and options outlive the call.
            unsafe { register(&mut registrar, &plugin_options, &mut done) };
            if let Some(Err(error)) = outcome {
                return Err(LaunchError::Register(error));
            }
        }
        PluginEntry::Async(register) => {
            // SAFETY: as above; the returned future owns what it captures.
            let registration = unsafe { register(&mut registrar, &plugin_options) };
            registration.await.map_err(LaunchError::Register)?;
        }
    }

    let mut app = registrar.into_router();

    if let Some(prefix) = prefix.and_then(normalized_prefix) {
        app = Router::new().nest(&prefix, app);
    }

    if let Some(limit) = options.body_limit {
        app = app.layer(RequestBodyLimitLayer::new(limit));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Normalize a routing prefix for nesting: leading slash required, a bare
/// or empty slash means no nesting at all.
fn normalized_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// Bind the configured listen target and serve.
pub async fn listen(config: &LaunchConfig, app: Router) -> Result<(), LaunchError> {
    match config.listen_mode() {
        ListenMode::Address(address, port) => serve_tcp(&address, port, app).await,
        ListenMode::Socket(path) => serve_unix(&path, app).await,
        ListenMode::Port(port) => serve_tcp(DEFAULT_HOST, port, app).await,
    }
}

async fn serve_tcp(address: &str, port: u16, app: Router) -> Result<(), LaunchError> {
    let listener = TcpListener::bind((address, port))
        .await
        .map_err(|source| LaunchError::Bind {
            target: format!("{address}:{port}"),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(LaunchError::Serve)?;

    tracing::info!(address = %local_addr, "Server listening");

    axum::serve(listener, app).await.map_err(LaunchError::Serve)
}

#[cfg(unix)]
async fn serve_unix(path: &Path, app: Router) -> Result<(), LaunchError> {
    let listener = UnixListener::bind(path).map_err(|source| LaunchError::Bind {
        target: path.display().to_string(),
        source,
    })?;

    tracing::info!(socket = %path.display(), "Server listening");

    axum::serve(listener, app).await.map_err(LaunchError::Serve)
}

#[cfg(not(unix))]
async fn serve_unix(_path: &Path, _app: Router) -> Result<(), LaunchError> {
    Err(LaunchError::SocketUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PartialConfig;
    use crate::plugin::abi::{PluginKind, ABI_VERSION, CORE_VERSION};
    use std::path::PathBuf;

    fn default_config() -> LaunchConfig {
        LaunchConfig::from_sources(
            PathBuf::from("plugin.so"),
            PartialConfig::default(),
            PartialConfig::default(),
        )
    }

    #[allow(improper_ctypes_definitions)]
    unsafe extern "C" fn overrides_hook() -> ServerOverrides {
        ServerOverrides {
            log_level: Some("debug"),
            body_limit: Some(42),
            pretty_logs: Some(true),
        }
    }

    fn declaration_with_hook() -> PluginDeclaration {
        PluginDeclaration {
            abi_version: ABI_VERSION,
            core_version: CORE_VERSION,
            kind: PluginKind::Callback,
            register_callback: None,
            register_async: None,
            server_options: Some(overrides_hook),
        }
    }

    #[test]
    fn test_options_flag_lets_the_plugin_override() {
        let mut config = default_config();
        config.plugin_options = true;

        let options = resolve_options(&config, &declaration_with_hook());

        assert_eq!(options.log_level, "debug");
        assert_eq!(options.body_limit, Some(42));
        assert!(options.pretty_logs);
    }

    #[test]
    fn test_without_the_options_flag_the_hook_is_ignored() {
        let config = default_config();

        let options = resolve_options(&config, &declaration_with_hook());

        assert_eq!(options, ServerOptions::from_config(&config));
    }

    #[test]
    fn test_options_flag_without_a_hook_changes_nothing() {
        let mut config = default_config();
        config.plugin_options = true;
        let mut declaration = declaration_with_hook();
        declaration.server_options = None;

        let options = resolve_options(&config, &declaration);

        assert_eq!(options, ServerOptions::from_config(&config));
    }

    #[test]
    fn test_overrides_apply_field_wise() {
        let config = LaunchConfig::from_sources(
            PathBuf::from("plugin.so"),
            PartialConfig {
                body_limit: Some(512),
                ..PartialConfig::default()
            },
            PartialConfig::default(),
        );
        let mut options = ServerOptions::from_config(&config);

        options.apply(ServerOverrides {
            log_level: Some("info"),
            body_limit: None,
            pretty_logs: Some(true),
        });

        assert_eq!(options.log_level, "info");
        // untouched fields keep their derived values
        assert_eq!(options.body_limit, Some(512));
        assert!(options.pretty_logs);
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(normalized_prefix("api"), Some("/api".to_string()));
        assert_eq!(normalized_prefix("/api"), Some("/api".to_string()));
        assert_eq!(normalized_prefix("/api/"), Some("/api".to_string()));
        assert_eq!(normalized_prefix("/"), None);
        assert_eq!(normalized_prefix(""), None);
    }
}
