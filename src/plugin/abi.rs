//! Plugin ABI definitions.
//!
//! # Responsibilities
//! - Define the declaration record every plugin library exports
//! - Define the registrar surface plugins register routes through
//! - Provide the [`declare_plugin!`] macro that emits the exported record
//!
//! # Design Decisions
//! - Plugins declare their shape up front instead of the launcher probing
//!   call signatures at runtime. The declaration names its kind and carries
//!   the matching entry point; the validator cross-checks the two.
//! - Rust has no stable ABI for the types crossing the boundary, so the
//!   declaration embeds the launcher version it was compiled against and the
//!   loader refuses anything else. Same constraint, and same mechanism, as
//!   loading a plugin against the framework version its project declares.

use axum::routing::MethodRouter;
use futures_util::future::BoxFuture;

/// Bumped whenever the declaration layout or the registrar surface changes.
pub const ABI_VERSION: u32 = 1;

/// The launcher version plugins are compiled against.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exported declaration symbol name looked up by the loader.
pub const DECLARATION_SYMBOL: &[u8] = b"plugin_declaration";

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by async plugin entry points.
pub type PluginFuture = BoxFuture<'static, Result<(), BoxError>>;

/// Three-argument callback-style entry point: registrar, options, and a
/// completion callback. An `Err` handed to the callback aborts the launch.
pub type RegisterCallbackFn = unsafe extern "C" fn(
    &mut dyn Registrar,
    &PluginOptions,
    &mut dyn FnMut(Result<(), BoxError>),
);

/// Two-argument async entry point: registrar and options. The launcher
/// awaits the returned future before listening.
pub type RegisterAsyncFn =
    unsafe extern "C" fn(&mut dyn Registrar, &PluginOptions) -> PluginFuture;

/// Optional hook exporting server option overrides, honored only when the
/// launcher runs with `--options`.
pub type ServerOptionsFn = unsafe extern "C" fn() -> ServerOverrides;

/// Which of the two accepted plugin shapes the declaration claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// Synchronous registration with a completion callback.
    Callback,
    /// Async registration the launcher awaits.
    Async,
}

/// The record every plugin library exports as `plugin_declaration`.
#[derive(Clone, Copy)]
pub struct PluginDeclaration {
    pub abi_version: u32,
    pub core_version: &'static str,
    pub kind: PluginKind,
    pub register_callback: Option<RegisterCallbackFn>,
    pub register_async: Option<RegisterAsyncFn>,
    pub server_options: Option<ServerOptionsFn>,
}

/// Surface plugins register their routes through.
///
/// Implemented by the bootstrapper over a fresh router; kept as a trait so
/// the entry-point signatures do not name the backing framework types and
/// tests can substitute a recording implementation.
pub trait Registrar {
    /// Mount a method router at `path`.
    fn route(&mut self, path: &str, handler: MethodRouter);
}

/// Options the launcher hands to the plugin at registration time.
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    /// Routing prefix the plugin is mounted under, when configured.
    pub prefix: Option<String>,
}

/// Server option overrides a plugin may export.
///
/// `None` fields leave the launcher-derived value untouched.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub log_level: Option<&'static str>,
    pub body_limit: Option<usize>,
    pub pretty_logs: Option<bool>,
}

/// Export a plugin declaration from a cdylib.
///
/// Callback shape:
/// ```ignore
/// fn register(server: &mut dyn Registrar, opts: &PluginOptions,
///             done: &mut dyn FnMut(Result<(), BoxError>)) { ... }
/// plugboot::declare_plugin!(callback register);
/// ```
///
/// Async shape:
/// ```ignore
/// fn register(server: &mut dyn Registrar, opts: &PluginOptions) -> PluginFuture { ... }
/// plugboot::declare_plugin!(async register);
/// ```
///
/// Either form accepts a trailing `options = <fn() -> ServerOverrides>`.
#[macro_export]
macro_rules! declare_plugin {
    (callback $register:path $(, options = $options:path)?) => {
        #[allow(improper_ctypes_definitions)]
        unsafe extern "C" fn __plugboot_register(
            server: &mut dyn $crate::Registrar,
            opts: &$crate::PluginOptions,
            done: &mut dyn FnMut(::core::result::Result<(), $crate::BoxError>),
        ) {
            $register(server, opts, done)
        }

        #[allow(non_upper_case_globals)]
        #[no_mangle]
        pub static plugin_declaration: $crate::PluginDeclaration = $crate::PluginDeclaration {
            abi_version: $crate::ABI_VERSION,
            core_version: $crate::CORE_VERSION,
            kind: $crate::PluginKind::Callback,
            register_callback: ::core::option::Option::Some(__plugboot_register),
            register_async: ::core::option::Option::None,
            server_options: $crate::declare_plugin!(@options $($options)?),
        };
    };
    (async $register:path $(, options = $options:path)?) => {
        #[allow(improper_ctypes_definitions)]
        unsafe extern "C" fn __plugboot_register(
            server: &mut dyn $crate::Registrar,
            opts: &$crate::PluginOptions,
        ) -> $crate::PluginFuture {
            $register(server, opts)
        }

        #[allow(non_upper_case_globals)]
        #[no_mangle]
        pub static plugin_declaration: $crate::PluginDeclaration = $crate::PluginDeclaration {
            abi_version: $crate::ABI_VERSION,
            core_version: $crate::CORE_VERSION,
            kind: $crate::PluginKind::Async,
            register_callback: ::core::option::Option::None,
            register_async: ::core::option::Option::Some(__plugboot_register),
            server_options: $crate::declare_plugin!(@options $($options)?),
        };
    };
    (@options) => {
        ::core::option::Option::None
    };
    (@options $options:path) => {{
        #[allow(improper_ctypes_definitions)]
        unsafe extern "C" fn __plugboot_server_options() -> $crate::ServerOverrides {
            $options()
        }
        ::core::option::Option::Some(
            __plugboot_server_options as $crate::ServerOptionsFn,
        )
    }};
}
