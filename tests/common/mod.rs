//! Shared plugin entry points for integration tests.
//!
//! These are the same functions a real plugin cdylib would export; the
//! tests hand them to the bootstrapper directly instead of round-tripping
//! through a compiled library.

#![allow(improper_ctypes_definitions)]
#![allow(dead_code)]

use axum::routing::{get, post};
use plugboot::{BoxError, PluginFuture, PluginOptions, Registrar};

pub unsafe extern "C" fn hello_callback(
    server: &mut dyn Registrar,
    _opts: &PluginOptions,
    done: &mut dyn FnMut(Result<(), BoxError>),
) {
    server.route("/", get(|| async { "hello from plugin" }));
    done(Ok(()));
}

pub unsafe extern "C" fn nested_callback(
    server: &mut dyn Registrar,
    _opts: &PluginOptions,
    done: &mut dyn FnMut(Result<(), BoxError>),
) {
    server.route("/hello", get(|| async { "nested hello" }));
    done(Ok(()));
}

pub unsafe extern "C" fn failing_callback(
    _server: &mut dyn Registrar,
    _opts: &PluginOptions,
    done: &mut dyn FnMut(Result<(), BoxError>),
) {
    done(Err("registration exploded".into()));
}

pub unsafe extern "C" fn echo_async(
    server: &mut dyn Registrar,
    _opts: &PluginOptions,
) -> PluginFuture {
    server.route("/echo", post(|body: String| async move { body }));
    Box::pin(async { Ok(()) })
}

pub unsafe extern "C" fn failing_async(
    _server: &mut dyn Registrar,
    _opts: &PluginOptions,
) -> PluginFuture {
    Box::pin(async { Err("async setup failed".into()) })
}
