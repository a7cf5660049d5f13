//! Minimal callback-style plugin.
//!
//! Build: `cargo build --example hello_plugin`
//! Run:   `plugboot target/debug/examples/libhello_plugin.so`

use axum::routing::get;
use plugboot::{declare_plugin, BoxError, PluginOptions, Registrar};

fn register(
    server: &mut dyn Registrar,
    _opts: &PluginOptions,
    done: &mut dyn FnMut(Result<(), BoxError>),
) {
    server.route("/", get(|| async { "hello from plugboot" }));
    done(Ok(()));
}

declare_plugin!(callback register);
