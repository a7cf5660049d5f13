//! Async plugin with an exported server-options hook.
//!
//! Build: `cargo build --example async_plugin`
//! Run:   `plugboot -o target/debug/examples/libasync_plugin.so`

use axum::routing::get;
use plugboot::{declare_plugin, PluginFuture, PluginOptions, Registrar, ServerOverrides};

fn register(server: &mut dyn Registrar, opts: &PluginOptions) -> PluginFuture {
    server.route("/status", get(|| async { "ok" }));

    let prefix = opts.prefix.clone();
    Box::pin(async move {
        // async setup (connections, warmup) runs before the server listens
        tracing::debug!(prefix = ?prefix, "async plugin registered");
        Ok(())
    })
}

fn server_options() -> ServerOverrides {
    ServerOverrides {
        log_level: Some("info"),
        ..ServerOverrides::default()
    }
}

declare_plugin!(async register, options = server_options);
