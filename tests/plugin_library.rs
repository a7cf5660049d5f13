//! Whole-process tests against a real plugin library.
//!
//! These build the `hello_plugin` example as a cdylib and launch the
//! binary against it, asserting on the startup log output.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

#[cfg(target_os = "macos")]
const PLUGIN_LIBRARY: &str = "libhello_plugin.dylib";
#[cfg(windows)]
const PLUGIN_LIBRARY: &str = "hello_plugin.dll";
#[cfg(all(unix, not(target_os = "macos")))]
const PLUGIN_LIBRARY: &str = "libhello_plugin.so";

/// Build the example cdylib and return its path.
///
/// Concurrent callers serialize on the build directory lock, so every
/// test can call this directly.
fn plugin_library() -> PathBuf {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = Command::new(cargo)
        .args(["build", "--example", "hello_plugin"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .status()
        .unwrap();
    assert!(status.success(), "building the plugin library failed");

    // current_exe is target/debug/deps/<test binary>
    let mut dir = std::env::current_exe().unwrap();
    dir.pop();
    dir.pop();
    let library = dir.join("examples").join(PLUGIN_LIBRARY);
    assert!(library.exists(), "missing {}", library.display());
    library
}

/// Launch the binary against the plugin, let it boot, then collect its
/// stdout.
fn launch_and_capture(port: &str, pretty: bool) -> String {
    let library = plugin_library();
    let mut command = Command::new(env!("CARGO_BIN_EXE_plugboot"));
    command
        .arg(&library)
        .args(["--log-level", "info", "--port", port])
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if pretty {
        command.arg("--pretty-logs");
    }

    let mut child = command.spawn().unwrap();
    std::thread::sleep(Duration::from_secs(2));
    child.kill().unwrap();
    let output = child.wait_with_output().unwrap();
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_pretty_logs_flag_selects_the_pretty_formatter() {
    let stdout = launch_and_capture("23281", true);

    assert!(stdout.contains("Plugin validated"), "stdout: {stdout}");
    // pretty output puts the source location on its own line
    assert!(stdout.contains("at src"), "stdout: {stdout}");
}

#[test]
fn test_default_log_format_is_compact() {
    let stdout = launch_and_capture("23282", false);

    assert!(stdout.contains("Plugin validated"), "stdout: {stdout}");
    assert!(!stdout.contains("at src"), "stdout: {stdout}");
}
