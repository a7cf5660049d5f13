//! Log subscriber installation.
//!
//! # Responsibilities
//! - Map the configured level name onto a tracing filter directive
//! - Install the global subscriber, compact or pretty, on stdout
//!
//! # Design Decisions
//! - `fatal` is part of the accepted level vocabulary but tracing has no
//!   fatal level; it maps to `error`, the quietest filter that still
//!   surfaces launch-aborting failures.
//! - A subscriber that cannot be installed is a fatal launch error, not a
//!   silent downgrade to unlogged operation.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::LaunchError;
use crate::server::bootstrap::ServerOptions;

/// Translate a level name into a filter directive.
///
/// Unknown names fall back to the `fatal` mapping rather than erroring:
/// the level controls verbosity, and a typo should not take the server down.
pub fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        _ => "error",
    }
}

/// Build the subscriber for the final server options, writing to `writer`.
fn subscriber<W>(options: &ServerOptions, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::new(level_directive(&options.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    if options.pretty_logs {
        Box::new(builder.pretty().finish())
    } else {
        Box::new(builder.compact().finish())
    }
}

/// Install the global subscriber per the final server options.
pub fn init(options: &ServerOptions) -> Result<(), LaunchError> {
    tracing::subscriber::set_global_default(subscriber(options, std::io::stdout))
        .map_err(|e| LaunchError::LogInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fatal_maps_to_error() {
        assert_eq!(level_directive("fatal"), "error");
        assert_eq!(level_directive("FATAL"), "error");
    }

    #[test]
    fn test_known_levels_pass_through() {
        assert_eq!(level_directive("trace"), "trace");
        assert_eq!(level_directive("debug"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("warn"), "warn");
        assert_eq!(level_directive("error"), "error");
    }

    #[test]
    fn test_unknown_levels_fall_back_to_the_default() {
        assert_eq!(level_directive("verbose"), "error");
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Capture {
            self.clone()
        }
    }

    fn emit(pretty_logs: bool) -> String {
        let options = ServerOptions {
            log_level: "info".to_string(),
            body_limit: None,
            pretty_logs,
        };
        let capture = Capture::default();
        let subscriber = subscriber(&options, capture.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("launch marker line");
        });
        capture.contents()
    }

    #[test]
    fn test_pretty_formatter_spreads_events_over_lines() {
        let output = emit(true);
        assert!(output.contains("launch marker line"));
        // pretty output carries a source location on its own line
        assert!(output.lines().count() > 1);
        assert!(output.contains("at "));
    }

    #[test]
    fn test_compact_formatter_is_one_line_per_event() {
        let output = emit(false);
        assert!(output.contains("launch marker line"));
        assert_eq!(output.trim_end().lines().count(), 1);
    }

    #[test]
    fn test_fatal_level_filters_info_events() {
        let options = ServerOptions {
            log_level: "fatal".to_string(),
            body_limit: None,
            pretty_logs: false,
        };
        let capture = Capture::default();
        let subscriber = subscriber(&options, capture.clone());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("should be filtered");
            tracing::error!("should appear");
        });

        let output = capture.contents();
        assert!(!output.contains("should be filtered"));
        assert!(output.contains("should appear"));
    }
}
