//! Command-line argument parsing.
//!
//! Usage shape is `plugboot <file> [options]`: flags may appear before or
//! after the file path. The parser is deliberately permissive about flags it
//! does not recognize: a pre-scan strips unrecognized hyphen tokens before
//! clap sees the argument list, so wrapper scripts can pass extra switches
//! through without taking the launcher down.
//!
//! No flag carries a clap-level default: every value is optional so the
//! merge layer can tell "given on the CLI" apart from "defaulted", which is
//! what lets environment variables fill in behind the CLI.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::PartialConfig;

const ENV_HELP: &str = "Environment variables (CLI flags take precedence):
  FASTIFY_PORT         port to listen on
  FASTIFY_SOCKET       unix socket path to listen on
  FASTIFY_ADDRESS      address to bind
  FASTIFY_PREFIX       routing prefix for the plugin
  FASTIFY_LOG_LEVEL    log level
  FASTIFY_PRETTY_LOGS  human-readable log output
  FASTIFY_OPTIONS      honor the plugin's exported server options
  FASTIFT_BODY_LIMIT   maximum request body size in bytes
                       (historical spelling, kept for compatibility)";

/// Flags that consume the following token as their value.
const VALUE_FLAGS: &[&str] = &[
    "-p",
    "--port",
    "-s",
    "--socket",
    "-a",
    "--address",
    "-r",
    "--prefix",
    "-l",
    "--log-level",
    "--body-limit",
];

/// Flags that stand alone.
const SWITCH_FLAGS: &[&str] = &[
    "-P",
    "--pretty-logs",
    "-o",
    "--options",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// Boot an HTTP server around a compiled plugin library.
#[derive(Debug, Parser)]
#[command(name = "plugboot", version, after_help = ENV_HELP)]
#[command(about = "Boot an HTTP server around a compiled plugin library")]
pub struct Cli {
    /// Plugin library to load and serve; exactly one path is expected
    #[arg(value_name = "FILE")]
    pub args: Vec<String>,

    /// Port to listen on [default: 3000]
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Unix socket path to listen on
    #[arg(short = 's', long)]
    pub socket: Option<PathBuf>,

    /// Address to bind [default: 127.0.0.1]
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Routing prefix the plugin is mounted under
    #[arg(short = 'r', long)]
    pub prefix: Option<String>,

    /// Log level: fatal, error, warn, info, debug or trace [default: fatal]
    #[arg(short = 'l', long)]
    pub log_level: Option<String>,

    /// Human-readable log output instead of the compact format
    #[arg(short = 'P', long)]
    pub pretty_logs: bool,

    /// Honor the plugin's exported server options
    #[arg(short = 'o', long)]
    pub options: bool,

    /// Maximum request body size in bytes
    #[arg(long)]
    pub body_limit: Option<usize>,
}

/// Drop hyphen tokens the launcher does not recognize.
///
/// Known flags and every non-hyphen token pass through untouched, in order,
/// so clap still associates value flags with the token that follows them.
/// Everything after a literal `--` is passed through verbatim.
fn sanitize(args: impl Iterator<Item = String>) -> Vec<String> {
    let mut cleaned = Vec::new();
    let mut escaped = false;

    for (index, arg) in args.enumerate() {
        // argv[0] is the program name, never a flag
        if index == 0 || escaped || !arg.starts_with('-') || arg == "-" {
            cleaned.push(arg);
            continue;
        }
        if arg == "--" {
            escaped = true;
            cleaned.push(arg);
            continue;
        }

        let known = if arg.starts_with("--") {
            let name = arg.split('=').next().unwrap_or(&arg);
            VALUE_FLAGS.contains(&name) || SWITCH_FLAGS.contains(&name)
        } else {
            // short flag, possibly clustered or with an attached value
            let head = if arg.is_char_boundary(2) { &arg[..2] } else { "" };
            VALUE_FLAGS.contains(&head) || SWITCH_FLAGS.contains(&head)
        };

        if known {
            cleaned.push(arg);
        }
    }

    cleaned
}

impl Cli {
    /// Parse a raw argument list, unknown flags stripped first.
    pub fn parse_permissive<I, T>(args: I) -> Result<Cli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Cli::try_parse_from(sanitize(args.into_iter().map(Into::into)))
    }

    /// The recognized positional arguments, in order.
    pub fn positionals(&self) -> Vec<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|arg| !arg.starts_with('-'))
            .collect()
    }

    /// The plugin file path, present only when exactly one positional was
    /// given.
    pub fn file(&self) -> Option<PathBuf> {
        match self.positionals().as_slice() {
            [file] => Some(PathBuf::from(file)),
            _ => None,
        }
    }

    /// This source's configuration layer. Absent flags stay absent; a
    /// boolean flag is only "provided" when actually present, so it cannot
    /// clobber an environment value it never mentioned.
    pub fn partial(&self) -> PartialConfig {
        PartialConfig {
            port: self.port,
            socket: self.socket.clone(),
            address: self.address.clone(),
            prefix: self.prefix.clone(),
            log_level: self.log_level.clone(),
            pretty_logs: self.pretty_logs.then_some(true),
            plugin_options: self.options.then_some(true),
            body_limit: self.body_limit,
        }
    }
}
