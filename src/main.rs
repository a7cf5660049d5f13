//! plugboot entry point.
//!
//! Exit codes: 0 on normal termination or help display (a missing file
//! argument shows help and exits zero), 1 on any fatal error, including
//! malformed flag values.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::CommandFactory;

use plugboot::cli::Cli;
use plugboot::config::{env, LaunchConfig};
use plugboot::plugin::loader::{self, LoadedPlugin};
use plugboot::{server, LaunchError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::parse_permissive(std::env::args()) {
        Ok(cli) => cli,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = error.print();
            return code;
        }
    };

    let file = match cli.file() {
        Some(file) => file,
        None => {
            eprintln!("Error: Missing the required file parameter\n");
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
    };

    match launch(cli, file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn launch(cli: Cli, file: PathBuf) -> Result<(), LaunchError> {
    let config = LaunchConfig::from_sources(file, cli.partial(), env::from_env());

    let path = loader::resolve(&config.file)?;
    let plugin = LoadedPlugin::load(&path)?;

    server::run(config, plugin).await
}
