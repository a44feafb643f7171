//! spotctl - control the Spotify desktop client from the command line
//!
//! # Usage
//!
//! ```bash
//! spotctl status
//! spotctl pause
//! spotctl play https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC
//! spotctl status --json
//! ```

use clap::Parser;

use spotctl::cli::{Cli, Command, ExitCode, Output};
use spotctl::commands;
use spotctl::config::Config;
use spotctl::logging::init_logging;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run_cli(cli).await.into()
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = Config::load().resolve(cli.host.as_deref(), cli.timeout);
    tracing::debug!(?config, "Resolved configuration");

    match cli.command {
        Command::Status(cmd) => commands::status_cmd(cmd, config, &output).await,
        Command::Pause(cmd) => commands::pause_cmd(cmd, config, &output).await,
        Command::Unpause(cmd) => commands::unpause_cmd(cmd, config, &output).await,
        Command::Play(cmd) => commands::play_cmd(cmd, config, &output).await,
        Command::Port(cmd) => commands::port_cmd(cmd, config, &output).await,
    }
}
