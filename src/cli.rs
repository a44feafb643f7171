//! CLI - Command Line Interface for spotctl
//!
//! Every command prints the player status it got back. All output is
//! JSON-parseable with `--json` (the default when stdout is not a TTY).
//!
//! # Examples
//!
//! ```bash
//! spotctl status
//! spotctl pause
//! spotctl unpause
//! spotctl play https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC
//! spotctl play spotify:track:4uLU6hMCjMI75M1A2tKUQC --context spotify:album:6N9PS4QXF1D0OWPk0Sxtb4
//! spotctl --host 192.168.1.20 --timeout 1000 port
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::api::ControlError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Spotify not running / port not found
    PlayerNotFound = 4,
    /// Spotify answered with an error envelope
    ApiError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&ControlError> for ExitCode {
    fn from(err: &ControlError) -> ExitCode {
        match err {
            ControlError::Network(_) => ExitCode::NetworkError,
            ControlError::PortNotFound { .. } => ExitCode::PlayerNotFound,
            ControlError::Api(_) => ExitCode::ApiError,
            ControlError::UnsupportedUri(_) => ExitCode::InvalidArgs,
            ControlError::Parse(_) | ControlError::Protocol(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// spotctl - control the Spotify desktop client
#[derive(Parser, Debug)]
#[command(
    name = "spotctl",
    version,
    about = "Control the Spotify desktop client through its local HTTP API",
    after_help = "EXAMPLES:\n\
                  spotctl status                      Show what is playing\n\
                  spotctl pause                       Pause playback\n\
                  spotctl play spotify:track:<id>     Play a track\n\
                  spotctl status --json               Machine-readable status"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log requests to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Host running the Spotify desktop client
    #[arg(long, short = 'H', global = true, env = "SPOTCTL_HOST")]
    pub host: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get current playback status
    #[command(visible_alias = "st")]
    Status(StatusCmd),

    /// Pause playback
    Pause(PauseCmd),

    /// Resume playback
    #[command(visible_alias = "resume")]
    Unpause(UnpauseCmd),

    /// Play a track URI or open.spotify.com track link
    Play(PlayCmd),

    /// Print the local port Spotify listens on
    Port(PortCmd),
}

/// Get current playback status
#[derive(Args, Debug)]
pub struct StatusCmd {}

/// Pause playback
#[derive(Args, Debug)]
pub struct PauseCmd {}

/// Resume playback
#[derive(Args, Debug)]
pub struct UnpauseCmd {}

/// Play a URI
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// spotify: URI or https://open.spotify.com/track/<id> link
    #[arg(required = true)]
    pub uri: String,

    /// Album or playlist to keep playing from afterwards
    #[arg(long, short = 'c')]
    pub context: Option<String>,
}

/// Find the local port
#[derive(Args, Debug)]
pub struct PortCmd {}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_code: Option<i32>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            api_code: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            api_code: None,
            exit_code: code.into(),
        }
    }
}

/// Port discovery response
#[derive(Debug, Serialize, Deserialize)]
pub struct PortResponse {
    pub host: String,
    pub port: u16,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data; `human` is used outside JSON mode
    pub fn print<T: Serialize>(&self, data: T, human: impl std::fmt::Display) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", human);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print a control error with the matching exit code
    pub fn control_error(&self, context: &str, err: &ControlError) -> ExitCode {
        let code = ExitCode::from(err);
        let msg = format!("{}: {}", context, err);
        if self.json {
            let mut output = JsonOutput::<()>::error_msg(&msg, code);
            output.api_code = err.api().map(|e| e.code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
            code
        } else {
            self.error(msg, code)
        }
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
