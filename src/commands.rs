//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the resolved session config and Output,
//! and returns an ExitCode. Every handler connects a fresh session.

use crate::api::discovery::find_port;
use crate::api::http::build_client;
use crate::api::SpotifyControl;
use crate::cli::{ExitCode, Output, PauseCmd, PlayCmd, PortCmd, PortResponse, StatusCmd, UnpauseCmd};
use crate::config::ControlConfig;
use crate::models::PlaybackStatus;
use crate::ControlError;

/// Connect a session, reporting failure through Output
async fn connect(config: ControlConfig, output: &Output) -> Result<SpotifyControl, ExitCode> {
    output.info(format!("Connecting to Spotify on {}...", config.host));
    SpotifyControl::connect(config)
        .await
        .map_err(|e| output.control_error("Could not connect to Spotify", &e))
}

/// Print a status returned by a command
fn report(result: Result<PlaybackStatus, ControlError>, context: &str, output: &Output) -> ExitCode {
    match result {
        Ok(status) => {
            let human = status.to_string();
            if let Err(e) = output.print(&status, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.control_error(context, &e),
    }
}

// =============================================================================
// Playback Commands
// =============================================================================

pub async fn status_cmd(_cmd: StatusCmd, config: ControlConfig, output: &Output) -> ExitCode {
    let spotify = match connect(config, output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    report(spotify.status().await, "Status failed", output)
}

pub async fn pause_cmd(_cmd: PauseCmd, config: ControlConfig, output: &Output) -> ExitCode {
    let spotify = match connect(config, output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    report(spotify.pause().await, "Pause failed", output)
}

pub async fn unpause_cmd(_cmd: UnpauseCmd, config: ControlConfig, output: &Output) -> ExitCode {
    let spotify = match connect(config, output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    report(spotify.unpause().await, "Unpause failed", output)
}

pub async fn play_cmd(cmd: PlayCmd, config: ControlConfig, output: &Output) -> ExitCode {
    // Reject bad input before spending a port scan on it
    if let Err(e) = crate::normalize_uri(&cmd.uri) {
        return output.control_error("Cannot play", &e);
    }

    let spotify = match connect(config, output).await {
        Ok(s) => s,
        Err(code) => return code,
    };

    output.info(format!("Playing {}", cmd.uri));
    let result = match cmd.context.as_deref() {
        Some(context) => spotify.play_in_context(&cmd.uri, context).await,
        None => spotify.play(&cmd.uri).await,
    };
    report(result, "Play failed", output)
}

// =============================================================================
// Port Command
// =============================================================================

pub async fn port_cmd(_cmd: PortCmd, config: ControlConfig, output: &Output) -> ExitCode {
    let client = match build_client(&config) {
        Ok(c) => c,
        Err(e) => return output.control_error("Could not build HTTP client", &e),
    };

    match find_port(&client, &config.host, config.ports.clone()).await {
        Ok(port) => {
            let response = PortResponse {
                host: config.host,
                port,
            };
            let human = response.port;
            if let Err(e) = output.print(&response, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.control_error("Port discovery failed", &e),
    }
}
