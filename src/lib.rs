//! spotctl - control the Spotify desktop client from the command line
//!
//! The desktop client runs an undocumented HTTP API on a local port. This
//! crate finds that port, authenticates against it and issues playback
//! commands, decoding the player's JSON into typed status records.
//!
//! # Modules
//!
//! - `models` - Playback status records
//! - `api` - Port discovery, authentication and commands
//! - `config` - Session settings and the CLI config file
//! - `cli` / `commands` - Command line front end
//! - `logging` - tracing subscriber setup

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use api::{normalize_uri, ApiError, ControlError, SpotifyControl};
pub use config::{Config, ControlConfig};
pub use models::{MediaResource, PlaybackStatus, TrackInfo};
