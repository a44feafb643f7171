//! Data structures decoded from the Spotify local API
//!
//! The player reports its state as one JSON document from every `/remote/*`
//! endpoint. Fields are missing-tolerant: an idle or freshly started client
//! leaves out most of the track block, so everything defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Playback Models
// =============================================================================

/// A named resource (track, artist or album) with its native URI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaResource {
    pub name: String,
    pub uri: String,
}

/// Track currently loaded in the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackInfo {
    /// Track length in seconds
    pub length: u32,
    /// "normal", "ad", "local", ...
    pub track_type: String,
    pub track_resource: MediaResource,
    pub artist_resource: MediaResource,
    pub album_resource: MediaResource,
}

impl TrackInfo {
    /// Track length as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.length))
    }

    /// True when the player reported no track at all
    pub fn is_empty(&self) -> bool {
        self.track_resource.uri.is_empty() && self.track_resource.name.is_empty()
    }
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(no track)");
        }
        write!(f, "{}", self.track_resource.name)?;
        if !self.artist_resource.name.is_empty() {
            write!(f, " - {}", self.artist_resource.name)?;
        }
        if !self.album_resource.name.is_empty() {
            write!(f, " [{}]", self.album_resource.name)?;
        }
        Ok(())
    }
}

/// Snapshot of the player state returned by every remote command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackStatus {
    /// Local API protocol version
    pub version: u32,
    pub client_version: String,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub play_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub track: TrackInfo,
    /// Position in seconds
    pub playing_position: f64,
    /// Volume (0.0 - 1.0)
    pub volume: f64,
    pub online: bool,
    pub running: bool,
    pub server_time: u64,
}

impl PlaybackStatus {
    /// Playback position as a Duration
    pub fn position(&self) -> Duration {
        Duration::from_secs_f64(self.playing_position.max(0.0))
    }

    /// Get progress as percentage (0.0-1.0)
    pub fn progress(&self) -> f64 {
        if self.track.length == 0 {
            0.0
        } else {
            (self.playing_position / f64::from(self.track.length)).clamp(0.0, 1.0)
        }
    }

    /// Format position as MM:SS (or HH:MM:SS)
    pub fn format_position(&self) -> String {
        format_duration(self.position())
    }

    /// Format track length as MM:SS (or HH:MM:SS)
    pub fn format_length(&self) -> String {
        format_duration(self.track.duration())
    }

    /// Format volume as percentage
    pub fn format_volume(&self) -> String {
        format!("{}%", (self.volume.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.playing { "PLAYING" } else { "PAUSED" };
        write!(
            f,
            "{} {} {} / {} ({})",
            state,
            self.track,
            self.format_position(),
            self.format_length(),
            self.format_volume()
        )
    }
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
