//! Spotify desktop client control session
//!
//! Connecting finds the local port, fetches the OAuth token and then the
//! CSRF token, failing on the first step that does not succeed. The resulting
//! session is immutable; to re-authenticate, connect again.
//!
//! ```no_run
//! # async fn demo() -> Result<(), spotctl::ControlError> {
//! let spotify = spotctl::SpotifyControl::new().await?;
//! let status = spotify.pause().await?;
//! assert!(!status.playing);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde_json::Value;

use super::auth::{csrf_token, oauth_token};
use super::discovery::{find_port, local_url, STATUS_PATH};
use super::error::{check_envelope, ControlError};
use super::http::{build_client, get_object};
use super::uri::normalize_uri;
use crate::config::ControlConfig;
use crate::models::PlaybackStatus;

/// Pause / resume endpoint
pub const PAUSE_PATH: &str = "/remote/pause.json";
/// Play endpoint
pub const PLAY_PATH: &str = "/remote/play.json";

/// Authenticated session against the local Spotify client
pub struct SpotifyControl {
    client: reqwest::Client,
    host: String,
    port: u16,
    oauth: String,
    csrf: String,
}

impl SpotifyControl {
    /// Connect with default settings (127.0.0.1, 500ms timeout)
    pub async fn new() -> Result<Self, ControlError> {
        Self::connect(ControlConfig::default()).await
    }

    /// Discover the port and authenticate
    pub async fn connect(config: ControlConfig) -> Result<Self, ControlError> {
        let client = build_client(&config)?;

        let port = find_port(&client, &config.host, config.ports.clone()).await?;
        let oauth = oauth_token(&client, &config.token_url).await?;
        let csrf = csrf_token(&client, &config.host, port).await?;

        tracing::info!(host = %config.host, port, "Spotify control session ready");

        Ok(Self {
            client,
            host: config.host,
            port,
            oauth,
            csrf,
        })
    }

    /// Host the session talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port the local API was found on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<PlaybackStatus, ControlError> {
        self.set_pause_state(true).await
    }

    /// Resume playback
    pub async fn unpause(&self) -> Result<PlaybackStatus, ControlError> {
        self.set_pause_state(false).await
    }

    /// Pause (`true`) or resume (`false`) playback
    pub async fn set_pause_state(&self, paused: bool) -> Result<PlaybackStatus, ControlError> {
        let pause = if paused { "true" } else { "false" };
        self.command(PAUSE_PATH, &[("pause", pause)]).await
    }

    /// Get current playback status
    pub async fn status(&self) -> Result<PlaybackStatus, ControlError> {
        self.command(STATUS_PATH, &[]).await
    }

    /// Play a `spotify:` URI or an open.spotify.com track link
    pub async fn play(&self, uri: &str) -> Result<PlaybackStatus, ControlError> {
        let uri = normalize_uri(uri)?;
        self.command(PLAY_PATH, &[("uri", uri.as_str())]).await
    }

    /// Play `uri` inside `context` (album, playlist) so playback continues
    /// through the rest of the context afterwards
    pub async fn play_in_context(
        &self,
        uri: &str,
        context: &str,
    ) -> Result<PlaybackStatus, ControlError> {
        let uri = normalize_uri(uri)?;
        let context = normalize_uri(context)?;
        self.command(
            PLAY_PATH,
            &[("uri", uri.as_str()), ("context", context.as_str())],
        )
        .await
    }

    /// Signed request against the local API, decoded as a status
    async fn command(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<PlaybackStatus, ControlError> {
        let mut query = vec![("csrf", self.csrf.as_str()), ("oauth", self.oauth.as_str())];
        query.extend_from_slice(params);

        let url = format!("{}{}", local_url(&self.host, self.port), path);
        let map = get_object(&self.client, &url, &query).await?;
        check_envelope(&map)?;

        serde_json::from_value(Value::Object(map))
            .map_err(|e| ControlError::Parse(format!("invalid status: {}", e)))
    }
}

impl fmt::Debug for SpotifyControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyControl")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("oauth", &"<redacted>")
            .field("csrf", &"<redacted>")
            .finish()
    }
}
