//! Play URI normalization
//!
//! The player only understands native `spotify:` URIs. Track links copied from
//! the web player (`https://open.spotify.com/track/<id>`) are rewritten to
//! `spotify:track:<id>`; other web links are rejected.

use url::Url;

use super::error::ControlError;

const NATIVE_SCHEME: &str = "spotify:";
const WEB_HOST: &str = "open.spotify.com";

/// Normalize a play target to its native URI form
pub fn normalize_uri(input: &str) -> Result<String, ControlError> {
    let input = input.trim();

    if input.starts_with(NATIVE_SCHEME) {
        if input.len() == NATIVE_SCHEME.len() {
            return Err(ControlError::UnsupportedUri(input.to_string()));
        }
        return Ok(input.to_string());
    }

    let url = Url::parse(input).map_err(|_| ControlError::UnsupportedUri(input.to_string()))?;
    if url.scheme() != "https" || url.host_str() != Some(WEB_HOST) {
        return Err(ControlError::UnsupportedUri(input.to_string()));
    }

    // Query (?si=...) and fragment are dropped by only looking at the path
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["track", id] if is_spotify_id(id) => Ok(format!("spotify:track:{}", id)),
        _ => Err(ControlError::UnsupportedUri(input.to_string())),
    }
}

fn is_spotify_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}
