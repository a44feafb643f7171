//! Shared HTTP plumbing
//!
//! One `reqwest::Client` carries the short timeout and the browser-like
//! headers the Spotify endpoints insist on. Every call goes through
//! [`get_object`], which reads the whole body and requires a JSON object.

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde_json::{Map, Value};

use super::error::{error_from_json, parse_object, ControlError};
use crate::config::ControlConfig;

/// Origin and Referer expected by both the web and the local endpoints
pub const SPOTIFY_ORIGIN: &str = "https://open.spotify.com";

/// Build the client used for probes, token fetches and commands
pub fn build_client(config: &ControlConfig) -> Result<reqwest::Client, ControlError> {
    let mut headers = HeaderMap::new();
    headers.insert(ORIGIN, HeaderValue::from_static(SPOTIFY_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(SPOTIFY_ORIGIN));

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// GET `url` with `query` and parse the body as a JSON object
///
/// A non-2xx answer is only passed through when its body carries an error
/// envelope, which callers check themselves. Anything else is an error so a
/// bare `{}` never decodes into a default status.
pub async fn get_object(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Map<String, Value>, ControlError> {
    tracing::debug!(url, "GET");

    let response = client.get(url).query(query).send().await?;
    let status = response.status();
    let body = response.text().await?;

    let map = parse_object(&body).map_err(|e| {
        if status.is_success() {
            e
        } else {
            ControlError::Parse(format!("HTTP {} with unreadable body: {}", status, e))
        }
    })?;

    if !status.is_success() && error_from_json(&map).is_none() {
        return Err(ControlError::Protocol(format!(
            "HTTP {} without error details",
            status
        )));
    }
    Ok(map)
}
