//! Token acquisition
//!
//! Two tokens are needed before the player accepts commands: an anonymous
//! OAuth token from the Spotify web player and a CSRF token from the local
//! client itself.

use super::discovery::local_url;
use super::error::{check_envelope, required_str, ControlError};
use super::http::get_object;

/// Local path handing out the CSRF token
pub const CSRF_TOKEN_PATH: &str = "/simplecsrf/token.json";

/// Fetch the OAuth token (`{"t": "..."}`) from the web endpoint
pub async fn oauth_token(client: &reqwest::Client, token_url: &str) -> Result<String, ControlError> {
    let map = get_object(client, token_url, &[]).await?;
    required_str(&map, "t", "OAuth token")
}

/// Fetch the CSRF token (`{"token": "..."}`) from the local client
pub async fn csrf_token(
    client: &reqwest::Client,
    host: &str,
    port: u16,
) -> Result<String, ControlError> {
    let url = format!("{}{}", local_url(host, port), CSRF_TOKEN_PATH);
    let map = get_object(client, &url, &[]).await?;
    check_envelope(&map)?;
    required_str(&map, "token", "CSRF token")
}
