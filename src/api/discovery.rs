//! Local port discovery
//!
//! The desktop client binds its HTTP API to one port in a small range and
//! does not advertise which. Every candidate is probed at once and all probes
//! are awaited, so a full scan costs about one request timeout.

use std::ops::RangeInclusive;

use futures::future::join_all;

use super::error::ControlError;

/// First port the desktop client may listen on
pub const START_PORT: u16 = 4370;
/// Last port the desktop client may listen on
pub const END_PORT: u16 = 4400;

/// Path probed on every candidate port
pub const STATUS_PATH: &str = "/remote/status.json";

/// Build `http://host:port` for the local API
pub(crate) fn local_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Find the port serving the status endpoint
///
/// Every port in `ports` is probed concurrently. When several respond the
/// lowest one wins.
pub async fn find_port(
    client: &reqwest::Client,
    host: &str,
    ports: RangeInclusive<u16>,
) -> Result<u16, ControlError> {
    let (start, end) = (*ports.start(), *ports.end());
    tracing::debug!(host, start, end, "Probing for Spotify local API");

    let probes = ports.map(|port| probe(client, host, port));
    let found = join_all(probes).await.into_iter().flatten().min();

    match found {
        Some(port) => {
            tracing::info!(host, port, "Found Spotify local API");
            Ok(port)
        }
        None => Err(ControlError::PortNotFound { start, end }),
    }
}

/// Probe a single port, reporting it back if it answered with 2xx
async fn probe(client: &reqwest::Client, host: &str, port: u16) -> Option<u16> {
    let url = format!("{}{}", local_url(host, port), STATUS_PATH);

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => Some(port),
        Ok(response) => {
            tracing::debug!(port, status = %response.status(), "Probe answered without success");
            None
        }
        Err(e) => {
            tracing::trace!(port, error = %e, "Probe failed");
            None
        }
    }
}
