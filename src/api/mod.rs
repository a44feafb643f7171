//! Spotify local API client
//!
//! - discovery: concurrent scan for the port the desktop client listens on
//! - auth: OAuth token (web) and CSRF token (local)
//! - control: the authenticated session issuing playback commands
//! - error: error types and JSON envelope handling
//! - uri: web link to native URI normalization

pub mod auth;
pub mod control;
pub mod discovery;
pub mod error;
pub mod http;
pub mod uri;

pub use control::SpotifyControl;
pub use error::{ApiError, ControlError};
pub use uri::normalize_uri;
