//! Integration tests for spotctl
//!
//! Tests are organized by component:
//! - discovery_test: concurrent port scan against mock clients
//! - control_test: token handshake and playback commands
//! - cli_test: argument parsing and command handler exit codes

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
