//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::controller::Controller;
use crate::core::input::InputBuffer;
use crate::core::responder::DEFAULT_RESPONSE_PREFIX;

/// Config with the stock 500ms delay, built without reading env or disk.
pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        response_delay: Duration::from_millis(500),
        response_prefix: DEFAULT_RESPONSE_PREFIX.to_string(),
        greeting: None,
        duplicate_window: None,
    }
}

/// Creates a controller over an in-memory input buffer with the echo responder.
pub fn test_controller() -> Controller<InputBuffer> {
    Controller::from_config(InputBuffer::new(), &test_config())
}
