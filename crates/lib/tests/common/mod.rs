#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests: tracing initialization and a
//! config pointing at a `wiremock` server.

use flavor_extractor::ExtractorConfig;
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// An `ExtractorConfig` whose API base is the given mock server.
pub fn config_for(server: &MockServer) -> ExtractorConfig {
    ExtractorConfig {
        api_base: format!("{}/v1", server.uri()),
        model: "gpt-test".to_string(),
        ..Default::default()
    }
}
