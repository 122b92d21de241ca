//! # Extractor Configuration
//!
//! Endpoint, model and per-operation timeouts for the extractor. The CLI fills
//! this in from command-line arguments and environment variables; library users
//! can start from `ExtractorConfig::default()`.

use std::time::Duration;

/// The default base URL of the OpenAI REST API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// The default vision-capable model used for extraction.
pub const DEFAULT_MODEL: &str = "gpt-5.2";
/// The file name offered for the downloadable result.
pub const DOWNLOAD_FILE_NAME: &str = "extraction.json";
/// The media type of the downloadable result.
pub const DOWNLOAD_MIME: &str = "application/json";

/// Fixed timeouts for each outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Credential validation against the models endpoint.
    pub key_check: Duration,
    /// Fetching an image from a user-supplied URL.
    pub image_fetch: Duration,
    /// The extraction call itself.
    pub extraction: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            key_check: Duration::from_secs(15),
            image_fetch: Duration::from_secs(30),
            extraction: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub api_base: String,
    pub model: String,
    pub timeouts: Timeouts,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ExtractorConfig {
    /// Returns the base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.api_base())
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.api_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.key_check, Duration::from_secs(15));
        assert_eq!(timeouts.image_fetch, Duration::from_secs(30));
        assert_eq!(timeouts.extraction, Duration::from_secs(90));
    }

    #[test]
    fn test_endpoint_urls_ignore_trailing_slash() {
        let config = ExtractorConfig {
            api_base: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.responses_url(), "http://localhost:8080/v1/responses");
        assert_eq!(config.models_url(), "http://localhost:8080/v1/models");
    }
}
