//! # Package Text Extraction
//!
//! This crate extracts printed text features (flavors, brand, nicotine content,
//! size, warning label, colors) from a single product package image by sending
//! it to a multimodal model together with a fixed extraction prompt, then
//! decoding the model's JSON answer.
//!
//! One call to [`FlavorExtractor::run_extraction`] issues exactly one request.
//! There are no retries and nothing is cached; the caller keeps the latest
//! result in a [`SessionState`].

pub mod config;
pub mod errors;
pub mod image;
pub mod prompts;
pub mod providers;
pub mod response;
pub mod types;

pub use config::ExtractorConfig;
pub use errors::ExtractError;
pub use response::ParsedOutput;
pub use types::{ApiKeyStatus, ExtractionRequest, ExtractionResult, ImageData, SessionState};

use providers::ai::{openai::OpenAiProvider, VisionProvider};
use tracing::{debug, info};

/// Runs extractions against a configured provider.
#[derive(Debug, Clone)]
pub struct FlavorExtractor {
    provider: Box<dyn VisionProvider>,
}

/// A builder for creating `FlavorExtractor` instances.
#[derive(Debug, Default)]
pub struct FlavorExtractorBuilder {
    config: ExtractorConfig,
    api_key: String,
    provider: Option<Box<dyn VisionProvider>>,
}

impl FlavorExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets endpoint, model and timeouts.
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the OpenAI API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Uses a custom provider instead of the OpenAI one.
    pub fn provider(mut self, provider: Box<dyn VisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Builds the `FlavorExtractor`.
    ///
    /// Fails with `MissingApiKey` when no custom provider is set and the key is
    /// blank, so a run without a credential never reaches the network.
    pub fn build(self) -> Result<FlavorExtractor, ExtractError> {
        let provider = match self.provider {
            Some(provider) => provider,
            None => {
                let api_key = self.api_key.trim().to_string();
                if api_key.is_empty() {
                    return Err(ExtractError::MissingApiKey);
                }
                Box::new(OpenAiProvider::new(self.config, api_key)?)
            }
        };
        Ok(FlavorExtractor { provider })
    }
}

impl FlavorExtractor {
    pub fn builder() -> FlavorExtractorBuilder {
        FlavorExtractorBuilder::new()
    }

    /// Validates the credential and records the outcome in `session`.
    pub async fn check_api_key(&self, session: &mut SessionState) -> ApiKeyStatus {
        let status = self.provider.validate_api_key().await;
        session.set_api_key_status(status.clone());
        status
    }

    /// Runs one extraction for `image` and records it in `session`.
    ///
    /// A missing image fails before any request is made. API and transport
    /// failures are returned as errors and leave `session` untouched; once a
    /// response arrives, decoding never fails.
    pub async fn run_extraction(
        &self,
        session: &mut SessionState,
        image: Option<&ImageData>,
    ) -> Result<ParsedOutput, ExtractError> {
        let image = image.ok_or(ExtractError::MissingImage)?;
        let request = ExtractionRequest {
            system_prompt: prompts::build_system_prompt(),
            user_prompt: prompts::build_user_prompt(),
            image: image.clone(),
        };

        info!("[run_extraction] Calling provider");
        let response = self.provider.extract(&request).await?;
        let output_text = response::extract_output_text(&response);
        debug!("<-- Output text: {output_text}");

        let parsed = response::parse_output_text(&output_text);
        session.record_run(response, output_text);
        Ok(parsed)
    }
}

/// Decodes the last recorded run again, for redisplay.
pub fn last_output(session: &SessionState) -> Option<ParsedOutput> {
    session.last_output_text().map(response::parse_output_text)
}
