pub mod openai;

use crate::{
    errors::ExtractError,
    types::{ApiKeyStatus, ExtractionRequest},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

/// A trait for interacting with a multimodal AI provider.
///
/// Implementations hold their own credential. Both operations issue exactly one
/// request and never retry.
#[async_trait]
pub trait VisionProvider: Send + Sync + Debug + DynClone {
    /// Checks whether the configured credential is accepted.
    ///
    /// This is advisory: it never fails, and a negative status does not stop
    /// `extract` from being attempted.
    async fn validate_api_key(&self) -> ApiKeyStatus;

    /// Sends the prompts and image and returns the raw response body.
    async fn extract(&self, request: &ExtractionRequest) -> Result<Value, ExtractError>;
}

dyn_clone::clone_trait_object!(VisionProvider);
