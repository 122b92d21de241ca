use crate::{
    config::{ExtractorConfig, Timeouts},
    errors::ExtractError,
    providers::ai::VisionProvider,
    types::{ApiKeyStatus, ExtractionRequest},
};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// Maximum number of characters of a raw error body kept in a diagnostic.
const MAX_ERROR_BODY_CHARS: usize = 1000;

const ACCESS_HINT: &str =
    " This may be a model access issue; check your API tier and organization verification.";

// --- Responses API request structures ---

#[derive(Serialize, Debug)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    text: TextOptions,
}

#[derive(Serialize, Debug)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputContent<'a> {
    InputText { text: &'a str },
    InputImage { image_url: &'a str },
}

#[derive(Serialize, Debug)]
struct TextOptions {
    format: TextFormat,
}

#[derive(Serialize, Debug)]
struct TextFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

// --- Error body structures ---

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<Value>,
}

// --- OpenAI Provider implementation ---

/// A provider for the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    config: ExtractorConfig,
    api_key: String,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    pub fn new(config: ExtractorConfig, api_key: String) -> Result<Self, ExtractError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ExtractError::ReqwestClientBuild)?;
        Ok(Self::with_client(client, config, api_key))
    }

    /// Creates a provider that shares an existing HTTP client.
    pub fn with_client(client: ReqwestClient, config: ExtractorConfig, api_key: String) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    fn timeouts(&self) -> Timeouts {
        self.config.timeouts
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    async fn validate_api_key(&self) -> ApiKeyStatus {
        if self.api_key.is_empty() {
            return ApiKeyStatus::invalid("Missing API key");
        }

        let response = self
            .client
            .get(self.config.models_url())
            .bearer_auth(&self.api_key)
            .timeout(self.timeouts().key_check)
            .send()
            .await;

        let status = match response {
            Ok(response) => key_status_for(response.status()),
            Err(e) => ApiKeyStatus::invalid(e.to_string()),
        };
        info!(ok = status.ok, "API key check: {}", status.message);
        status
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<Value, ExtractError> {
        if self.api_key.is_empty() {
            return Err(ExtractError::MissingApiKey);
        }

        let body = ResponsesRequest {
            model: &self.config.model,
            input: vec![
                InputMessage {
                    role: "system",
                    content: vec![InputContent::InputText {
                        text: &request.system_prompt,
                    }],
                },
                InputMessage {
                    role: "user",
                    content: vec![
                        InputContent::InputText {
                            text: &request.user_prompt,
                        },
                        InputContent::InputImage {
                            image_url: request.image.as_data_url(),
                        },
                    ],
                },
            ],
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object",
                },
            },
        };

        info!(
            model = %self.config.model,
            image_mime = %request.image.mime(),
            image_bytes = request.image.byte_len(),
            "--> Sending extraction request"
        );

        let response = self
            .client
            .post(self.config.responses_url())
            .bearer_auth(&self.api_key)
            .timeout(self.timeouts().extraction)
            .json(&body)
            .send()
            .await
            .map_err(ExtractError::ApiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = describe_api_failure(status, &raw);
            warn!("Extraction request failed: HTTP {} {message}", status.as_u16());
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(ExtractError::Deserialization)?;
        debug!("<-- Extraction response received");
        Ok(json)
    }
}

/// Maps the status of a models-listing call to a key status.
fn key_status_for(status: StatusCode) -> ApiKeyStatus {
    if status.is_success() {
        ApiKeyStatus::valid("API key looks valid")
    } else if status == StatusCode::UNAUTHORIZED {
        ApiKeyStatus::invalid("Invalid API key")
    } else {
        ApiKeyStatus::invalid(format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ))
    }
}

/// Builds the part of an API failure message that follows `HTTP <code>`.
///
/// The result reads `<reason>: <detail><hint>`, where the detail comes from a
/// structured `{"error": {...}}` body if present and the raw body otherwise.
fn describe_api_failure(status: StatusCode, raw_body: &str) -> String {
    let detail = match serde_json::from_str::<ApiErrorEnvelope>(raw_body) {
        Ok(ApiErrorEnvelope { error }) => {
            let code = match error.code {
                Some(Value::String(s)) => s,
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            format!(
                "{} (type={}, code={})",
                error.message.unwrap_or_default(),
                error.kind.unwrap_or_default(),
                code
            )
            .trim()
            .to_string()
        }
        Err(_) => raw_body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    };

    let hint = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => ACCESS_HINT,
        _ => "",
    };

    format!(
        "{}: {detail}{hint}",
        status.canonical_reason().unwrap_or_default()
    )
}
