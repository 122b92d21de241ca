use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// --- Image Reference ---

/// A self-contained `data:<mime>;base64,<payload>` image reference.
///
/// Only the image loader constructs these, so a value always carries a
/// non-empty payload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    mime: String,
    byte_len: usize,
    data_url: String,
}

impl ImageData {
    pub(crate) fn new(mime: String, byte_len: usize, data_url: String) -> Self {
        Self {
            mime,
            byte_len,
            data_url,
        }
    }

    /// The declared media type of the embedded image.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The size of the raw image before encoding.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// The full data URL, usable wherever an image URL is expected.
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime", &self.mime)
            .field("byte_len", &self.byte_len)
            .finish_non_exhaustive()
    }
}

// --- Request & Result ---

/// Everything sent to the model for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub image: ImageData,
}

/// A typed view of a decoded extraction result.
///
/// Fields the model left out deserialize to their empty defaults. Enum-like
/// fields (`multiple_descriptors`, `warning_label_present`) stay strings: the
/// model is asked for specific values but nothing here checks them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResult {
    pub flavors_list: Vec<String>,
    /// `"1"`, `"0"` or `"n/a"`.
    pub multiple_descriptors: String,
    pub extraction_evidence: String,
    pub brand_name: String,
    pub nicotine_content: String,
    pub size_or_volume: String,
    /// `"Yes"` or `"No"`.
    pub warning_label_present: String,
    pub warning_label_location: String,
    pub main_color: Vec<String>,
}

impl ExtractionResult {
    /// Reads the typed view out of a decoded JSON value.
    pub fn try_from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

// --- Session ---

/// The outcome of an API key check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyStatus {
    pub ok: bool,
    pub message: String,
}

impl ApiKeyStatus {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Holds the results of the most recent interactions.
///
/// Owned by the caller and passed by reference. Each run replaces the previous
/// response wholesale.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_response: Option<Value>,
    last_output_text: Option<String>,
    api_key_status: Option<ApiKeyStatus>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the raw response of a run and the text extracted from it.
    pub fn record_run(&mut self, response: Value, output_text: String) {
        self.last_response = Some(response);
        self.last_output_text = Some(output_text);
    }

    pub fn set_api_key_status(&mut self, status: ApiKeyStatus) {
        self.api_key_status = Some(status);
    }

    pub fn last_response(&self) -> Option<&Value> {
        self.last_response.as_ref()
    }

    pub fn last_output_text(&self) -> Option<&str> {
        self.last_output_text.as_deref()
    }

    pub fn api_key_status(&self) -> Option<&ApiKeyStatus> {
        self.api_key_status.as_ref()
    }

    /// `true` once at least one run has completed.
    pub fn has_result(&self) -> bool {
        self.last_output_text.is_some()
    }
}
