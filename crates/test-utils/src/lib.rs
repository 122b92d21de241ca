use async_trait::async_trait;
use flavor_extractor::errors::ExtractError;
use flavor_extractor::providers::ai::VisionProvider;
use flavor_extractor::types::{ApiKeyStatus, ExtractionRequest};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// --- Fixtures ---

/// Wraps `text` in a minimal Responses API envelope with one message item.
pub fn response_envelope(text: &str) -> Value {
    json!({
        "id": "resp_test",
        "object": "response",
        "status": "completed",
        "output": [
            {
                "type": "reasoning",
                "id": "rs_test",
                "summary": []
            },
            {
                "type": "message",
                "id": "msg_test",
                "role": "assistant",
                "content": [
                    {"type": "output_text", "text": text, "annotations": []}
                ]
            }
        ]
    })
}

/// A complete extraction answer carrying all nine required keys.
pub fn complete_result() -> Value {
    json!({
        "flavors_list": ["Strazzberry"],
        "multiple_descriptors": "0",
        "extraction_evidence": "Flavor printed under the logo; fruit art ignored.",
        "brand_name": "STAR BUZZ",
        "nicotine_content": "5%",
        "size_or_volume": "6000 puffs",
        "warning_label_present": "Yes",
        "warning_label_location": "Bottom of the front panel",
        "main_color": ["pink", "white"]
    })
}

/// A few bytes that pass for a PNG upload.
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

// --- Mock Vision Provider ---

#[derive(Clone, Debug)]
pub struct MockVisionProvider {
    response: Arc<Mutex<Option<Value>>>,
    key_status: ApiKeyStatus,
    calls: Arc<Mutex<Vec<ExtractionRequest>>>,
}

impl MockVisionProvider {
    /// A provider whose key is valid and that answers with `response`.
    pub fn new(response: Value) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(response))),
            key_status: ApiKeyStatus::valid("API key looks valid"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers every extraction with an API error.
    pub fn failing() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            key_status: ApiKeyStatus::invalid("Invalid API key"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Retrieves the recorded requests for assertion.
    pub fn get_calls(&self) -> Vec<ExtractionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn validate_api_key(&self) -> ApiKeyStatus {
        self.key_status.clone()
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<Value, ExtractError> {
        self.calls.lock().unwrap().push(request.clone());
        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ExtractError::Api {
                status: 401,
                message: "Unauthorized: MockVisionProvider has no response programmed"
                    .to_string(),
            })
    }
}
