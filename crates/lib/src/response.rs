//! # Response Parsing
//!
//! Pulls the model's text out of a Responses API envelope and decodes it.
//! Nothing in here fails: malformed envelopes yield empty text and non-JSON
//! text is handed back verbatim.

use crate::prompts::{is_allowed_color, REQUIRED_FIELDS};
use serde_json::Value;
use tracing::warn;

/// The decoded form of a run's output text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    /// No `output_text` was found; show the raw response instead.
    Empty,
    /// The text decoded as JSON.
    Json {
        value: Value,
        /// Required keys absent from `value`. Advisory.
        missing_fields: Vec<&'static str>,
        /// `main_color` entries outside the allowed vocabulary. Advisory.
        unknown_colors: Vec<String>,
    },
    /// The text is not valid JSON; show it as-is.
    Raw(String),
}

/// Concatenates every `output_text` fragment of every `message` item.
///
/// Fragments are joined with newlines in response order; empty fragments and
/// entries of any other type are skipped.
pub fn extract_output_text(response: &Value) -> String {
    let Some(items) = response.get("output").and_then(Value::as_array) else {
        return String::new();
    };

    items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|content| content.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|content| content.get("text").and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lists the required keys not present in `value`.
///
/// Presence only: the values themselves are not inspected. A value that is not
/// a JSON object is missing every key.
pub fn missing_required_fields(value: &Value) -> Vec<&'static str> {
    match value.as_object() {
        Some(map) => REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !map.contains_key(*key))
            .collect(),
        None => REQUIRED_FIELDS.to_vec(),
    }
}

/// Lists `main_color` entries that are not in the allowed vocabulary.
///
/// The `"Not found"` sentinel the model is told to use is accepted. Entries that
/// are not strings are reported in their JSON form.
pub fn unknown_colors(value: &Value) -> Vec<String> {
    let Some(colors) = value.get("main_color").and_then(Value::as_array) else {
        return Vec::new();
    };
    colors
        .iter()
        .filter_map(|color| match color.as_str() {
            Some("Not found") => None,
            Some(name) if is_allowed_color(name) => None,
            Some(name) => Some(name.to_string()),
            None => Some(color.to_string()),
        })
        .collect()
}

/// Decodes the output text of a run.
pub fn parse_output_text(text: &str) -> ParsedOutput {
    if text.is_empty() {
        return ParsedOutput::Empty;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            let missing_fields = missing_required_fields(&value);
            let unknown_colors = unknown_colors(&value);
            if !missing_fields.is_empty() {
                warn!("JSON missing required fields: {}", missing_fields.join(", "));
            }
            ParsedOutput::Json {
                value,
                missing_fields,
                unknown_colors,
            }
        }
        Err(e) => {
            warn!("Output is not valid JSON: {e}");
            ParsedOutput::Raw(text.to_string())
        }
    }
}

/// Renders a decoded result as the downloadable JSON document.
///
/// Pretty-printed with two-space indentation; non-ASCII text is kept as-is.
pub fn to_download_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
