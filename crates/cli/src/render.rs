//! # Output Rendering
//!
//! Writes extraction outcomes for the terminal. Results go to `out`; warnings
//! go to `err` so the JSON on stdout stays machine-readable.

use flavor_extractor::{
    response::to_download_json, ApiKeyStatus, ExtractionResult, ParsedOutput, SessionState,
};
use serde_json::Value;
use std::io::{self, Write};
use tracing::{info, warn};

pub fn render_key_status<W: Write>(err: &mut W, status: &ApiKeyStatus) -> io::Result<()> {
    if status.ok {
        writeln!(err, "✅ {}", status.message)
    } else {
        writeln!(err, "❌ {}", status.message)
    }
}

/// Renders a decoded run.
///
/// An empty output shows the raw response recorded in `session`.
pub fn render_output<O: Write, E: Write>(
    out: &mut O,
    err: &mut E,
    parsed: &ParsedOutput,
    session: &SessionState,
) -> io::Result<()> {
    match parsed {
        ParsedOutput::Empty => {
            writeln!(
                err,
                "⚠️  No output_text found in response. Showing raw response."
            )?;
            let raw = session.last_response().cloned().unwrap_or(Value::Null);
            writeln!(out, "{}", pretty(&raw))?;
        }
        ParsedOutput::Json {
            value,
            missing_fields,
            unknown_colors,
        } => {
            log_summary(value);
            writeln!(out, "{}", pretty(value))?;
            if !missing_fields.is_empty() {
                writeln!(
                    err,
                    "⚠️  JSON missing required fields: {}",
                    missing_fields.join(", ")
                )?;
            }
            if !unknown_colors.is_empty() {
                writeln!(
                    err,
                    "⚠️  main_color contains values outside the allowed list: {}",
                    unknown_colors.join(", ")
                )?;
            }
        }
        ParsedOutput::Raw(text) => {
            writeln!(err, "⚠️  Output is not valid JSON. Showing raw text.")?;
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}

/// Logs the headline fields of a decoded result.
fn log_summary(value: &Value) {
    match ExtractionResult::try_from_value(value) {
        Ok(result) => info!(
            brand = %result.brand_name,
            flavors = result.flavors_list.len(),
            colors = result.main_color.len(),
            "Extraction decoded"
        ),
        Err(e) => warn!("Result does not fit the expected field types: {e}"),
    }
}

fn pretty(value: &Value) -> String {
    to_download_json(value).unwrap_or_else(|_| value.to_string())
}
