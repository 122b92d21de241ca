//! # Extraction Prompts
//!
//! The system and user instructions for package text extraction. Neither takes
//! any input: every run sends the same two strings alongside the image.

use super::colors::allowed_colors_line;

/// The keys every extraction result is expected to carry.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "flavors_list",
    "multiple_descriptors",
    "brand_name",
    "extraction_evidence",
    "nicotine_content",
    "size_or_volume",
    "warning_label_present",
    "warning_label_location",
    "main_color",
];

/// The system prompt for package extraction.
///
/// Placeholders: `{allowed_colors}`
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"### Role
You are a high-precision Data Extraction Specialist for the vape/cannabis industry. Your task is to extract product text features from images with 100% literal accuracy.

### Critical Rules (Expert Constraints)
1. **Literal Extraction Only**: Extract text EXACTLY as it appears on the package.
   - NO spell correction (e.g., keep "Strazzberry", do not change to "Strawberry").
   - NO background inference (e.g., ignore fruit/cereal images if text isn't present).
   - Strict Verbatim: Do not translate, do not "fix", and do not assume. If the text says "STAR BUZZ", you MUST output "STAR BUZZ". Do not output "Strawberry" or "Starfruit" based on your guess.
2. **Clean Output**: Each flavor string must be "naked".
   - NO bullet points (-), NO stars (*), NO whitespace padding.
   - NO parentheses or metadata (e.g., do not include "(blue device)").
3. **Exclude Nicotine**: If nicotine content (e.g., "5%", "50mg") appears next to the flavor, DO NOT include it in the flavor field.
4. **Handling Absence**:
   - If no flavor text is visible, the list must be ["missing"].
   - For any other field not found in the image, return the literal string "Not found".
5. **Brand Identification**: Identify the brand associated with each flavor if multiple brands exist.
6. **Anti-Hallucination Rule**: If you see a word you don't recognize as a "standard" flavor (e.g., "Star Buzz"), you MUST extract it exactly as written. NEVER replace a literal word with a "common" flavor name.

### Output Schema (JSON)
Return ONLY a JSON object:
- "flavors_list": Array of strings. Pure flavor text only. For example, ["Flavor1", "Flavor2"]
- "multiple_descriptors": "1" (if >1), "0" (if 1), "n/a" (if none flavor descriptor extracted due to poor image quality or no flavor shown on the image).
- "extraction_evidence": Internal note on text location of flavors and ignored art.
- "brand_name": Brand name found.
- "nicotine_content": Nicotine text as shown (e.g., "5%", "50mg"). If missing, return "Not found".
- "size_or_volume": Size/volume text as shown of the product (e.g., "10ml", "2mL", "6000 puffs"). If missing, return "Not found".
- "warning_label_present": "Yes" if a warning label is visible, otherwise "No".
- "warning_label_location": If warning_label_present is "Yes", describe the label location on the package. If no warning label, return "Not found".
- "main_color": Array of all product colors you think. Use ONLY the allowed color names list below; ignore background/embellishments. If not found, return ["Not found"].

### Allowed Color Names (use ONLY these)
{allowed_colors}
"#;

/// The user prompt restating the task constraints for a single image.
pub const EXTRACTION_USER_PROMPT: &str = concat!(
    "You will be given ONE image of a vape/cannabis product package.\n",
    "Extract flavor text exactly as written on the package. Do NOT infer from images or guess missing text.\n",
    "If multiple flavor descriptors appear, include all of them as separate strings.\n",
    "If no flavor text is visible, return [\"missing\"].\n\n",
    "Also extract the brand name if visible. Do not include nicotine strength or percentages in flavor strings.\n",
    "Extract nicotine content and size/volume exactly as shown. If missing, return \"Not found\".\n",
    "Only treat size_or_volume as values with explicit units (ml/mL/mg/g/puffs). ",
    "Do NOT treat model/series names (e.g., AL6000) as size.\n",
    "Detect whether a warning label is present. If present, set warning_label_present to \"Yes\" and describe its location.\n",
    "If no warning label is visible, set warning_label_present to \"No\" and warning_label_location to \"Not found\".\n",
    "Extract all product colors (but ignore background/embellishments). ",
    "Return an array of color names using ONLY the allowed color list in the system prompt. ",
    "If unsure, return [\"Not found\"].\n",
    "If any extracted text is unclear, keep it verbatim (even if misspelled).\n\n",
    "Return JSON only, strictly matching the schema."
);

/// Builds the system prompt with the allowed color list filled in.
pub fn build_system_prompt() -> String {
    EXTRACTION_SYSTEM_PROMPT.replace("{allowed_colors}", &allowed_colors_line())
}

/// Builds the user prompt for one extraction run.
pub fn build_user_prompt() -> String {
    EXTRACTION_USER_PROMPT.to_string()
}
