//! Turns raw model output into a validated [`ResumeDocument`].
//!
//! All-or-nothing: fence markers are stripped, the rest must parse into the full
//! document shape and pass [`ResumeDocument::validate`]. No partial recovery.

use thiserror::Error;

use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model output is not valid resume JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Removes every ```` ```json ```` and ```` ``` ```` marker, wherever it appears, then trims.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn normalize(raw: &str) -> Result<ResumeDocument, NormalizeError> {
    let cleaned = strip_code_fences(raw);
    let document: ResumeDocument = serde_json::from_str(&cleaned)?;
    document.validate().map_err(NormalizeError::Invalid)?;
    Ok(document)
}
