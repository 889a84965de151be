//! Text extraction from uploaded résumé files.
//!
//! Dispatches on the declared MIME type: PDF goes to `pdf-extract`, Word documents
//! to `docx-rust` (with a best-effort reader for legacy binary `.doc`). Any other type
//! is rejected before a parser is touched.

use thiserror::Error;

pub mod docx;
pub mod pdf;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{0}'")]
    UnsupportedType(String),

    #[error("{0}")]
    Failed(String),
}

/// The document formats we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// Office Open XML (`.docx`).
    WordOoxml,
    /// Word 97-2003 binary (`.doc`).
    WordLegacy,
}

impl DocumentKind {
    /// Maps a declared content type to a document kind. Parameters such as
    /// `; charset=binary` are ignored and matching is case-insensitive.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PDF => Some(DocumentKind::Pdf),
            MIME_DOCX => Some(DocumentKind::WordOoxml),
            MIME_DOC => Some(DocumentKind::WordLegacy),
            _ => None,
        }
    }
}

/// Extracts plain text from `bytes` according to the declared `mime` type.
///
/// CPU-bound and synchronous; async callers should run it on the blocking pool.
pub fn extract(bytes: &[u8], mime: &str) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_mime(mime)
        .ok_or_else(|| ExtractionError::UnsupportedType(mime.to_string()))?;

    match kind {
        DocumentKind::Pdf => pdf::extract_pdf(bytes),
        DocumentKind::WordOoxml => docx::extract_ooxml(bytes),
        DocumentKind::WordLegacy => docx::extract_legacy(bytes),
    }
}
