//! PDF text extraction via `pdf-extract`.

use std::panic;

use tracing::debug;

use super::ExtractionError;

/// Extracts the text layer of a PDF held in memory.
///
/// Image-only PDFs come back as an empty string; that is not an error here.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::Failed("PDF parser panicked on malformed input".into()))?;

    let text = result.map_err(|e| ExtractionError::Failed(format!("failed to read PDF: {e}")))?;
    debug!("Extracted {} chars from PDF ({} bytes)", text.len(), bytes.len());
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a one-page PDF showing `line` in Helvetica, with a correct xref table.
    pub(crate) fn single_page_pdf(line: &str) -> Vec<u8> {
        let stream = format!("BT /F1 18 Tf 72 720 Td ({line}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }

        let xref_at = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            out.push_str(&format!("{offset:010} 00000 n \n"));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        out.into_bytes()
    }

    #[test]
    fn test_extracts_text_from_well_formed_pdf() {
        let pdf = single_page_pdf("Jane Doe Backend Engineer");
        let text = extract_pdf(&pdf).unwrap();
        assert!(!text.trim().is_empty());
        assert!(text.contains("Jane"), "unexpected text: {text:?}");
    }

    #[test]
    fn test_truncated_pdf_fails() {
        let pdf = single_page_pdf("Jane Doe");
        let err = extract_pdf(&pdf[..20]).unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }
}
