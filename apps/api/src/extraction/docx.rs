//! Word document text extraction.
//!
//! OOXML (`.docx`) is parsed with `docx-rust`, walking the body the same way for
//! paragraphs, tables and structured-document tags. Legacy `.doc` has no parser in
//! our stack, so it gets a best-effort scan for text runs inside the OLE container.

use std::io::Cursor;

use docx_rust::document::{
    BodyContent, Paragraph, ParagraphContent, Run, RunContent, Table, TableCellContent,
    TableRowContent,
};
use docx_rust::DocxFile;
use tracing::debug;

use super::ExtractionError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// Shorter runs in a binary container are almost always noise.
const MIN_RUN_CHARS: usize = 4;

/// Extracts paragraph text from an OOXML Word document, one paragraph per line.
pub fn extract_ooxml(bytes: &[u8]) -> Result<String, ExtractionError> {
    let file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Failed(format!("failed to open DOCX: {e}")))?;
    let docx = file
        .parse()
        .map_err(|e| ExtractionError::Failed(format!("failed to parse DOCX: {e}")))?;

    let mut out = String::new();
    for content in &docx.document.body.content {
        push_body_content(content, &mut out);
    }

    debug!("Extracted {} chars from DOCX ({} bytes)", out.len(), bytes.len());
    Ok(out.trim_end().to_string())
}

/// Extracts text from a Word 97-2003 document.
///
/// Files that are really OOXML under a `.doc` label are handed to [`extract_ooxml`].
pub fn extract_legacy(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.starts_with(ZIP_MAGIC) {
        return extract_ooxml(bytes);
    }
    if !bytes.starts_with(OLE_MAGIC) {
        return Err(ExtractionError::Failed(
            "file is not a Word document".to_string(),
        ));
    }

    let mut runs = utf16_runs(bytes);
    runs.extend(latin1_runs(bytes));
    if runs.is_empty() {
        return Err(ExtractionError::Failed(
            "no readable text found in Word document".to_string(),
        ));
    }

    debug!("Recovered {} text runs from legacy DOC", runs.len());
    Ok(runs.join("\n"))
}

fn push_body_content(content: &BodyContent, out: &mut String) {
    match content {
        BodyContent::Paragraph(para) => push_paragraph(para, out),
        BodyContent::Table(table) => push_table(table, out),
        BodyContent::Sdt(sdt) => {
            if let Some(ref sdt_content) = sdt.content {
                for item in &sdt_content.content {
                    push_body_content(item, out);
                }
            }
        }
        _ => {}
    }
}

fn push_paragraph(para: &Paragraph, out: &mut String) {
    for pc in &para.content {
        match pc {
            ParagraphContent::Run(run) => push_run(run, out),
            ParagraphContent::Link(link) => {
                if let Some(ref run) = link.content {
                    push_run(run, out);
                }
            }
            _ => {}
        }
    }
    out.push('\n');
}

fn push_run(run: &Run, out: &mut String) {
    for rc in &run.content {
        match rc {
            RunContent::Text(t) => out.push_str(&t.text),
            RunContent::Break(_) => out.push('\n'),
            RunContent::Tab(_) => out.push('\t'),
            _ => {}
        }
    }
}

/// Cells are tab-separated, rows newline-separated.
fn push_table(table: &Table, out: &mut String) {
    for row in &table.rows {
        let mut cells = Vec::new();
        for cell_content in &row.cells {
            if let TableRowContent::TableCell(cell) = cell_content {
                let mut cell_text = String::new();
                for tc in &cell.content {
                    let TableCellContent::Paragraph(para) = tc;
                    push_paragraph(para, &mut cell_text);
                }
                cells.push(cell_text.trim().replace('\n', " "));
            }
        }
        if !cells.is_empty() {
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
    }
}

/// Word stores unicode piece text as UTF-16LE. Only Latin ranges are accepted so
/// arbitrary binary pairs don't decode as CJK noise.
fn utf16_runs(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        match decode_text_char(u32::from(unit)) {
            Some(c) if unit < 0x0250 => current.push(c),
            _ => flush_run(&mut current, &mut runs),
        }
    }
    flush_run(&mut current, &mut runs);
    runs
}

/// Compressed (8-bit) piece text is cp1252; decode it as Latin-1.
fn latin1_runs(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for &b in bytes {
        let printable = matches!(b, 0x20..=0x7E | 0xC0..=0xFF | b'\r' | b'\n' | b'\t');
        match decode_text_char(u32::from(b)) {
            Some(c) if printable => current.push(c),
            _ => flush_run(&mut current, &mut runs),
        }
    }
    flush_run(&mut current, &mut runs);
    runs
}

/// Word marks paragraph ends with `\r`; those become newlines.
fn decode_text_char(code: u32) -> Option<char> {
    let c = char::from_u32(code)?;
    match c {
        '\r' | '\n' => Some('\n'),
        '\t' => Some('\t'),
        c if c.is_control() => None,
        c => Some(c),
    }
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().count() >= MIN_RUN_CHARS && trimmed.chars().any(char::is_alphabetic) {
        runs.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rust::Docx;

    pub(crate) fn docx_with_paragraphs(lines: &[&str]) -> Vec<u8> {
        let mut docx = Docx::default();
        for line in lines {
            docx.document.push(Paragraph::default().push_text(*line));
        }
        docx.write(Cursor::new(Vec::new())).unwrap().into_inner()
    }

    /// An OLE header followed by UTF-16LE text and some binary noise.
    pub(crate) fn legacy_doc_with_text(text: &str) -> Vec<u8> {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.resize(512, 0);
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes.extend_from_slice(&[0x00, 0x00, 0x01, 0x02, 0xFF, 0x00, 0x13, 0x88]);
        bytes
    }

    #[test]
    fn test_extracts_paragraphs_from_docx() {
        let bytes = docx_with_paragraphs(&["Jane Doe", "Backend engineer, 5 years"]);
        let text = extract_ooxml(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Backend engineer, 5 years"));
        assert!(text.lines().count() >= 2);
    }

    #[test]
    fn test_garbage_docx_fails() {
        let err = extract_ooxml(b"PK\x03\x04 not really a zip").unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }

    #[test]
    fn test_legacy_label_on_ooxml_bytes_reads_as_docx() {
        let bytes = docx_with_paragraphs(&["Mislabelled resume"]);
        let text = extract_legacy(&bytes).unwrap();
        assert!(text.contains("Mislabelled resume"));
    }

    #[test]
    fn test_legacy_doc_recovers_utf16_text() {
        let bytes = legacy_doc_with_text("Jane Doe\rSenior Engineer at Acme");
        let text = extract_legacy(&bytes).unwrap();
        assert!(text.contains("Jane Doe"), "unexpected text: {text:?}");
        assert!(text.contains("Senior Engineer at Acme"));
    }

    #[test]
    fn test_legacy_doc_recovers_8bit_text() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.resize(512, 0);
        bytes.extend_from_slice(b"Curriculum vitae: Jos\xE9 Garc\xEDa\r");
        let text = extract_legacy(&bytes).unwrap();
        assert!(text.contains("José García"), "unexpected text: {text:?}");
    }

    #[test]
    fn test_legacy_doc_without_ole_header_fails() {
        let err = extract_legacy(b"plain text pretending to be a doc").unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }

    #[test]
    fn test_legacy_doc_with_no_text_fails() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.resize(1024, 0);
        let err = extract_legacy(&bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }

    #[test]
    fn test_short_runs_are_dropped() {
        let mut runs = Vec::new();
        let mut current = "ab".to_string();
        flush_run(&mut current, &mut runs);
        let mut current = "1234".to_string();
        flush_run(&mut current, &mut runs);
        assert!(runs.is_empty());
        assert!(current.is_empty());
    }
}
