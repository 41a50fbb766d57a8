//! Document text extraction.
//!
//! Extractors turn a document handle into raw text. PDF/OCR conversion lives
//! behind the same trait in external adapters; the built-in extractor handles
//! plain-text documents. All extractors normalize page-break artifacts and
//! whitespace before returning, since downstream prompt budgets are bounded.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Normalized text shorter than this is treated as an unreadable document
/// rather than a valid (but tiny) contract.
pub const MIN_DOCUMENT_CHARS: usize = 100;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Cannot read document {path}: {detail}")]
    Unreadable { path: String, detail: String },

    #[error("Document yielded no text after normalization")]
    Empty,

    #[error("Document text too short to analyze ({chars} chars, need {MIN_DOCUMENT_CHARS})")]
    TooShort { chars: usize },
}

/// Converts a document handle into raw contract text.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, handle: &Path) -> Result<String, ExtractionError>;
}

/// Extractor for UTF-8 text documents on disk.
pub struct TextFileExtractor;

impl DocumentExtractor for TextFileExtractor {
    fn extract(&self, handle: &Path) -> Result<String, ExtractionError> {
        let raw = std::fs::read_to_string(handle).map_err(|e| ExtractionError::Unreadable {
            path: handle.display().to_string(),
            detail: e.to_string(),
        })?;

        let text = normalize_extracted_text(&raw);
        check_extracted_text(&text)?;

        tracing::info!(
            path = %handle.display(),
            chars = text.len(),
            "Extracted document text"
        );
        Ok(text)
    }
}

/// Reject empty or near-empty extraction output.
pub fn check_extracted_text(text: &str) -> Result<(), ExtractionError> {
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if text.len() < MIN_DOCUMENT_CHARS {
        return Err(ExtractionError::TooShort { chars: text.len() });
    }
    Ok(())
}

fn page_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Lines like "--- Page 3 ---" or "--- Page Break ---" inserted by
        // page-oriented extractors.
        Regex::new(r"(?mi)^\s*-{2,}\s*page(?:\s+break|\s+\d+)?\s*-{2,}\s*$").unwrap()
    })
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Strip page-break artifacts and collapse redundant whitespace.
pub fn normalize_extracted_text(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace(['\r', '\u{c}'], "\n");
    let text = page_marker_re().replace_all(&text, "");
    let text = horizontal_ws_re().replace_all(&text, " ");
    let text = blank_lines_re().replace_all(&text, "\n\n");

    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "SERVICE AGREEMENT\n\nThis Service Agreement is entered into between \
        Acme Services Pvt Ltd and Bharat Retail Ltd for the provision of software maintenance \
        services across all retail locations.";

    #[test]
    fn strips_page_markers() {
        let raw = "Clause 1. Payment Terms.\n--- Page 2 ---\nClause 2. Confidentiality.";
        let text = normalize_extracted_text(raw);
        assert!(!text.to_lowercase().contains("page"));
        assert!(text.contains("Payment Terms"));
        assert!(text.contains("Confidentiality"));
    }

    #[test]
    fn strips_page_break_markers_and_form_feeds() {
        let raw = "First part.\n\n--- Page Break ---\n\nSecond\u{c}part.";
        let text = normalize_extracted_text(raw);
        assert_eq!(text, "First part.\n\nSecond\npart.");
    }

    #[test]
    fn collapses_redundant_whitespace() {
        let raw = "Term   and\t\tTermination\n\n\n\n\nNext   section";
        let text = normalize_extracted_text(raw);
        assert_eq!(text, "Term and Termination\n\nNext section");
    }

    #[test]
    fn blank_document_is_empty_error() {
        let err = check_extracted_text("").unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[test]
    fn near_empty_document_is_too_short() {
        let err = check_extracted_text("Short scanned fragment.").unwrap_err();
        assert!(matches!(err, ExtractionError::TooShort { .. }));
    }

    #[test]
    fn extracts_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let text = TextFileExtractor.extract(file.path()).unwrap();
        assert!(text.starts_with("SERVICE AGREEMENT"));
        assert!(text.len() >= MIN_DOCUMENT_CHARS);
    }

    #[test]
    fn whitespace_only_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n\n \t \n").unwrap();

        let err = TextFileExtractor.extract(file.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = TextFileExtractor
            .extract(Path::new("/nonexistent/contract.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable { .. }));
    }
}
