// Document loading: PDF text extraction and plain text files

use crate::error::PipelineError;
use std::path::Path;

/// Kinds of input document we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Detect the document kind from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Read the full text of a document, pages concatenated in order
pub fn load_text(path: &Path) -> Result<String, PipelineError> {
    let extraction_err = |message: String| PipelineError::Extraction {
        path: path.to_path_buf(),
        message,
    };

    match DocumentKind::from_path(path) {
        Some(DocumentKind::Pdf) => {
            pdf_extract::extract_text(path).map_err(|e| extraction_err(e.to_string()))
        }
        Some(DocumentKind::PlainText) => {
            std::fs::read_to_string(path).map_err(|e| extraction_err(e.to_string()))
        }
        None => Err(extraction_err(
            "unsupported file type (expected .pdf or .txt)".to_string(),
        )),
    }
}
