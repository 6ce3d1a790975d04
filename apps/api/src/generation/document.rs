//! Document Text Extractor — converts an uploaded PDF into plain text.
//!
//! This stage never fails the pipeline: unreadable documents and documents
//! with no recoverable text degrade to a deterministic placeholder that keeps
//! the rest of the pipeline running.

use std::path::Path;

use tracing::warn;

/// Extracted document text plus a flag marking degraded extraction.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub text: String,
    pub degraded: bool,
}

/// Extracts plain text from PDF bytes.
///
/// On any extraction failure, or when the PDF yields no text at all, returns
/// a placeholder embedding the document's base name and an explicit marker so
/// downstream prompts still carry something recognizable. Extracted text is
/// trimmed before use.
pub fn extract_document_text(bytes: &[u8], display_name: &str) -> DocumentText {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if !text.trim().is_empty() => DocumentText {
            text: text.trim().to_string(),
            degraded: false,
        },
        Ok(_) => {
            warn!("No text content found in '{display_name}', using placeholder content");
            DocumentText {
                text: placeholder_text(display_name),
                degraded: true,
            }
        }
        Err(e) => {
            warn!("PDF extraction failed for '{display_name}': {e}, using placeholder content");
            DocumentText {
                text: placeholder_text(display_name),
                degraded: true,
            }
        }
    }
}

/// Deterministic stand-in text for an unextractable document.
fn placeholder_text(display_name: &str) -> String {
    let base_name = Path::new(display_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_name.to_string());
    format!(
        "PDF content from {base_name} - [PDF processing encountered an issue, \
         but continuing with question generation]"
    )
}
