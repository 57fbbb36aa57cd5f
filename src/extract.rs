//! PDF text extraction.
//!
//! The build phase starts here: every uploaded document is reduced to plain
//! UTF-8 text, and the per-document texts are concatenated into a single
//! string with no separators. Page and document boundaries are not
//! recoverable from the output; the chunker downstream does not need them.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::PipelineError;

/// Extract the text of every page of one PDF, in page order.
///
/// Pages with no extractable text contribute nothing. A stream that is not
/// a readable PDF fails with [`PipelineError::DocumentFormat`].
pub fn extract_pdf(bytes: &[u8]) -> Result<String, PipelineError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PipelineError::DocumentFormat(e.to_string()))
}

/// Extract and concatenate an ordered collection of PDF byte streams.
///
/// Document order is preserved and nothing is inserted between documents.
/// The first unreadable document aborts the whole batch.
pub fn extract_documents(documents: &[Vec<u8>]) -> Result<String, PipelineError> {
    let mut text = String::new();
    for doc in documents {
        text.push_str(&extract_pdf(doc)?);
    }
    Ok(text)
}

/// Read the raw bytes of every `*.pdf` under `dir`, in sorted path order.
///
/// This is the auto-load path: the shell points it at a documents directory
/// and feeds the result to the index build. Non-PDF files are ignored.
/// Returns an empty vector when the directory holds no PDFs; a missing or
/// unreadable directory is an error, not an empty document set.
pub fn read_pdf_dir(dir: &Path) -> Result<Vec<Vec<u8>>> {
    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(false) {
        let entry =
            entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::debug!(path = %path.display(), "reading PDF");
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(bytes);
    }
    Ok(documents)
}
