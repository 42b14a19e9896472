//! Document Extractor — turns an uploaded PDF or DOCX into plain text.
//!
//! The format is decided by the filename extension only; bytes are never sniffed.
//! An unknown extension is an `Ok(None)` signal, not an error, so callers can
//! short-circuit with a user-facing message. A parser failure is an
//! `ExtractionError` and is fatal for that one document.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

/// Plain text pulled out of a document. Empty is valid (e.g. a scanned PDF).
pub type ExtractedText = String;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("text extraction aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Maps the filename extension (case-insensitive) to a supported format.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

/// An uploaded document. Lives only until its text has been extracted.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_filename(&self.filename)
    }

    /// Extension as written in the filename, for error messages.
    pub fn extension(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }
}

/// Extracts text from `document`. `Ok(None)` means the format is unsupported.
pub fn extract_text(document: &Document) -> Result<Option<ExtractedText>, ExtractionError> {
    let Some(format) = document.format() else {
        return Ok(None);
    };

    let text = match format {
        DocumentFormat::Pdf => extract_pdf(&document.content)?,
        DocumentFormat::Docx => extract_docx(&document.content)?,
    };

    debug!(
        filename = %document.filename,
        chars = text.len(),
        "Extracted document text"
    );
    Ok(Some(text))
}

/// Runs `extract_text` on the blocking pool. A parser panic becomes an
/// `ExtractionError::Aborted` for this document instead of unwinding the request.
pub async fn extract_text_blocking(
    document: Document,
) -> Result<Option<ExtractedText>, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&document))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}

/// Page texts in page order, joined with no separator.
fn extract_pdf(data: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(pages.concat())
}

/// Top-level paragraph texts in document order, each followed by `\n`.
fn extract_docx(data: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            push_paragraph_text(&mut text, &paragraph.children);
            text.push('\n');
        }
    }
    Ok(text)
}

/// Run text, including runs nested inside hyperlinks.
fn push_paragraph_text(text: &mut String, children: &[ParagraphChild]) {
    for paragraph_child in children {
        match paragraph_child {
            ParagraphChild::Run(run) => push_run_text(text, &run.children),
            ParagraphChild::Hyperlink(hyperlink) => push_paragraph_text(text, &hyperlink.children),
            _ => {}
        }
    }
}

fn push_run_text(text: &mut String, children: &[RunChild]) {
    for run_child in children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
