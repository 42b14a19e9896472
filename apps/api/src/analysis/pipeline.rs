//! Single-document analysis: extract → prompt → model → interpret.

use thiserror::Error;
use tracing::info;

use crate::analysis::extractor::{extract_text_blocking, Document, ExtractionError};
use crate::analysis::interpreter::{interpret, AnalysisResult, MatchReport};
use crate::analysis::prompts::build_prompt;
use crate::llm_client::{LlmError, ModelClient};

/// Failures that stop the analysis of one document. Reply parse failures are
/// not here: they are recovered as `AnalysisResult::RawFallback`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported file format '{extension}' for {filename}; upload a PDF or DOCX")]
    UnsupportedFormat { filename: String, extension: String },

    #[error("Could not extract text from {filename}: {source}")]
    Extraction {
        filename: String,
        #[source]
        source: ExtractionError,
    },

    #[error("Model call failed: {0}")]
    ModelCall(#[from] LlmError),
}

/// Runs the full pipeline for one document against one job description.
pub async fn analyze_document(
    document: Document,
    job_description: &str,
    model: &dyn ModelClient,
) -> Result<AnalysisResult, AnalysisError> {
    let filename = document.filename.clone();
    let extension = document.extension().to_string();

    let resume_text = extract_text_blocking(document)
        .await
        .map_err(|source| AnalysisError::Extraction {
            filename: filename.clone(),
            source,
        })?
        .ok_or_else(|| AnalysisError::UnsupportedFormat {
            filename: filename.clone(),
            extension,
        })?;

    let prompt = build_prompt(&resume_text, job_description);
    let reply = model.generate(&prompt).await?;
    let result = interpret(&reply);

    info!(
        filename = %filename,
        structured = result.is_structured(),
        match_percentage = ?result.report().map(MatchReport::normalized_percentage),
        "Analysis completed"
    );
    Ok(result)
}
