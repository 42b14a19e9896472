//! Result Aggregator — batch path.
//!
//! Documents are analyzed one after another, in upload order. A failure for
//! one document is recorded on its entry and the batch carries on.

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::extractor::Document;
use crate::analysis::interpreter::AnalysisResult;
use crate::analysis::pipeline::analyze_document;
use crate::llm_client::ModelClient;

/// What happened to one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntryOutcome {
    Analyzed(AnalysisResult),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

impl BatchEntry {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            EntryOutcome::Analyzed(result) => Some(result),
            EntryOutcome::Failed { .. } => None,
        }
    }
}

/// One entry per submitted document, in submission order.
pub type BatchResult = Vec<BatchEntry>;

pub async fn analyze_batch(
    documents: Vec<Document>,
    job_description: &str,
    model: &dyn ModelClient,
) -> BatchResult {
    let total = documents.len();
    let mut batch = Vec::with_capacity(total);

    for (index, document) in documents.into_iter().enumerate() {
        let filename = document.filename.clone();
        let outcome = match analyze_document(document, job_description, model).await {
            Ok(result) => EntryOutcome::Analyzed(result),
            Err(e) => {
                warn!(filename = %filename, "Batch entry {}/{} failed: {e}", index + 1, total);
                EntryOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        batch.push(BatchEntry { filename, outcome });
    }

    let failed = batch.iter().filter(|e| e.result().is_none()).count();
    info!("Batch analysis finished: {} documents, {} failed", total, failed);
    batch
}
