// Résumé analysis: extraction, prompt building, model reply interpretation,
// batch aggregation and the report views/exports built on top of them.
// All model calls go through llm_client — no direct HTTP calls here.

pub mod aggregator;
pub mod extractor;
pub mod handlers;
pub mod interpreter;
pub mod pipeline;
pub mod prompts;
pub mod report;
