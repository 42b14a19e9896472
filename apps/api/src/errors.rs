use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::AnalysisError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedFormat { .. } => AppError::UnsupportedFormat(err.to_string()),
            AnalysisError::Extraction { .. } => AppError::Extraction(err.to_string()),
            AnalysisError::ModelCall(e) => AppError::Llm(e),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    msg.clone(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The analysis service could not be reached".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractor::ExtractionError;

    #[test]
    fn test_analysis_errors_map_to_http_status() {
        let unsupported: AppError = AnalysisError::UnsupportedFormat {
            filename: "cv.txt".to_string(),
            extension: "txt".to_string(),
        }
        .into();
        assert_eq!(unsupported.parts().0, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(unsupported.parts().2.contains("cv.txt"));

        let extraction: AppError = AnalysisError::Extraction {
            filename: "cv.pdf".to_string(),
            source: ExtractionError::Pdf("bad xref".to_string()),
        }
        .into();
        assert_eq!(extraction.parts().1, "EXTRACTION_FAILED");

        let llm: AppError = AnalysisError::ModelCall(LlmError::EmptyContent).into();
        assert_eq!(llm.parts().0, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::Validation("job_description cannot be empty".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
