//! Axum route handlers for the analysis API.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::aggregator::analyze_batch;
use crate::analysis::extractor::Document;
use crate::analysis::pipeline::analyze_document;
use crate::analysis::report::{
    export_batch, export_result, BatchView, ResultView, BATCH_EXPORT_FILENAME,
    SINGLE_EXPORT_FILENAME,
};
use crate::errors::AppError;
use crate::session::StoredResult;
use crate::state::AppState;

const MISSING_INPUT_MESSAGE: &str = "Please upload a resume and paste the job description.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub filename: String,
    #[serde(flatten)]
    pub view: ResultView,
}

/// Fields read from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    job_description: String,
    documents: Vec<Document>,
}

/// Reads `job_description` plus every file field named `file_field`.
async fn read_upload_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "job_description" {
            form.job_description = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
        } else if name == file_field {
            form.documents.push(read_document(field).await?);
        }
    }

    if form.job_description.trim().is_empty() || form.documents.is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }
    Ok(form)
}

/// An empty file input arrives as `filename=""` with no content; both count
/// as a missing upload.
async fn read_document(field: Field<'_>) -> Result<Document, AppError> {
    let filename = field
        .file_name()
        .filter(|name| !name.trim().is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::Validation(MISSING_INPUT_MESSAGE.to_string()))?;
    let content = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?;
    if content.is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }
    Ok(Document::new(filename, content))
}

async fn require_session(state: &AppState, session_id: Uuid) -> Result<(), AppError> {
    if state.sessions.exists(session_id).await {
        Ok(())
    } else {
        Err(session_not_found(session_id))
    }
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {session_id} not found or expired"))
}

fn json_attachment(body: String, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!(%session_id, "Session created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Multipart form: `job_description` text and one `resume` file (PDF or DOCX).
/// Replaces the session's previous single-document result.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    require_session(&state, session_id).await?;

    let form = read_upload_form(multipart, "resume").await?;
    let Some(document) = form.documents.into_iter().next() else {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    };
    let filename = document.filename.clone();

    let result = analyze_document(document, &form.job_description, state.model.as_ref()).await?;
    let view = ResultView::from_result(&result);

    if !state
        .sessions
        .store_result(
            session_id,
            StoredResult {
                filename: filename.clone(),
                result,
            },
        )
        .await
    {
        return Err(session_not_found(session_id));
    }

    Ok(Json(AnalysisResponse { filename, view }))
}

/// POST /api/v1/sessions/:id/batch
///
/// Multipart form: `job_description` text and one or more `resumes` files.
/// Every file gets exactly one entry, in upload order.
pub async fn handle_batch(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<BatchView>, AppError> {
    require_session(&state, session_id).await?;

    let form = read_upload_form(multipart, "resumes").await?;
    info!(%session_id, documents = form.documents.len(), "Starting batch analysis");

    let batch = analyze_batch(form.documents, &form.job_description, state.model.as_ref()).await;
    let view = BatchView::from_batch(&batch);

    if !state.sessions.store_batch(session_id, batch).await {
        return Err(session_not_found(session_id));
    }

    Ok(Json(view))
}

/// GET /api/v1/sessions/:id/result
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let stored = last_result(&state, session_id).await?;
    Ok(Json(AnalysisResponse {
        view: ResultView::from_result(&stored.result),
        filename: stored.filename,
    }))
}

/// GET /api/v1/sessions/:id/result/export
pub async fn handle_export_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let stored = last_result(&state, session_id).await?;
    let body = export_result(&stored.result).map_err(|e| AppError::Internal(e.into()))?;
    Ok(json_attachment(body, SINGLE_EXPORT_FILENAME))
}

/// GET /api/v1/sessions/:id/batch
pub async fn handle_get_batch(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<BatchView>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let batch = session
        .last_batch
        .ok_or_else(|| AppError::NotFound("No batch analysis yet; upload resumes first".to_string()))?;
    Ok(Json(BatchView::from_batch(&batch)))
}

/// GET /api/v1/sessions/:id/batch/export
pub async fn handle_export_batch(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let batch = session
        .last_batch
        .ok_or_else(|| AppError::NotFound("No batch analysis yet; upload resumes first".to_string()))?;
    let body = export_batch(&batch).map_err(|e| AppError::Internal(e.into()))?;
    Ok(json_attachment(body, BATCH_EXPORT_FILENAME))
}

async fn last_result(state: &AppState, session_id: Uuid) -> Result<StoredResult, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    session
        .last_result
        .ok_or_else(|| AppError::NotFound("No analysis yet; upload a resume first".to_string()))
}
