//! Axum route handlers for the analysis endpoints.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::analysis::jobs::{run_keyword_job, run_tailoring_job};
use crate::analysis::models::{TailoringResponse, UploadResponse};
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::form::{UploadForm, KEYWORD_FIELDS, TAILOR_FIELDS};

/// POST /uploads
///
/// Keyword matching. Multipart fields `resume` and `job_description`.
/// Returns the script's raw stdout in `output`.
pub async fn handle_keyword_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = UploadForm::read(multipart?, KEYWORD_FIELDS).await?.validate()?;
    let response = run_keyword_job(state, upload).await?;
    Ok(Json(response))
}

/// POST /api/tailor-resume
///
/// Full tailoring. Multipart fields `resume` and `jobDescription`, each a
/// file or inline text. Returns the script's JSON document unchanged.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TailoringResponse>, AppError> {
    let upload = UploadForm::read(multipart?, TAILOR_FIELDS).await?.validate()?;
    let response = run_tailoring_job(state, upload).await?;
    Ok(Json(response))
}
