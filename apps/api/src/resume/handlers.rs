use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::resume_object_key;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::pipeline::{validate_student_id, PipelineReport, ResumeUpload, PDF_CONTENT_TYPE};
use crate::resume::repository::ResumeUpsert;
use crate::state::AppState;

/// Multipart upload limit for resume files.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

#[derive(Serialize)]
pub struct UploadResponse {
    pub student_id: String,
    pub bucket: String,
    pub object_key: String,
    pub size_bytes: usize,
}

#[derive(Deserialize)]
pub struct ExtractTextRequest {
    pub object_key: String,
}

#[derive(Serialize)]
pub struct ExtractTextResponse {
    pub object_key: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct UpsertResponse {
    pub student_id: String,
    pub rows_affected: u64,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PipelineReport>, AppError> {
    let (student_id, upload) = read_resume_form(multipart).await?;
    let report = state.pipeline.process(upload, &student_id).await?;
    Ok(Json(report))
}

/// POST /api/v1/resumes/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let (student_id, upload) = read_resume_form(multipart).await?;
    validate_student_id(&student_id)?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("resume file is empty".to_string()));
    }

    let object_key = resume_object_key(&student_id);
    let size_bytes = upload.bytes.len();
    let content_type = upload.content_type.as_deref().unwrap_or(PDF_CONTENT_TYPE);
    state
        .documents
        .put(&object_key, upload.bytes, content_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            student_id,
            bucket: state.config.s3_bucket.clone(),
            object_key,
            size_bytes,
        }),
    ))
}

/// POST /api/v1/resumes/extract-text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let object_key = req.object_key.trim().to_string();
    if object_key.is_empty() {
        return Err(AppError::Validation("object_key is required".to_string()));
    }

    let bytes = state.documents.get(&object_key).await?;
    let text = state.text_extractor.extract_text(bytes).await?;
    Ok(Json(ExtractTextResponse { object_key, text }))
}

/// POST /api/v1/resumes
pub async fn handle_upsert(
    State(state): State<AppState>,
    Json(req): Json<ResumeUpsert>,
) -> Result<Json<UpsertResponse>, AppError> {
    validate_student_id(&req.student_id)?;
    if req.totalexperiences < 0 {
        return Err(AppError::Validation(
            "totalexperiences must not be negative".to_string(),
        ));
    }

    let rows_affected = state.resumes.upsert(&req).await?;
    Ok(Json(UpsertResponse {
        student_id: req.student_id,
        rows_affected,
    }))
}

/// GET /api/v1/resumes/:student_id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = state
        .resumes
        .fetch(&student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No resume data for student {student_id}")))?;
    Ok(Json(row))
}

/// Reads the `resume` file part and the `student_id` (or `studentid`) text part.
async fn read_resume_form(mut multipart: Multipart) -> Result<(String, ResumeUpload), AppError> {
    let mut student_id: Option<String> = None;
    let mut upload: Option<ResumeUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume file: {e}")))?;
                upload = Some(ResumeUpload {
                    bytes,
                    content_type,
                    file_name,
                });
            }
            Some("student_id") | Some("studentid") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read student_id: {e}")))?;
                student_id = Some(value.trim().to_string());
            }
            _ => {}
        }
    }

    let student_id =
        student_id.ok_or_else(|| AppError::Validation("student_id is required".to_string()))?;
    let upload =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    info!(
        "Received resume '{}' ({} bytes) for student {student_id}",
        upload.file_name.as_deref().unwrap_or("unnamed"),
        upload.bytes.len()
    );
    Ok((student_id, upload))
}
