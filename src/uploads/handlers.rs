use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    uploads::service::{
        is_safe_filename, save_all, validate_batch, UploadFile, UploadedFileInfo,
        MAX_FILES_PER_BATCH,
    },
};

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_limits).post(upload_files))
        .route("/upload/cleanup", delete(cleanup_file))
        // 5 files x 5MB plus multipart overhead
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub files: Vec<UploadedFileInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CleanupParams {
    pub filename: String,
}

#[instrument(skip(state, multipart))]
pub async fn upload_files(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() != Some("files") && name.as_deref() != Some("files[]") {
            continue;
        }
        if files.len() >= MAX_FILES_PER_BATCH {
            return Err(AppError::Validation(
                "at most 5 files can be uploaded at once".into(),
            ));
        }
        let original_name = field.file_name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
        files.push(UploadFile {
            original_name,
            content_type,
            body,
        });
    }

    // whole batch validated before any write; one bad file fails everything
    validate_batch(&files).map_err(|msg| {
        warn!(user_id = %identity.id, %msg, "upload batch rejected");
        AppError::Validation(msg)
    })?;

    let saved = save_all(
        state.files.as_ref(),
        &state.config.upload.public_path,
        files,
    )
    .await?;

    info!(user_id = %identity.id, count = saved.len(), "files uploaded");
    Ok(Json(UploadResponse {
        success: true,
        message: format!("{} file(s) uploaded successfully", saved.len()),
        files: saved,
    }))
}

/// Advertises the upload constraints so clients can validate before sending.
#[instrument]
pub async fn upload_limits(AuthUser(_identity): AuthUser) -> Json<Value> {
    Json(json!({
        "max_file_size": "5MB",
        "allowed_types": ["JPG", "PNG", "GIF", "WebP", "PDF"],
        "max_files": MAX_FILES_PER_BATCH,
        "upload_path": "/uploads",
    }))
}

/// Removes one stored file by name. Deleting a file that is already gone is
/// a success, so retries are harmless.
#[instrument(skip(state))]
pub async fn cleanup_file(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(params): Query<CleanupParams>,
) -> AppResult<Json<Value>> {
    if !is_safe_filename(&params.filename) {
        warn!(user_id = %identity.id, filename = %params.filename, "rejected cleanup filename");
        return Err(AppError::Validation("invalid filename".into()));
    }

    let removed = state.files.remove(&params.filename).await?;
    let message = if removed {
        "file deleted"
    } else {
        "file was already gone"
    };
    info!(user_id = %identity.id, filename = %params.filename, removed, "cleanup");
    Ok(Json(json!({
        "message": message,
        "filename": params.filename,
    })))
}
