//! Folder handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use docvault_entity::folder::Folder;

use crate::dto::request::{CreateFolderRequest, validate_request};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = state.folder_service.list_folders().await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.get_folder(id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    validate_request(&req)?;

    let folder = state.folder_service.create_folder(&req.name).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.folder_service.delete_folder(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Folder and its documents deleted",
    ))))
}
