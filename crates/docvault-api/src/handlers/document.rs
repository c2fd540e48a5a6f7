//! Document handlers: listing, upload, lookup, deletion, inline view.

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_entity::document::Document;
use docvault_service::UploadParams;

use crate::dto::response::{ApiResponse, MessageResponse, UploadResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Map a multipart parse failure, keeping body-limit rejections distinct.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(format!("Request body too large: {}", e.body_text()))
    } else {
        AppError::validation(format!("Multipart error: {}", e.body_text()))
    }
}

/// Pull the `file` field out of a multipart body.
///
/// Returns the client-supplied file name and the field's bytes.
pub(crate) async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(String::from)
            .ok_or_else(|| AppError::validation("Uploaded file has no file name"))?;
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok((file_name, data));
    }

    Err(AppError::validation("Multipart field 'file' is required"))
}

/// GET /api/folders/{id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Document>>>, ApiError> {
    let documents = state.document_service.list_documents(folder_id).await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// POST /api/folders/{id}/documents
pub async fn upload_document(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let (file_name, data) = read_file_field(multipart).await?;

    let document = state
        .upload_service
        .upload(UploadParams {
            folder_id,
            file_name,
            data,
        })
        .await?;

    let message = format!("Uploaded '{}'", document.title);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UploadResponse { document, message })),
    ))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let document = state.document_service.get_document(id).await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.document_service.delete_document(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Document deleted"))))
}

/// GET /api/documents/{id}/view
pub async fn view_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let result = state.view_service.view(id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_DISPOSITION, result.disposition)
        .header(header::CONTENT_LENGTH, result.content_length)
        .body(Body::from_stream(result.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
