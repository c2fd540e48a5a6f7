//! Browser page handlers.
//!
//! Form posts perform the same operations as the JSON API and answer with
//! a 303 redirect back to the relevant page.

use axum::Form;
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_service::UploadParams;

use crate::dto::request::{CreateFolderRequest, validate_request};
use crate::error::{log_if_server_error, status_for};
use crate::handlers::document::read_file_field;
use crate::html;
use crate::state::AppState;

/// An [`AppError`] rendered as an HTML page instead of JSON.
#[derive(Debug)]
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, code) = status_for(self.0.kind);
        log_if_server_error(&self.0, status);
        (
            status,
            Html(html::error_page(status.as_u16(), code, &self.0.message)),
        )
            .into_response()
    }
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let folders = state.folder_service.list_folders().await?;
    Ok(Html(html::folder_index(&folders)))
}

/// GET /folders/{id}
pub async fn folder_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, PageError> {
    let folder = state.folder_service.get_folder(id).await?;
    let documents = state.document_service.list_documents(id).await?;
    Ok(Html(html::folder_detail(&folder, &documents)))
}

/// POST /folders
pub async fn create_folder(
    State(state): State<AppState>,
    Form(req): Form<CreateFolderRequest>,
) -> Result<Redirect, PageError> {
    validate_request(&req)?;
    let folder = state.folder_service.create_folder(&req.name).await?;
    Ok(Redirect::to(&format!("/folders/{}", folder.id)))
}

/// POST /folders/{id}/upload
pub async fn upload_document(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Redirect, PageError> {
    let (file_name, data) = read_file_field(multipart).await?;
    state
        .upload_service
        .upload(UploadParams {
            folder_id,
            file_name,
            data,
        })
        .await?;
    Ok(Redirect::to(&format!("/folders/{folder_id}")))
}

/// POST /folders/{id}/delete
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, PageError> {
    state.folder_service.delete_folder(id).await?;
    Ok(Redirect::to("/"))
}

/// POST /documents/{id}/delete
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, PageError> {
    let document = state.document_service.get_document(id).await?;
    state.document_service.delete_document(id).await?;
    Ok(Redirect::to(&format!("/folders/{}", document.folder_id)))
}
