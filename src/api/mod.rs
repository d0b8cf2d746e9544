use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::routing::{get, patch, post, put};
use axum::{Router, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Course, FileObject, Item, ItemKind};
use crate::repository;
use crate::services::{FileService, FileUpload, ImportService, ImportSummary};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(get_catalog))
        .route("/catalog/import", post(import_schedule))
        .route("/catalog/reset", post(reset_catalog))
        .route("/courses/{course_id}/{kind}/items", post(add_item))
        .route(
            "/courses/{course_id}/{kind}/items/{item_id}/complete",
            patch(toggle_item),
        )
        .route(
            "/courses/{course_id}/{kind}/items/{item_id}/file",
            put(attach_file),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn get_catalog(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let catalog = repository::fetch_catalog(&state.db).await?;
    Ok(Json(catalog))
}

/// Replace responses carry the reloaded catalog: after a destructive replace
/// the ids have changed, so clients refetch instead of patching in place.
#[derive(Serialize)]
struct ReplaceResponse {
    #[serde(flatten)]
    summary: ImportSummary,
    catalog: Vec<Course>,
}

async fn import_schedule(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReplaceResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let service = ImportService::new(state.db.clone(), state.extractor.clone());
    let summary = service
        .import_schedule(&upload.media_type, &upload.bytes)
        .await?;

    let catalog = repository::fetch_catalog(&state.db).await?;
    Ok(Json(ReplaceResponse { summary, catalog }))
}

#[derive(Deserialize)]
struct ResetRequest {
    #[serde(default)]
    confirm: bool,
}

async fn reset_catalog(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<ReplaceResponse>, AppError> {
    // Destructive; the client must confirm explicitly.
    if !req.confirm {
        return Err(AppError::Validation(
            "Reset requires confirmation".to_string(),
        ));
    }

    let service = ImportService::new(state.db.clone(), state.extractor.clone());
    let summary = service.reset_to_default().await?;

    let catalog = repository::fetch_catalog(&state.db).await?;
    Ok(Json(ReplaceResponse { summary, catalog }))
}

async fn add_item(
    State(state): State<AppState>,
    Path((course_id, kind)): Path<(String, ItemKind)>,
) -> Result<Json<Item>, AppError> {
    let item = repository::add_item(&state.db, kind, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(item))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path((course_id, kind, item_id)): Path<(String, ItemKind, String)>,
) -> Result<Json<Item>, AppError> {
    let item = repository::toggle_item(&state.db, kind, &course_id, &item_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(item))
}

async fn attach_file(
    State(state): State<AppState>,
    Path((course_id, kind, item_id)): Path<(String, ItemKind, String)>,
    multipart: Multipart,
) -> Result<Json<FileObject>, AppError> {
    let upload = read_upload(multipart).await?;

    let service = FileService::new(state.db.clone(), state.storage.clone());
    let file = service
        .attach_file(&course_id, kind, &item_id, upload)
        .await?;
    Ok(Json(file))
}

async fn read_upload(mut multipart: Multipart) -> Result<FileUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let media_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e)))?;
            return Ok(FileUpload {
                name,
                media_type,
                bytes: bytes.to_vec(),
            });
        }
    }

    Err(AppError::Validation("Missing file field".to_string()))
}
