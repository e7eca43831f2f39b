use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{FileUpload, GalleryAccess},
    error::{AppError, Result},
};

/// Multipart form with a `vendor_id` field and a `file` field.
#[utoipa::path(
    post, path = "/api/gallery/{couple_id}/files", tag = "Gallery",
    params(("couple_id" = Uuid, Path, description = "Couple id")),
    responses((status = 201, body = FileUpload), (status = 422, description = "Unsupported or oversized file"))
)]
pub async fn upload(
    State(state): State<AppState>,
    Path(couple_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileUpload>)> {
    let mut vendor_id: Option<Uuid> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "vendor_id" => {
                let text = field.text().await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                vendor_id = Some(Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::Validation("vendor_id must be a UUID".to_string()))?);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, data.to_vec()));
            }
            _ => {
                field.bytes().await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
        }
    }

    let vendor_id = vendor_id
        .ok_or_else(|| AppError::Validation("vendor_id is required".to_string()))?;
    let (filename, data) = file
        .ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let upload = state.service_context.gallery_service
        .record_upload(couple_id, vendor_id, &filename, &data)
        .await?;

    Ok((StatusCode::CREATED, Json(upload)))
}

#[utoipa::path(
    get, path = "/api/gallery/{couple_id}/files", tag = "Gallery",
    params(("couple_id" = Uuid, Path, description = "Couple id")),
    responses((status = 200, body = [FileUpload]))
)]
pub async fn list(
    State(state): State<AppState>,
    Path(couple_id): Path<Uuid>,
) -> Result<Json<Vec<FileUpload>>> {
    let files = state.service_context.gallery_service.list_files(couple_id).await?;
    Ok(Json(files))
}

#[utoipa::path(
    get, path = "/api/gallery/{couple_id}/access", tag = "Gallery",
    params(("couple_id" = Uuid, Path, description = "Couple id")),
    responses((status = 200, body = GalleryAccess))
)]
pub async fn access(
    State(state): State<AppState>,
    Path(couple_id): Path<Uuid>,
) -> Result<Json<GalleryAccess>> {
    let access = state.service_context.gallery_service
        .check_access(couple_id, Utc::now())
        .await?;
    Ok(Json(access))
}

#[utoipa::path(
    get, path = "/api/gallery/{couple_id}/files/{file_id}/download", tag = "Gallery",
    params(
        ("couple_id" = Uuid, Path, description = "Couple id"),
        ("file_id" = Uuid, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File contents"),
        (status = 402, description = "Free period over and no active subscription")
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Path((couple_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let gallery = &state.service_context.gallery_service;
    let upload = gallery.authorize_download(couple_id, file_id, Utc::now()).await?;
    let data = gallery.read_file(&upload).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        upload.file_name.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}
