use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Photo and video formats vendors deliver.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "mp4", "mov"];

/// Maximum file size (500 MB)
pub const MAX_FILE_SIZE: usize = 500 * 1024 * 1024;

fn extension_of(filename: &str) -> Result<String> {
    let (_, extension) = filename
        .rsplit_once('.')
        .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;
    let extension = extension.to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(extension)
}

/// Save a gallery file under `<uploads_dir>/<couple_id>/`.
/// Returns the path relative to `uploads_dir` (e.g. "<couple_id>/abc123.jpg").
pub async fn save_gallery_file(
    uploads_dir: &str,
    couple_id: Uuid,
    filename: &str,
    data: &[u8],
) -> Result<String> {
    if data.is_empty() {
        return Err(AppError::Validation("File is empty".to_string()));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation("File too large (max 500 MB)".to_string()));
    }

    let extension = extension_of(filename)?;

    let couple_dir = PathBuf::from(uploads_dir).join(couple_id.to_string());
    fs::create_dir_all(&couple_dir).await.map_err(|e| {
        AppError::Internal(format!("Failed to create uploads directory: {}", e))
    })?;

    let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
    let file_path = couple_dir.join(&new_filename);

    let mut file = fs::File::create(&file_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create file: {}", e))
    })?;

    file.write_all(data).await.map_err(|e| {
        AppError::Internal(format!("Failed to write file: {}", e))
    })?;

    Ok(format!("{}/{}", couple_id, new_filename))
}

pub async fn read_gallery_file(uploads_dir: &str, storage_path: &str) -> Result<Vec<u8>> {
    if storage_path.contains("..") {
        return Err(AppError::BadRequest("Invalid storage path".to_string()));
    }
    fs::read(Path::new(uploads_dir).join(storage_path))
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read file: {}", e)))
}

/// Deletes a stored gallery file. Missing files are not an error.
pub async fn remove_gallery_file(uploads_dir: &str, storage_path: &str) -> Result<()> {
    if storage_path.contains("..") {
        return Err(AppError::BadRequest("Invalid storage path".to_string()));
    }
    match fs::remove_file(Path::new(uploads_dir).join(storage_path)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Internal(format!("Failed to remove file: {}", e))),
    }
}
