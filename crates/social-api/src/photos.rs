use std::path::{Path as FsPath, PathBuf};

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use social_types::api::{Ack, StoredFile, UploadRequest};
use social_types::identity::Identity;
use social_types::models::PhotoEntry;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;
use crate::upload::{content_type_for, decode_payload, join_unchecked};

/// Where a photo named `filename` lives. The name is not normalised or
/// checked, so `../` escapes the uploads directory.
pub fn photo_path(uploads_dir: &FsPath, filename: &str) -> PathBuf {
    join_unchecked(uploads_dir, filename)
}

/// GET /api/photos/{filename}
pub async fn get_photo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = photo_path(&state.uploads_dir, &filename);
    debug!(path = %path.display(), "Reading photo");

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        debug!("Photo read failed for {}: {}", path.display(), e);
        ApiError::NotFound("Photo not found")
    })?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response())
}

/// GET /api/photos/user/{userId}
///
/// Any user's photos.
pub async fn photos_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PhotoEntry>>, ApiError> {
    let rows = state
        .run_db(move |db| db.photos_by_user(&user_id))
        .await
        .map_err(|e| ApiError::internal("List photos error", e))?;

    Ok(Json(rows))
}

/// POST /api/photos/publish
///
/// Two independent steps: the file is written, then the row is inserted.
/// If the insert fails the file stays on disk with no row pointing at it.
/// Existing files of the same name are overwritten.
pub async fn publish_photo(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(req): JsonBody<UploadRequest>,
) -> Result<Json<StoredFile>, ApiError> {
    let (Some(filename), Some(data)) = (
        req.filename.filter(|f| !f.is_empty()),
        req.data.filter(|d| !d.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Filename and data are required"));
    };

    let bytes = decode_payload(&data).map_err(|e| ApiError::internal("Publish photo error", e))?;
    let path = photo_path(&state.uploads_dir, &filename);

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal("Publish photo error", e))?;

    let user_id = identity.id();
    let row_name = filename.clone();
    let description = req.description;
    if let Err(e) = state
        .run_db(move |db| db.insert_photo(user_id, &row_name, description.as_deref()))
        .await
    {
        warn!(path = %path.display(), "Photo row insert failed; file left on disk");
        return Err(ApiError::internal("Publish photo error", e));
    }

    Ok(Json(StoredFile {
        message: "Photo published".into(),
        filename,
    }))
}

/// DELETE /api/photos/item/{id}
///
/// Owner only. The file is removed first
/// (failures ignored), then the row.
pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let user_id = identity.id();

    let lookup_id = id.clone();
    let filename = state
        .run_db(move |db| db.find_owned_photo(&lookup_id, user_id))
        .await
        .map_err(|e| ApiError::internal("Delete photo error", e))?
        .ok_or(ApiError::NotFound("Photo not found"))?;

    let path = photo_path(&state.uploads_dir, &filename);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        debug!("Ignoring unlink failure for {}: {}", path.display(), e);
    }

    state
        .run_db(move |db| db.delete_photo(&id, user_id))
        .await
        .map_err(|e| ApiError::internal("Delete photo error", e))?;

    Ok(Json(Ack::new("Photo deleted")))
}
