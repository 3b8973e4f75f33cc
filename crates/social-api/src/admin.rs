//! Admin-only controllers. The role check lives in `middleware::require_admin`;
//! nothing here re-checks it.

use std::path::Path as FsPath;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde_json::Value;

use social_types::api::{Ack, BlockRequest, StoredFile, UploadRequest};
use social_types::models::AdminFile;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;
use crate::upload::{decode_payload, join_unchecked};

/// Loose truthiness for client-supplied flags: `"no"` and `[]` are true,
/// `0`, `""` and `null` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// POST /api/admin/users/{id}/block
pub async fn set_block_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<BlockRequest>,
) -> Result<Json<Ack>, ApiError> {
    let blocked = req.blocked.as_ref().is_some_and(is_truthy);

    state
        .run_db(move |db| db.set_blocked(&id, blocked))
        .await
        .map_err(|e| ApiError::internal("Set block status error", e))?;

    Ok(Json(Ack::new(if blocked { "User blocked" } else { "User unblocked" })))
}

async fn ensure_dir(dir: &FsPath) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

/// GET /api/admin/files
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<AdminFile>>, ApiError> {
    let dir = &state.admin_uploads_dir;
    ensure_dir(dir)
        .await
        .map_err(|e| ApiError::internal("Admin list files error", e))?;

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ApiError::internal("Admin list files error", e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::internal("Admin list files error", e))?
    {
        let meta = tokio::fs::metadata(entry.path())
            .await
            .map_err(|e| ApiError::internal("Admin list files error", e))?;
        let modified = meta
            .modified()
            .map_err(|e| ApiError::internal("Admin list files error", e))?;

        files.push(AdminFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: DateTime::<Utc>::from(modified),
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(files))
}

/// POST /api/admin/files/upload
///
/// Any name, any content, silent overwrite.
pub async fn upload_file(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UploadRequest>,
) -> Result<Json<StoredFile>, ApiError> {
    let (Some(filename), Some(data)) = (
        req.filename.filter(|f| !f.is_empty()),
        req.data.filter(|d| !d.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Filename and data are required"));
    };

    ensure_dir(&state.admin_uploads_dir)
        .await
        .map_err(|e| ApiError::internal("Admin upload file error", e))?;

    let bytes = decode_payload(&data).map_err(|e| ApiError::internal("Admin upload file error", e))?;
    let path = join_unchecked(&state.admin_uploads_dir, &filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal("Admin upload file error", e))?;

    Ok(Json(StoredFile {
        message: "File stored".into(),
        filename,
    }))
}

/// DELETE /api/admin/files/{name}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    ensure_dir(&state.admin_uploads_dir)
        .await
        .map_err(|e| ApiError::internal("Admin delete file error", e))?;

    let path = join_unchecked(&state.admin_uploads_dir, &name);
    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|e| ApiError::internal("Admin delete file error", e))?;
    if !exists {
        return Err(ApiError::NotFound("File not found"));
    }

    tokio::fs::remove_file(&path)
        .await
        .map_err(|e| ApiError::internal("Admin delete file error", e))?;

    Ok(Json(Ack::new("File removed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_loose_client_semantics() {
        for truthy in [json!(true), json!(1), json!(-0.5), json!("false"), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
        for falsy in [json!(false), json!(0), json!(0.0), json!(""), json!(null)] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
    }
}
