use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::documents::{self, UploadedDocument};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UploadRequest {
    pub documents: Vec<UploadedDocument>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub documents: usize,
    pub chunks: usize,
}

// POST /api/documents
// Replaces the current index; questions asked afterwards are answered from these documents.
pub async fn upload_documents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    replace_index(&state, &req.documents)
}

// POST /api/documents/files
// Same as above, from multipart file fields. Files must be UTF-8 text.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field
            .file_name()
            .or(field.name())
            .unwrap_or("upload")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read {name}: {e}")))?;
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::BadRequest(format!(
                "{name} is not a text file; upload plain text or markdown"
            ))
        })?;

        uploaded.push(UploadedDocument { name, content });
    }

    replace_index(&state, &uploaded)
}

fn replace_index(
    state: &AppState,
    uploaded: &[UploadedDocument],
) -> Result<Json<UploadResponse>, AppError> {
    let index = documents::ingest(uploaded).map_err(anyhow::Error::from)?;
    if index.is_empty() {
        return Err(AppError::BadRequest(
            "no document text to index".to_string(),
        ));
    }

    let response = UploadResponse {
        documents: index.document_count(),
        chunks: index.len(),
    };

    let mut current = state
        .documents
        .write()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("document index lock poisoned")))?;
    *current = Some(Arc::new(index));

    Ok(Json(response))
}
