use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::debug;

use crate::{
    error::AppError,
    message::PageView,
    services::{file_analysis::UploadedFile, page::Event},
    state::SharedState,
};

/// Multipart form with an optional `session_id` text field and an optional
/// `file` field. The file content is only counted, never kept.
pub async fn upload_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<PageView>, AppError> {
    let mut session_id = None;
    let mut file = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("session_id") => {
                let text = field.text().await.map_err(|err| AppError::BadRequest(err.body_text()))?;
                session_id = Some(text);
            }
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                // Chunks are counted and dropped; the content is never buffered.
                let mut size = 0;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|err| AppError::BadRequest(err.body_text()))?
                {
                    size += chunk.len();
                }
                // An empty file input still sends a part with no file name.
                if !name.is_empty() {
                    debug!(file_name = %name, size, "received upload");
                    file = Some(UploadedFile::new(name, content_type, size));
                }
            }
            _ => {}
        }
    }

    Ok(Json(state.interact(session_id.as_deref(), Event::Upload(file)).await))
}
