use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{error::AppError, message::PageView, services::page::Event, state::SharedState};

/// Redraws the page for a session without changing it. Unknown ids start a
/// new session, as a first visit would.
pub async fn redraw_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Json<PageView> {
    Json(state.interact(Some(session_id.as_str()), Event::Redraw).await)
}

/// Ends a session and drops its history.
pub async fn reset_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove_session(&session_id).await {
        info!(session_id = %session_id, "session reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {session_id}")))
    }
}
