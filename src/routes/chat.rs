use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    message::{ChatRequest, PageView},
    services::page::Event,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<PageView>, AppError> {
    let Json(payload) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;

    // Blank input is not a submission; the page is simply redrawn.
    let page = state
        .interact(payload.session_id.as_deref(), Event::ChatSubmit(payload.message))
        .await;
    Ok(Json(page))
}
