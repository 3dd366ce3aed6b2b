use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    message::{ImageRequest, PageView},
    services::page::Event,
    state::SharedState,
};

pub async fn image_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<PageView>, AppError> {
    let Json(payload) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let event = Event::GenerateImage { prompt: payload.prompt, pressed: payload.generate };
    Ok(Json(state.interact(payload.session_id.as_deref(), event).await))
}
