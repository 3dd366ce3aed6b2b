// src/routes/mod.rs
pub mod admin;
pub mod chat;
pub mod image;
pub mod session;
pub mod upload;

use std::path::Path;

use crate::state::SharedState;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use admin::get_metrics_handler;
use chat::chat_handler;
use image::image_handler;
use session::{redraw_handler, reset_handler};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use upload::upload_handler;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

pub fn create_router(state: SharedState, public_dir: impl AsRef<Path>) -> Router {
    let admin_routes = Router::new()
        .route("/metrics", get(get_metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/image", post(image_handler))
        .route(
            "/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/session/{id}", get(redraw_handler).delete(reset_handler))
        .nest("/admin", admin_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn auth_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Without a configured key the admin surface stays closed.
    let Some(expected) = state.admin_key.as_deref() else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    match req.headers().get("x-admin-key") {
        Some(val) if val == expected => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
