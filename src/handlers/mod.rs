pub mod admin;
pub mod chat;
pub mod documents;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/chat", post(chat::post_chat))
        .route("/api/chat/:session_id/messages", get(chat::get_transcript))
        .route("/api/documents", post(documents::upload_documents))
        .route("/api/documents/files", post(documents::upload_files))
        .route("/api/admin/bookings", get(admin::get_bookings))
        .route("/api/admin/bookings/:id", get(admin::get_booking))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
