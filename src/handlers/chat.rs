use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingRecord, BookingState, ChatMessage, ChatMode, ChatReply};
use crate::services::{booking_flow, chat, documents};
use crate::state::AppState;

pub const NO_DOCUMENTS_REPLY: &str =
    "Please upload hotel documents or say *I want to book a room*.";

const DOCUMENTS_ERROR_REPLY: &str =
    "Sorry, I couldn't look that up in the hotel documents right now. Please try again in a moment.";

const SAVE_FAILED_NOTE: &str =
    "We couldn't record your booking just now. Please contact the front desk to make sure it is saved.";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Chat,
    Documents,
    Default,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub source: ReplySource,
    pub mode: ChatMode,
}

// POST /api/chat
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }
    let session_id = req
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Held until the reply is recorded so concurrent requests on one session
    // cannot interleave the transcript.
    let session = state.session(&session_id)?;
    let mut chat_state = session.lock().await;

    let outcome = chat::handle_user_message(&mut chat_state, &message);
    let confirmed = chat_state.take_confirmed();

    tracing::info!(session = %session_id, handled = matches!(outcome, ChatReply::Answered(_)), "chat message");

    let (mut reply, source) = match outcome {
        ChatReply::Answered(text) => (text, ReplySource::Chat),
        ChatReply::Fallback => {
            let (text, source) = fallback_reply(&state, &message).await;
            chat_state.push_assistant(&text);
            (text, source)
        }
    };

    if let Some(booking) = confirmed {
        if let Err(e) = persist_confirmed(&state, &booking) {
            tracing::error!(error = %e, session = %session_id, "failed to save confirmed booking");
            chat_state.push_assistant(SAVE_FAILED_NOTE);
            reply = format!("{reply}\n\n{SAVE_FAILED_NOTE}");
        }
    }

    let mode = chat_state.mode;

    Ok(Json(ChatResponse {
        session_id,
        reply,
        source,
        mode,
    }))
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub mode: ChatMode,
    pub messages: Vec<ChatMessage>,
}

// GET /api/chat/:session_id/messages
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let session = state
        .existing_session(&session_id)?
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;
    let chat_state = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: session_id.clone(),
        mode: chat_state.mode,
        messages: chat_state.messages.clone(),
    }))
}

async fn fallback_reply(state: &AppState, question: &str) -> (String, ReplySource) {
    let Some(index) = state.document_index() else {
        return (NO_DOCUMENTS_REPLY.to_string(), ReplySource::Default);
    };

    match documents::answer(
        state.llm.as_ref(),
        question,
        &index,
        state.config.retrieval_top_k,
    )
    .await
    {
        Ok(answer) => (answer, ReplySource::Documents),
        Err(e) => {
            tracing::error!(error = %e, "document answering failed");
            (DOCUMENTS_ERROR_REPLY.to_string(), ReplySource::Documents)
        }
    }
}

fn persist_confirmed(state: &AppState, booking: &BookingState) -> Result<BookingRecord, AppError> {
    let record = BookingRecord::from_confirmed(booking, booking_flow::summary(booking))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("confirmed booking is incomplete")))?;

    let db = state.db()?;
    queries::create_booking(&db, &record)?;

    tracing::info!(booking_id = %record.id, room_type = %record.room_type, "booking saved");
    Ok(record)
}
