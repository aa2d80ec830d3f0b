use serde::{Deserialize, Serialize};

use super::booking::BookingState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Idle,
    Booking,
    Confirming,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Idle => "idle",
            ChatMode::Booking => "booking",
            ChatMode::Confirming => "confirming",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Result of offering a message to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Answered(String),
    /// Not handled here; the caller may try answering from hotel documents.
    Fallback,
}

/// One conversation. `booking` is present only while `mode` is not `Idle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub mode: ChatMode,
    pub booking: Option<BookingState>,
    #[serde(skip)]
    pub(crate) confirmed: Option<BookingState>,
}

impl ChatState {
    pub fn push_user(&mut self, content: &str) {
        self.messages.push(ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        });
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.messages.push(ChatMessage {
            role: "assistant".to_string(),
            content: content.to_string(),
        });
    }

    /// Hands over the booking confirmed by the latest message, if any, so the
    /// caller can persist it.
    pub fn take_confirmed(&mut self) -> Option<BookingState> {
        self.confirmed.take()
    }
}
