//! Hotel booking assistant.
//!
//! The conversational core lives in [`services::chat`] (dispatcher),
//! [`services::booking_flow`] (booking state machine) and
//! [`services::validation`] (field validators). Everything under [`handlers`]
//! is the HTTP surface wrapped around it.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

pub use models::{BookingState, ChatReply, ChatState};
pub use services::booking_flow::{
    handle_confirmation, initialize_booking_state, next_question, summary, update_from_input,
};
pub use services::chat::{handle_user_message, initialize_chat_state};
