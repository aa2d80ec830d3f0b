pub mod booking;
pub mod chat;

pub use booking::{BookingField, BookingFields, BookingRecord, BookingState, BookingStatus};
pub use chat::{ChatMessage, ChatMode, ChatReply, ChatState};
