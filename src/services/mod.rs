pub mod ai;
pub mod booking_flow;
pub mod chat;
pub mod documents;
pub mod validation;
