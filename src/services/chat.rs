use crate::models::{BookingStatus, ChatMode, ChatReply, ChatState};
use crate::services::booking_flow;

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const GREETING_REPLIES: &[&str] = &[
    "Hello and welcome! It's a pleasure to have you with us. How may I assist you today? You can ask about the hotel or say 'book a room'.",
    "Greetings, and welcome to our hotel! I'd be delighted to assist with a reservation or answer any questions about your stay.",
    "Welcome! Our team is at your service. Would you like to book a room, or is there something about the hotel I can help with?",
];

const EXIT_WORDS: &[&str] = &["back", "exit"];

const BOOKING_PHRASES: &[&str] = &[
    "book a room",
    "book room",
    "reserve a room",
    "make a reservation",
    "make a booking",
    "want to book",
    "like to book",
];

/// One entry of the dispatch table. Rules are tried in order; the first whose
/// `matches` returns true produces the reply.
struct Rule {
    name: &'static str,
    matches: fn(&ChatState, &str) -> bool,
    respond: fn(&mut ChatState, &str) -> String,
}

const RULES: &[Rule] = &[
    Rule {
        name: "greeting",
        matches: is_greeting,
        respond: greet,
    },
    Rule {
        name: "exit_booking",
        matches: is_exit_while_booking,
        respond: exit_booking,
    },
    Rule {
        name: "booking_intent",
        matches: is_booking_intent,
        respond: start_booking,
    },
    Rule {
        name: "collect_field",
        matches: is_collecting,
        respond: collect_field,
    },
    Rule {
        name: "confirmation",
        matches: is_confirming,
        respond: confirm_booking,
    },
];

pub fn initialize_chat_state() -> ChatState {
    ChatState {
        messages: Vec::new(),
        mode: ChatMode::Idle,
        booking: None,
        confirmed: None,
    }
}

/// Routes one guest message. Returns [`ChatReply::Fallback`] when no rule
/// applies; in that case only the guest's message is recorded and the caller is
/// expected to record whatever reply it produces.
pub fn handle_user_message(chat: &mut ChatState, text: &str) -> ChatReply {
    chat.push_user(text);

    let Some(rule) = RULES.iter().find(|rule| (rule.matches)(chat, text)) else {
        tracing::debug!(mode = chat.mode.as_str(), "message not handled by dispatcher");
        return ChatReply::Fallback;
    };

    let reply = (rule.respond)(chat, text);
    chat.push_assistant(&reply);

    tracing::info!(rule = rule.name, mode = chat.mode.as_str(), "chat message handled");
    ChatReply::Answered(reply)
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ── Predicates ──

fn is_greeting(_chat: &ChatState, text: &str) -> bool {
    let text = normalize(text);
    let text = text.strip_suffix(" there").unwrap_or(&text);
    GREETINGS.contains(&text)
}

fn is_exit_while_booking(chat: &ChatState, text: &str) -> bool {
    chat.mode == ChatMode::Booking && EXIT_WORDS.contains(&normalize(text).as_str())
}

fn is_booking_intent(chat: &ChatState, text: &str) -> bool {
    let text = text.to_lowercase();
    chat.mode == ChatMode::Idle && BOOKING_PHRASES.iter().any(|p| text.contains(p))
}

fn is_collecting(chat: &ChatState, _text: &str) -> bool {
    chat.mode == ChatMode::Booking
        && chat
            .booking
            .as_ref()
            .is_some_and(|b| b.status == BookingStatus::Collecting)
}

fn is_confirming(chat: &ChatState, _text: &str) -> bool {
    chat.mode == ChatMode::Confirming
}

// ── Handlers ──

fn greet(chat: &mut ChatState, _text: &str) -> String {
    let idx = chat.messages.len() / 2 % GREETING_REPLIES.len();
    GREETING_REPLIES[idx].to_string()
}

fn exit_booking(chat: &mut ChatState, _text: &str) -> String {
    chat.mode = ChatMode::Idle;
    chat.booking = None;
    "You have exited the booking process. Just say 'book a room' whenever you'd like to start again."
        .to_string()
}

fn start_booking(chat: &mut ChatState, _text: &str) -> String {
    let mut booking = booking_flow::initialize_booking_state();
    let question = booking_flow::next_question(&mut booking);
    chat.mode = ChatMode::Booking;
    chat.booking = Some(booking);
    format!("I'd be delighted to help you book a room. You can type 'back' at any time to exit.\n\n{question}")
}

fn collect_field(chat: &mut ChatState, text: &str) -> String {
    let Some(booking) = chat.booking.as_mut() else {
        chat.mode = ChatMode::Idle;
        return "Let's start again. Say 'book a room' to begin a new booking.".to_string();
    };

    match booking_flow::update_from_input(booking, text) {
        Ok(()) => {
            if booking.status == BookingStatus::AwaitingConfirmation {
                chat.mode = ChatMode::Confirming;
            }
            booking_flow::next_question(booking)
        }
        Err(e) => format!("{e}\n\n{}", booking_flow::next_question(booking)),
    }
}

fn confirm_booking(chat: &mut ChatState, text: &str) -> String {
    let Some(booking) = chat.booking.as_mut() else {
        chat.mode = ChatMode::Idle;
        return "There is no booking waiting for confirmation. Say 'book a room' to begin.".to_string();
    };

    match booking_flow::handle_confirmation(booking, text) {
        Ok(BookingStatus::Confirmed) => {
            let details = booking_flow::summary(booking);
            chat.mode = ChatMode::Idle;
            chat.confirmed = chat.booking.take();
            format!("Your booking is confirmed! We look forward to welcoming you.\n\n{details}")
        }
        Ok(_) => {
            chat.mode = ChatMode::Idle;
            chat.booking = None;
            "Your booking has been cancelled. If you change your mind, just say 'book a room'."
                .to_string()
        }
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingField;

    const HOSPITALITY_WORDS: &[&str] = &[
        "welcome",
        "greetings",
        "pleasure",
        "hospitality",
        "delighted",
        "assist",
        "service",
    ];

    fn answered(reply: ChatReply) -> String {
        match reply {
            ChatReply::Answered(text) => text,
            ChatReply::Fallback => panic!("expected an answer, got fallback"),
        }
    }

    #[test]
    fn test_greetings_use_hospitality_words() {
        for greeting in GREETINGS {
            let mut chat = initialize_chat_state();
            let reply = answered(handle_user_message(&mut chat, greeting)).to_lowercase();
            assert!(
                HOSPITALITY_WORDS.iter().any(|w| reply.contains(w)),
                "no hospitality keyword for {greeting}: {reply}"
            );
            assert_eq!(chat.mode, ChatMode::Idle);
        }
    }

    #[test]
    fn test_greeting_variants() {
        let mut chat = initialize_chat_state();
        for text in ["Hello!", "  HI there ", "Good   Morning."] {
            assert!(matches!(handle_user_message(&mut chat, text), ChatReply::Answered(_)));
        }
        assert_eq!(handle_user_message(&mut chat, "hello, what time is breakfast?"), ChatReply::Fallback);
    }

    #[test]
    fn test_greeting_during_booking_keeps_mode() {
        let mut chat = initialize_chat_state();
        handle_user_message(&mut chat, "I want to book a room");
        handle_user_message(&mut chat, "hey");
        assert_eq!(chat.mode, ChatMode::Booking);
        assert_eq!(
            chat.booking.as_ref().and_then(|b| b.current_field),
            Some(BookingField::Name)
        );
    }

    #[test]
    fn test_full_booking_through_chat() {
        let mut chat = initialize_chat_state();
        let first = answered(handle_user_message(&mut chat, "I want to book a room"));
        assert!(first.to_lowercase().contains("name"));
        assert_eq!(chat.mode, ChatMode::Booking);

        for input in ["Rahul Sharma", "rahul@gmail.com", "9876543210", "Deluxe", "2026-01-22"] {
            answered(handle_user_message(&mut chat, input));
            assert_eq!(chat.mode, ChatMode::Booking);
        }

        let summary = answered(handle_user_message(&mut chat, "2026-01-24"));
        assert_eq!(chat.mode, ChatMode::Confirming);
        assert!(summary.contains("deluxe"));
        assert!(summary.contains("confirm"));

        let done = answered(handle_user_message(&mut chat, "confirm"));
        assert!(done.contains("confirmed"));
        assert_eq!(chat.mode, ChatMode::Idle);
        assert!(chat.booking.is_none());

        let confirmed = chat.take_confirmed().unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.fields.name.as_deref(), Some("Rahul Sharma"));
        assert!(chat.take_confirmed().is_none());
    }

    #[test]
    fn test_invalid_input_reprompts_same_field() {
        let mut chat = initialize_chat_state();
        handle_user_message(&mut chat, "book a room");
        handle_user_message(&mut chat, "John Smith");

        let reply = answered(handle_user_message(&mut chat, "user@domain"));
        assert!(reply.contains("valid email"));
        assert!(reply.to_lowercase().contains("email address"));
        assert_eq!(
            chat.booking.as_ref().and_then(|b| b.current_field),
            Some(BookingField::Email)
        );
    }

    #[test]
    fn test_back_exits_and_next_booking_starts_fresh() {
        let mut chat = initialize_chat_state();
        handle_user_message(&mut chat, "I want to book a room");
        handle_user_message(&mut chat, "Rahul Sharma");

        let reply = answered(handle_user_message(&mut chat, "Back"));
        assert!(reply.to_lowercase().contains("exit"));
        assert_eq!(chat.mode, ChatMode::Idle);
        assert!(chat.booking.is_none());

        let again = answered(handle_user_message(&mut chat, "book a room please"));
        assert!(again.to_lowercase().contains("name"));
        let booking = chat.booking.as_ref().unwrap();
        assert!(booking.fields.name.is_none());
        assert_eq!(booking.current_field, Some(BookingField::Name));
    }

    #[test]
    fn test_back_while_idle_falls_back() {
        let mut chat = initialize_chat_state();
        assert_eq!(handle_user_message(&mut chat, "back"), ChatReply::Fallback);
    }

    #[test]
    fn test_cancel_and_unrecognized_confirmation() {
        let mut chat = initialize_chat_state();
        handle_user_message(&mut chat, "book a room");
        for input in ["Ann Lee", "ann@example.com", "5551234", "suite", "2026-03-01", "2026-03-04"] {
            handle_user_message(&mut chat, input);
        }
        assert_eq!(chat.mode, ChatMode::Confirming);

        let reprompt = answered(handle_user_message(&mut chat, "what?"));
        assert!(reprompt.contains("'confirm'"));
        assert_eq!(chat.mode, ChatMode::Confirming);

        let cancelled = answered(handle_user_message(&mut chat, "cancel"));
        assert!(cancelled.contains("cancelled"));
        assert_eq!(chat.mode, ChatMode::Idle);
        assert!(chat.booking.is_none());
        assert!(chat.take_confirmed().is_none());
    }

    #[test]
    fn test_unrelated_question_falls_back() {
        let mut chat = initialize_chat_state();
        assert_eq!(
            handle_user_message(&mut chat, "Is there a swimming pool?"),
            ChatReply::Fallback
        );
        assert_eq!(chat.mode, ChatMode::Idle);
    }

    #[test]
    fn test_transcript_records_every_message() {
        let mut chat = initialize_chat_state();
        handle_user_message(&mut chat, "hello");
        handle_user_message(&mut chat, "Do you have parking?");
        handle_user_message(&mut chat, "book a room");

        let roles: Vec<&str> = chat.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["user", "assistant", "user", "user", "assistant"]);
        assert_eq!(chat.messages[2].content, "Do you have parking?");
    }
}
