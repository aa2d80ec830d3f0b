use crate::models::{BookingField, BookingFields, BookingState, BookingStatus};
use crate::services::validation::{self, ValidationError};

pub const CONFIRMATION_PROMPT: &str =
    "Type 'confirm' to complete your booking or 'cancel' to discard it.";

const CONFIRM_WORDS: &[&str] = &["confirm", "yes"];
const CANCEL_WORDS: &[&str] = &["cancel", "no", "abort", "stop"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("This booking is no longer collecting details.")]
    NotCollecting,

    #[error("This booking is not waiting for confirmation.")]
    NotAwaitingConfirmation,

    #[error("Sorry, I didn't catch that. Please type 'confirm' to complete your booking or 'cancel' to discard it.")]
    UnrecognizedConfirmation,
}

pub fn initialize_booking_state() -> BookingState {
    BookingState {
        fields: BookingFields::default(),
        current_field: Some(BookingField::Name),
        status: BookingStatus::Collecting,
    }
}

/// Prompt for the first unfilled field, or the summary plus confirmation prompt
/// once every field is filled. Re-syncs `current_field` on the way.
pub fn next_question(state: &mut BookingState) -> String {
    if state.status.is_terminal() {
        return format!("{}\nStatus: {}", summary(state), state.status.as_str());
    }

    state.current_field = state.fields.first_missing();
    match state.current_field {
        Some(field) => field.prompt().to_string(),
        None => {
            state.status = BookingStatus::AwaitingConfirmation;
            format!("{}\n\n{CONFIRMATION_PROMPT}", summary(state))
        }
    }
}

/// Validates `text` against the field currently being asked for and, only if
/// it passes, stores it and moves on to the next unfilled field.
pub fn update_from_input(state: &mut BookingState, text: &str) -> Result<(), FlowError> {
    if state.status != BookingStatus::Collecting {
        return Err(FlowError::NotCollecting);
    }
    let Some(field) = state.current_field else {
        return Err(FlowError::NotCollecting);
    };

    let value = validate_field(field, text)?;
    if field == BookingField::CheckOut {
        if let Some(check_in) = state.fields.check_in.as_deref() {
            validation::validate_checkout_after_checkin(check_in, &value)?;
        }
    }

    state.fields.set(field, value);
    state.current_field = state.fields.first_missing();
    if state.current_field.is_none() {
        state.status = BookingStatus::AwaitingConfirmation;
    }

    tracing::debug!(
        field = field.as_str(),
        next = state.current_field.map(|f| f.as_str()),
        "booking field accepted"
    );
    Ok(())
}

fn validate_field(field: BookingField, text: &str) -> Result<String, ValidationError> {
    match field {
        BookingField::Name => validation::validate_name(text),
        BookingField::Email => validation::validate_email(text),
        BookingField::Phone => validation::validate_phone(text),
        BookingField::RoomType => validation::validate_room_type(text),
        BookingField::CheckIn | BookingField::CheckOut => validation::validate_date(text),
    }
}

pub fn summary(state: &BookingState) -> String {
    let mut lines = vec!["Booking summary:".to_string()];
    for field in BookingField::ORDER {
        let value = state.fields.get(field).unwrap_or("-");
        lines.push(format!("- {}: {value}", field.label()));
    }

    let nights = state
        .fields
        .check_in
        .as_deref()
        .zip(state.fields.check_out.as_deref())
        .and_then(|(ci, co)| {
            Some((validation::parse_date(co).ok()? - validation::parse_date(ci).ok()?).num_days())
        });
    if let Some(n) = nights {
        lines.push(format!("- Nights: {n}"));
    }

    lines.join("\n")
}

pub fn handle_confirmation(state: &mut BookingState, text: &str) -> Result<BookingStatus, FlowError> {
    if state.status != BookingStatus::AwaitingConfirmation {
        return Err(FlowError::NotAwaitingConfirmation);
    }

    let answer = text
        .trim()
        .trim_end_matches(['.', '!'])
        .to_lowercase();

    if CONFIRM_WORDS.contains(&answer.as_str()) {
        state.status = BookingStatus::Confirmed;
    } else if CANCEL_WORDS.contains(&answer.as_str()) {
        state.status = BookingStatus::Cancelled;
    } else {
        return Err(FlowError::UnrecognizedConfirmation);
    }

    tracing::info!(status = state.status.as_str(), "booking confirmation handled");
    Ok(state.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAHUL: [&str; 6] = [
        "Rahul Sharma",
        "rahul@gmail.com",
        "9876543210",
        "Deluxe",
        "2026-01-22",
        "2026-01-24",
    ];

    fn filled_state() -> BookingState {
        let mut state = initialize_booking_state();
        for input in RAHUL {
            update_from_input(&mut state, input).unwrap();
        }
        state
    }

    #[test]
    fn test_first_question_asks_for_name() {
        let mut state = initialize_booking_state();
        assert!(next_question(&mut state).to_lowercase().contains("name"));
        assert_eq!(state.current_field, Some(BookingField::Name));
        assert_eq!(state.status, BookingStatus::Collecting);
    }

    #[test]
    fn test_questions_follow_field_order() {
        let mut state = initialize_booking_state();
        let expected = ["name", "email", "phone", "room type", "check-in", "check-out"];
        for (input, keyword) in RAHUL.iter().zip(expected) {
            let question = next_question(&mut state).to_lowercase();
            assert!(question.contains(keyword), "{question} should mention {keyword}");
            update_from_input(&mut state, input).unwrap();
        }
    }

    #[test]
    fn test_full_sequence_reaches_confirmation() {
        let mut state = filled_state();
        assert_eq!(state.current_field, None);
        assert_eq!(state.status, BookingStatus::AwaitingConfirmation);
        assert_eq!(state.fields.room_type.as_deref(), Some("deluxe"));

        let text = summary(&state);
        for value in ["Rahul Sharma", "rahul@gmail.com", "9876543210", "deluxe", "2026-01-22", "2026-01-24"] {
            assert!(text.contains(value), "summary missing {value}");
        }
        assert!(text.contains("Nights: 2"));

        let question = next_question(&mut state);
        assert!(question.contains("Booking summary"));
        assert!(question.contains("confirm"));

        assert_eq!(handle_confirmation(&mut state, "confirm"), Ok(BookingStatus::Confirmed));
        assert_eq!(state.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_failure_leaves_state_untouched() {
        let mut state = initialize_booking_state();
        update_from_input(&mut state, "John Smith").unwrap();
        let before = state.clone();

        for bad in ["invalid", "user@", "@example.com"] {
            let err = update_from_input(&mut state, bad).unwrap_err();
            assert_eq!(err, FlowError::Invalid(ValidationError::EmailInvalid));
            assert_eq!(state, before);
        }

        update_from_input(&mut state, "john@example.com").unwrap();
        assert_eq!(state.fields.email.as_deref(), Some("john@example.com"));
        assert_eq!(state.current_field, Some(BookingField::Phone));
    }

    #[test]
    fn test_invalid_phone_inputs_rejected() {
        let mut state = initialize_booking_state();
        update_from_input(&mut state, "John Smith").unwrap();
        update_from_input(&mut state, "john@example.com").unwrap();
        for bad in ["123", "call me", "abcdefg"] {
            assert!(update_from_input(&mut state, bad).is_err());
            assert_eq!(state.current_field, Some(BookingField::Phone));
            assert!(state.fields.phone.is_none());
        }
    }

    #[test]
    fn test_checkout_must_follow_checkin() {
        let mut state = initialize_booking_state();
        for input in &RAHUL[..5] {
            update_from_input(&mut state, input).unwrap();
        }
        assert_eq!(state.current_field, Some(BookingField::CheckOut));

        for bad in ["2026-01-22", "2026-01-20"] {
            let err = update_from_input(&mut state, bad).unwrap_err();
            assert!(matches!(
                err,
                FlowError::Invalid(ValidationError::CheckOutNotAfterCheckIn { .. })
            ));
            assert!(state.fields.check_out.is_none());
        }

        update_from_input(&mut state, "2026-01-23").unwrap();
        assert_eq!(state.status, BookingStatus::AwaitingConfirmation);
    }

    #[test]
    fn test_confirmation_cancel_and_reprompt() {
        let mut state = filled_state();
        assert_eq!(
            handle_confirmation(&mut state, "maybe later"),
            Err(FlowError::UnrecognizedConfirmation)
        );
        assert_eq!(state.status, BookingStatus::AwaitingConfirmation);

        assert_eq!(handle_confirmation(&mut state, "No"), Ok(BookingStatus::Cancelled));
        assert!(state.status.is_terminal());
    }

    #[test]
    fn test_confirmation_is_case_insensitive() {
        let mut state = filled_state();
        assert_eq!(handle_confirmation(&mut state, " CONFIRM! "), Ok(BookingStatus::Confirmed));
    }

    #[test]
    fn test_terminal_state_is_immutable() {
        let mut state = filled_state();
        handle_confirmation(&mut state, "confirm").unwrap();
        let before = state.clone();

        assert_eq!(update_from_input(&mut state, "Jane Doe"), Err(FlowError::NotCollecting));
        assert_eq!(
            handle_confirmation(&mut state, "cancel"),
            Err(FlowError::NotAwaitingConfirmation)
        );
        next_question(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_confirmation_rejected_while_collecting() {
        let mut state = initialize_booking_state();
        assert_eq!(
            handle_confirmation(&mut state, "confirm"),
            Err(FlowError::NotAwaitingConfirmation)
        );
    }
}
