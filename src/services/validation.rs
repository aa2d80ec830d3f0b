//! Field validators for the booking flow.
//!
//! Every validator takes the guest's raw text and either returns the value to
//! store (trimmed, and normalised where the field has a canonical form) or a
//! [`ValidationError`] whose `Display` is the reason shown back to the guest.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub const ROOM_TYPES: [&str; 3] = ["standard", "deluxe", "suite"];

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_DIGITS: usize = 7;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}+(?: \p{L}+)*$").unwrap());

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

// ASCII digits only.
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Your name needs at least 2 letters. Please enter your full name.")]
    NameTooShort,

    #[error("Names can't contain numbers. Please enter your name using letters only.")]
    NameHasDigits,

    #[error("Please enter your name using letters and single spaces only (e.g. John Smith).")]
    NameInvalid,

    #[error("That doesn't look like a valid email address. Please use the form name@example.com.")]
    EmailInvalid,

    #[error("Please enter a phone number using digits (e.g. +1 555 123 4567).")]
    PhoneNoDigits,

    #[error("That phone number only has {digits} digits. Please enter at least 7.")]
    PhoneTooShort { digits: usize },

    #[error("Sorry, we don't offer '{0}' rooms. Please choose Standard, Deluxe or Suite.")]
    RoomTypeUnknown(String),

    #[error("Please enter the date in YYYY-MM-DD format (e.g. 2026-01-25).")]
    DateFormat,

    #[error("{0} is not a valid calendar date. Please check the month and day.")]
    DateOutOfRange(String),

    #[error("Check-out must be after your check-in date of {check_in}. Please enter a later date.")]
    CheckOutNotAfterCheckIn { check_in: String },
}

pub fn validate_name(input: &str) -> Result<String, ValidationError> {
    let name = input.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    if !NAME_RE.is_match(name) {
        if name.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NameHasDigits);
        }
        return Err(ValidationError::NameInvalid);
    }
    Ok(name.to_string())
}

pub fn validate_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(email.to_string())
}

pub fn validate_phone(input: &str) -> Result<String, ValidationError> {
    let phone = input.trim();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    match digits {
        0 => Err(ValidationError::PhoneNoDigits),
        n if n < MIN_PHONE_DIGITS => Err(ValidationError::PhoneTooShort { digits: n }),
        _ => Ok(phone.to_string()),
    }
}

/// Accepts a room type in any case and returns its canonical lowercase form.
pub fn validate_room_type(input: &str) -> Result<String, ValidationError> {
    let room = input.trim().to_lowercase();
    if ROOM_TYPES.contains(&room.as_str()) {
        Ok(room)
    } else {
        Err(ValidationError::RoomTypeUnknown(input.trim().to_string()))
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let date = input.trim();
    if !DATE_RE.is_match(date) {
        return Err(ValidationError::DateFormat);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::DateOutOfRange(date.to_string()))
}

pub fn validate_date(input: &str) -> Result<String, ValidationError> {
    parse_date(input).map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn validate_checkout_after_checkin(
    check_in: &str,
    check_out: &str,
) -> Result<(), ValidationError> {
    let start = parse_date(check_in)?;
    let end = parse_date(check_out)?;
    if end <= start {
        return Err(ValidationError::CheckOutNotAfterCheckIn {
            check_in: start.format("%Y-%m-%d").to_string(),
        });
    }
    Ok(())
}
