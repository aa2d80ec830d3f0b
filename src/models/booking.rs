use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six pieces of information collected for a booking, in the order they are asked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    Name,
    Email,
    Phone,
    RoomType,
    CheckIn,
    CheckOut,
}

impl BookingField {
    pub const ORDER: [BookingField; 6] = [
        BookingField::Name,
        BookingField::Email,
        BookingField::Phone,
        BookingField::RoomType,
        BookingField::CheckIn,
        BookingField::CheckOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
            BookingField::RoomType => "room_type",
            BookingField::CheckIn => "check_in",
            BookingField::CheckOut => "check_out",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingField::Name => "Name",
            BookingField::Email => "Email",
            BookingField::Phone => "Phone",
            BookingField::RoomType => "Room type",
            BookingField::CheckIn => "Check-in",
            BookingField::CheckOut => "Check-out",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            BookingField::Name => "May I have your full name, please?",
            BookingField::Email => "What email address should we send the confirmation to?",
            BookingField::Phone => "What phone number can we reach you on?",
            BookingField::RoomType => "Which room type would you like: Standard, Deluxe or Suite?",
            BookingField::CheckIn => "What is your check-in date? (YYYY-MM-DD)",
            BookingField::CheckOut => "What is your check-out date? (YYYY-MM-DD)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Collecting,
    AwaitingConfirmation,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Collecting => "collecting",
            BookingStatus::AwaitingConfirmation => "awaiting_confirmation",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub room_type: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

impl BookingFields {
    pub fn get(&self, field: BookingField) -> Option<&str> {
        match field {
            BookingField::Name => self.name.as_deref(),
            BookingField::Email => self.email.as_deref(),
            BookingField::Phone => self.phone.as_deref(),
            BookingField::RoomType => self.room_type.as_deref(),
            BookingField::CheckIn => self.check_in.as_deref(),
            BookingField::CheckOut => self.check_out.as_deref(),
        }
    }

    pub(crate) fn set(&mut self, field: BookingField, value: String) {
        let slot = match field {
            BookingField::Name => &mut self.name,
            BookingField::Email => &mut self.email,
            BookingField::Phone => &mut self.phone,
            BookingField::RoomType => &mut self.room_type,
            BookingField::CheckIn => &mut self.check_in,
            BookingField::CheckOut => &mut self.check_out,
        };
        *slot = Some(value);
    }

    pub fn first_missing(&self) -> Option<BookingField> {
        BookingField::ORDER
            .into_iter()
            .find(|f| self.get(*f).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}

/// One booking in progress. Only mutated through `services::booking_flow`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingState {
    pub fields: BookingFields,
    pub current_field: Option<BookingField>,
    pub status: BookingStatus,
}

/// A confirmed booking as it is written to and read from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub summary: String,
    pub created_at: NaiveDateTime,
}

impl BookingRecord {
    /// Builds a record from a confirmed booking. Anything else yields `None`.
    pub fn from_confirmed(state: &BookingState, summary: String) -> Option<Self> {
        if state.status != BookingStatus::Confirmed {
            return None;
        }
        let f = &state.fields;
        let check_in = NaiveDate::parse_from_str(f.check_in.as_deref()?, "%Y-%m-%d").ok()?;
        let check_out = NaiveDate::parse_from_str(f.check_out.as_deref()?, "%Y-%m-%d").ok()?;

        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: f.name.clone()?,
            email: f.email.clone()?,
            phone: f.phone.clone()?,
            room_type: f.room_type.clone()?,
            check_in,
            check_out,
            summary,
            created_at: Utc::now().naive_utc(),
        })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}
