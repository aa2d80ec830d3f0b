use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::models::BookingRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str =
    "id, name, email, phone, room_type, check_in, check_out, summary, created_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &BookingRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, name, email, phone, room_type, check_in, check_out, summary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.phone,
            booking.room_type,
            booking.check_in.format(DATE_FORMAT).to_string(),
            booking.check_out.format(DATE_FORMAT).to_string(),
            booking.summary,
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Most recently confirmed first.
pub fn get_all_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<BookingRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, rowid DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<BookingRecord>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<BookingRecord> {
    let check_in: String = row.get(5)?;
    let check_out: String = row.get(6)?;
    let created_at: String = row.get(8)?;

    Ok(BookingRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        room_type: row.get(4)?,
        check_in: NaiveDate::parse_from_str(&check_in, DATE_FORMAT)?,
        check_out: NaiveDate::parse_from_str(&check_out, DATE_FORMAT)?,
        summary: row.get(7)?,
        created_at: NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)?,
    })
}
