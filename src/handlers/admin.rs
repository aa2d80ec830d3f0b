use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingRecord;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

fn check_auth(headers: &HeaderMap, expected_password: &str) -> Result<(), AppError> {
    if expected_password.is_empty() {
        return Err(AppError::Config("ADMIN_PASSWORD is empty".to_string()));
    }

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if token != expected_password {
        tracing::warn!("rejected admin request with bad credentials");
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    name: String,
    email: String,
    phone: String,
    room_type: String,
    check_in: String,
    check_out: String,
    nights: i64,
    summary: String,
    created_at: String,
}

impl From<BookingRecord> for BookingResponse {
    fn from(b: BookingRecord) -> Self {
        Self {
            nights: b.nights(),
            id: b.id,
            name: b.name,
            email: b.email,
            phone: b.phone,
            room_type: b.room_type,
            check_in: b.check_in.format("%Y-%m-%d").to_string(),
            check_out: b.check_out.format("%Y-%m-%d").to_string(),
            summary: b.summary,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// GET /api/admin/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_password)?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let bookings = {
        let db = state.db()?;
        queries::get_all_bookings(&db, limit)?
    };

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// GET /api/admin/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    check_auth(&headers, &state.config.admin_password)?;

    let booking = {
        let db = state.db()?;
        queries::get_booking(&db, &id)?
    };

    booking
        .map(|b| Json(BookingResponse::from(b)))
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}
