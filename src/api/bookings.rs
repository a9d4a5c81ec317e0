//! Booking endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::clients::MessageResponse;
use crate::api::error::ApiError;
use crate::api::validation::validate_one_of;
use crate::db::ids::{self, EntityKind};
use crate::db::{Booking, BookingStatus, ContactInfo, BOOKING_KINDS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub sender: ContactInfo,
    pub receiver: ContactInfo,
    pub kind: String,
    pub location: String,
    pub supplier_id: Option<String>,
    pub container_id: Option<String>,
}

/// Create a booking; the public booking id is minted before the insert.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    validate_one_of(&request.kind, &BOOKING_KINDS, "booking type").map_err(ApiError::validation)?;
    if request.location.is_empty() {
        return Err(ApiError::validation("Location is required"));
    }

    let booking_id = ids::mint(&state.db, EntityKind::Booking).await?;

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        booking_id,
        sender: serde_json::to_string(&request.sender)
            .map_err(|e| ApiError::internal(e.to_string()))?,
        receiver: serde_json::to_string(&request.receiver)
            .map_err(|e| ApiError::internal(e.to_string()))?,
        kind: request.kind,
        status: BookingStatus::Processing.to_string(),
        supplier_status: "pending".to_string(),
        supplier_id: request.supplier_id,
        container_id: request.container_id,
        payment_id: None,
        location: request.location,
        created_at: String::new(),
        updated_at: String::new(),
    };

    sqlx::query(
        "INSERT INTO bookings (id, booking_id, sender, receiver, kind, status, supplier_status,
         supplier_id, container_id, location) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&booking.id)
    .bind(&booking.booking_id)
    .bind(&booking.sender)
    .bind(&booking.receiver)
    .bind(&booking.kind)
    .bind(&booking.status)
    .bind(&booking.supplier_status)
    .bind(&booking.supplier_id)
    .bind(&booking.container_id)
    .bind(&booking.location)
    .execute(&state.db)
    .await?;

    tracing::info!(booking_id = %booking.booking_id, "Booking created");

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings: Vec<Booking> =
        sqlx::query_as("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking: Option<Booking> = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    booking
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking not found"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

/// Admin status transition.
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, ApiError> {
    let status = BookingStatus::from_str(&request.status).map_err(ApiError::validation)?;

    let updated = sqlx::query(
        "UPDATE bookings SET status = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(status.to_string())
    .bind(&id)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking not found"));
    }

    let booking: Booking = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking not found"));
    }

    Ok(Json(MessageResponse {
        message: "Booking deleted successfully".to_string(),
    }))
}
