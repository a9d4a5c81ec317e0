//! Payment endpoints.
//!
//! Status transitions go through `update_payment_status`; moving to
//! `paid` stamps `payment_date` in the same statement.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::validate_one_of;
use crate::db::{Payment, PAYMENT_METHODS, PAYMENT_STATUSES};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub booking_id: String,
    pub amount: f64,
    pub method: Option<String>,
}

pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    if request.amount <= 0.0 {
        return Err(ApiError::validation("Amount must be greater than zero"));
    }
    if let Some(method) = &request.method {
        validate_one_of(method, &PAYMENT_METHODS, "payment method")
            .map_err(ApiError::validation)?;
    }

    // The referenced booking must exist before money is attached to it
    let booking: Option<(String,)> = sqlx::query_as("SELECT id FROM bookings WHERE id = ?")
        .bind(&request.booking_id)
        .fetch_optional(&state.db)
        .await?;
    if booking.is_none() {
        return Err(ApiError::bad_request("Booking not found"));
    }

    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        booking_id: request.booking_id,
        amount: request.amount,
        status: "unpaid".to_string(),
        method: request.method,
        transaction_id: None,
        payment_date: None,
        created_at: String::new(),
        updated_at: String::new(),
    };

    sqlx::query(
        "INSERT INTO payments (id, booking_id, amount, status, method) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payment.id)
    .bind(&payment.booking_id)
    .bind(payment.amount)
    .bind(&payment.status)
    .bind(&payment.method)
    .execute(&state.db)
    .await?;

    tracing::info!(payment_id = %payment.id, booking_id = %payment.booking_id, "Payment created");

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment: Option<Payment> = sqlx::query_as("SELECT * FROM payments WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    payment
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Payment not found"))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: String,
    pub transaction_id: Option<String>,
}

pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<Payment>, ApiError> {
    validate_one_of(&request.status, &PAYMENT_STATUSES, "status")
        .map_err(ApiError::validation)?;

    // Transitioning to paid stamps the payment date
    let updated = if request.status == "paid" {
        sqlx::query(
            "UPDATE payments SET status = ?, transaction_id = COALESCE(?, transaction_id),
             payment_date = datetime('now'), updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&request.status)
        .bind(&request.transaction_id)
        .bind(&id)
        .execute(&state.db)
        .await?
    } else {
        sqlx::query(
            "UPDATE payments SET status = ?, transaction_id = COALESCE(?, transaction_id),
             updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&request.status)
        .bind(&request.transaction_id)
        .bind(&id)
        .execute(&state.db)
        .await?
    };

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Payment not found"));
    }

    let payment: Payment = sqlx::query_as("SELECT * FROM payments WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(payment))
}
