//! Payment model.
//!
//! `payment_date` is stamped by the status-update handler when a payment
//! transitions to `paid` - an explicit step, not a persistence hook.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: f64,
    pub status: String,
    pub method: Option<String>,
    pub transaction_id: Option<String>,
    pub payment_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub const PAYMENT_STATUSES: [&str; 4] = ["unpaid", "paid", "failed", "cancelled"];

pub const PAYMENT_METHODS: [&str; 3] = ["cash", "cod", "online"];
