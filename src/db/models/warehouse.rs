//! Warehouse model. Only the two warehouse authorities exist.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Warehouse {
    pub id: String,
    pub warehouse_id: String,
    pub location: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

pub const WAREHOUSE_NAMES: [&str; 2] = ["CWA", "BWA"];
