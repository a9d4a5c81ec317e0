//! Warehouse endpoints. Admin-gated.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::clients::MessageResponse;
use crate::api::error::ApiError;
use crate::api::validation::validate_one_of;
use crate::db::ids::{self, EntityKind};
use crate::db::{Warehouse, WAREHOUSE_NAMES};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    pub location: String,
    pub name: String,
}

pub async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), ApiError> {
    if request.location.is_empty() {
        return Err(ApiError::validation("Location is required"));
    }
    validate_one_of(&request.name, &WAREHOUSE_NAMES, "warehouse name")
        .map_err(ApiError::validation)?;

    let warehouse_id = ids::mint(&state.db, EntityKind::Warehouse).await?;

    let warehouse = Warehouse {
        id: Uuid::new_v4().to_string(),
        warehouse_id,
        location: request.location,
        name: request.name,
        created_at: String::new(),
        updated_at: String::new(),
    };

    sqlx::query("INSERT INTO warehouses (id, warehouse_id, location, name) VALUES (?, ?, ?, ?)")
        .bind(&warehouse.id)
        .bind(&warehouse.warehouse_id)
        .bind(&warehouse.location)
        .bind(&warehouse.name)
        .execute(&state.db)
        .await?;

    tracing::info!(warehouse_id = %warehouse.warehouse_id, "Warehouse created");

    Ok((StatusCode::CREATED, Json(warehouse)))
}

pub async fn list_warehouses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Warehouse>>, ApiError> {
    let warehouses: Vec<Warehouse> =
        sqlx::query_as("SELECT * FROM warehouses ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(warehouses))
}

pub async fn get_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Warehouse>, ApiError> {
    let warehouse: Option<Warehouse> = sqlx::query_as("SELECT * FROM warehouses WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    warehouse
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Warehouse not found"))
}

pub async fn delete_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = sqlx::query("DELETE FROM warehouses WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Warehouse not found"));
    }

    Ok(Json(MessageResponse {
        message: "Warehouse deleted successfully".to_string(),
    }))
}
