//! Container endpoints. All admin-gated; containers are staff inventory.

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
use crate::db::{Container, CONTAINER_STATUSES, TRANSPORT_MEDIUMS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateContainerRequest {
    pub model: String,
    pub medium: String,
    pub location: Option<String>,
    #[serde(default)]
    pub ports: Vec<String>,
    pub description: Option<String>,
}

pub async fn create_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateContainerRequest>,
) -> Result<(StatusCode, Json<Container>), ApiError> {
    if request.model.is_empty() {
        return Err(ApiError::validation("Model is required"));
    }
    validate_one_of(&request.medium, &TRANSPORT_MEDIUMS, "medium of transport")
        .map_err(ApiError::validation)?;

    let container_id = ids::mint(&state.db, EntityKind::Container).await?;

    let container = Container {
        id: Uuid::new_v4().to_string(),
        container_id,
        model: request.model,
        status: "Available".to_string(),
        medium: request.medium,
        location: request.location,
        ports: serde_json::to_string(&request.ports).ok(),
        description: request.description,
        created_at: String::new(),
        updated_at: String::new(),
    };

    sqlx::query(
        "INSERT INTO containers (id, container_id, model, status, medium, location, ports, description)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&container.id)
    .bind(&container.container_id)
    .bind(&container.model)
    .bind(&container.status)
    .bind(&container.medium)
    .bind(&container.location)
    .bind(&container.ports)
    .bind(&container.description)
    .execute(&state.db)
    .await?;

    tracing::info!(container_id = %container.container_id, "Container created");

    Ok((StatusCode::CREATED, Json(container)))
}

pub async fn list_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Container>>, ApiError> {
    let containers: Vec<Container> =
        sqlx::query_as("SELECT * FROM containers ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(containers))
}

pub async fn get_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Container>, ApiError> {
    let container: Option<Container> = sqlx::query_as("SELECT * FROM containers WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    container
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Container not found"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateContainerRequest {
    pub status: Option<String>,
    pub location: Option<String>,
}

pub async fn update_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateContainerRequest>,
) -> Result<Json<Container>, ApiError> {
    if let Some(status) = &request.status {
        validate_one_of(status, &CONTAINER_STATUSES, "status").map_err(ApiError::validation)?;
    }

    let mut container: Container = sqlx::query_as("SELECT * FROM containers WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Container not found"))?;

    if let Some(status) = request.status {
        container.status = status;
    }
    if let Some(location) = request.location {
        container.location = Some(location);
    }

    sqlx::query(
        "UPDATE containers SET status = ?, location = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&container.status)
    .bind(&container.location)
    .bind(&container.id)
    .execute(&state.db)
    .await?;

    Ok(Json(container))
}

pub async fn delete_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = sqlx::query("DELETE FROM containers WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Container not found"));
    }

    Ok(Json(MessageResponse {
        message: "Container deleted successfully".to_string(),
    }))
}
