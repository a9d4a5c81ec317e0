//! Client registration, CRUD and the OTP login flow.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::AuthPrincipal;
use crate::api::error::ApiError;
use crate::api::validation::{validate_email, validate_name, validate_phone};
use crate::crypto::issue_token;
use crate::db::ids::{self, EntityKind};
use crate::db::{parse_forms, serialize_forms, BookingForm, Client, ClientResponse, ClientRole};
use crate::otp;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct ClientEnvelope {
    pub data: ClientResponse,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Register a client (customer or supplier).
///
/// An already-known supplier is answered 200 with the existing record; an
/// already-known customer is told to log in instead.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateClientRequest>,
) -> Result<Response, ApiError> {
    validate_name(&request.name).map_err(ApiError::validation)?;
    validate_email(&request.email).map_err(ApiError::validation)?;
    validate_phone(&request.phone).map_err(ApiError::validation)?;
    let role = ClientRole::from_str(&request.role).map_err(ApiError::validation)?;

    if let Some(existing) =
        Client::find_duplicate(&state.db, &request.email, &request.phone, role).await?
    {
        return match role {
            ClientRole::Supplier => Ok((
                StatusCode::OK,
                Json(ClientEnvelope {
                    data: ClientResponse::from(existing),
                    message: "Supplier already exists".to_string(),
                    token: None,
                }),
            )
                .into_response()),
            ClientRole::Customer => {
                Err(ApiError::bad_request("You are already registered, please login"))
            }
        };
    }

    // Mint the public identifier before the first write
    let user_id = ids::mint(&state.db, EntityKind::Client(role)).await?;

    let client = Client {
        id: Uuid::new_v4().to_string(),
        user_id,
        name: request.name.trim().to_string(),
        email: request.email,
        phone: request.phone,
        address: request.address,
        role: role.to_string(),
        otp: None,
        otp_expiry: None,
        forms: None,
        created_at: String::new(),
        updated_at: String::new(),
    };
    client.insert(&state.db).await?;

    tracing::info!(client_id = %client.id, user_id = %client.user_id, role = %client.role, "Client created");

    let token = issue_token(
        &client.id,
        &state.config.auth.token_secret,
        state.config.auth.token_lifetime_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ClientEnvelope {
            data: ClientResponse::from(client),
            message: "Client created successfully".to_string(),
            token: Some(token),
        }),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub role: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListClientsResponse {
    pub data: Vec<ClientResponse>,
    pub total_clients: i64,
    pub message: String,
}

/// List clients, optionally filtered by role, newest first.
pub async fn get_all_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListClientsQuery>,
) -> Result<Json<ListClientsResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (clients, total): (Vec<Client>, i64) = match &query.role {
        Some(role) => {
            let clients = sqlx::query_as(
                "SELECT * FROM clients WHERE role = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.db)
            .await?;
            let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE role = ?")
                .bind(role)
                .fetch_one(&state.db)
                .await?;
            (clients, total)
        }
        None => {
            let clients =
                sqlx::query_as("SELECT * FROM clients ORDER BY created_at DESC LIMIT ? OFFSET ?")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&state.db)
                    .await?;
            let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
                .fetch_one(&state.db)
                .await?;
            (clients, total)
        }
    };

    Ok(Json(ListClientsResponse {
        data: clients.into_iter().map(ClientResponse::from).collect(),
        total_clients: total,
        message: "Clients fetched successfully".to_string(),
    }))
}

/// Admin read of a single client.
pub async fn get_client_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClientEnvelope>, ApiError> {
    let client = Client::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    Ok(Json(ClientEnvelope {
        data: ClientResponse::from(client),
        message: "Client found successfully".to_string(),
        token: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Self-service profile update; the principal is the client itself.
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientEnvelope>, ApiError> {
    if let Some(name) = &request.name {
        validate_name(name).map_err(ApiError::validation)?;
    }
    if let Some(email) = &request.email {
        validate_email(email).map_err(ApiError::validation)?;
    }
    if let Some(phone) = &request.phone {
        validate_phone(phone).map_err(ApiError::validation)?;
    }

    let mut client = Client::find_by_id(&state.db, &principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    if let Some(name) = request.name {
        client.name = name.trim().to_string();
    }
    if let Some(email) = request.email {
        client.email = email;
    }
    if let Some(phone) = request.phone {
        client.phone = phone;
    }
    if let Some(address) = request.address {
        client.address = address;
    }

    client.save(&state.db).await?;

    Ok(Json(ClientEnvelope {
        data: ClientResponse::from(client),
        message: "Client updated successfully".to_string(),
        token: None,
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Admin delete.
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Client::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Client not found"));
    }

    tracing::info!(client_id = %id, "Client deleted");

    Ok(Json(MessageResponse {
        message: "Client deleted successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddFormRequest {
    pub booking_id: String,
    pub form_link: String,
}

/// Attach a booking form link to the calling client.
pub async fn add_client_form(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(request): Json<AddFormRequest>,
) -> Result<(StatusCode, Json<ClientEnvelope>), ApiError> {
    if request.booking_id.is_empty() || request.form_link.is_empty() {
        return Err(ApiError::bad_request("Booking ID and Form Link are required"));
    }

    let mut client = Client::find_by_id(&state.db, &principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    let mut forms = parse_forms(client.forms.as_deref());
    forms.push(BookingForm {
        booking_id: request.booking_id,
        link: request.form_link,
    });
    client.forms = serialize_forms(&forms);

    client.save(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ClientEnvelope {
            data: ClientResponse::from(client),
            message: "Form added successfully".to_string(),
            token: None,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct GenerateOtpRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateOtpResponse {
    /// Present only when `otp.echo_code` is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub message: String,
    pub redirect_to: String,
}

/// Start the OTP login flow for a customer phone number.
pub async fn generate_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateOtpRequest>,
) -> Result<Json<GenerateOtpResponse>, ApiError> {
    validate_phone(&request.phone).map_err(ApiError::validation)?;

    let (code, _expiry) = otp::generate(&state.db, &request.phone).await?;

    // Delivery failure is logged, not surfaced: the code is stored and a
    // retry of generate-otp issues a fresh one.
    let client = Client::find_by_phone(&state.db, &request.phone).await?;
    if let Some(client) = client {
        if let Err(e) = state
            .otp_notifier
            .deliver(&client.phone, &client.email, &code)
            .await
        {
            tracing::warn!(phone = %client.phone, error = %e, "OTP delivery failed");
        }
    }

    let echoed = state.config.otp.echo_code.then_some(code);

    Ok(Json(GenerateOtpResponse {
        data: echoed,
        message: "OTP sent successfully".to_string(),
        redirect_to: format!("/otp?phone={}", request.phone),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub data: ClientResponse,
    pub token: String,
    pub message: String,
}

/// Complete the OTP login flow: consume the code, issue a session token.
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    let customer = otp::verify(&state.db, &request.phone, &request.code).await?;

    let token = issue_token(
        &customer.id,
        &state.config.auth.token_secret,
        state.config.auth.token_lifetime_hours,
    )?;

    Ok(Json(VerifyOtpResponse {
        data: ClientResponse::from(customer),
        token,
        message: "OTP verified successfully".to_string(),
    }))
}
