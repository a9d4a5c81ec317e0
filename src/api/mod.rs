pub mod auth;
mod bookings;
mod clients;
mod containers;
pub mod error;
mod payments;
mod validation;
mod warehouses;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes - registration and the two login flows
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/client/create", post(clients::create_client))
        .route("/client/generate-otp", post(clients::generate_otp))
        .route("/client/verify-otp", post(clients::verify_otp));

    // Authenticated routes - any principal with a valid token
    let authed_routes = Router::new()
        .route("/login-check", get(auth::login_check))
        .route("/client/update", put(clients::update_client))
        .route("/client/form/add", post(clients::add_client_form))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/payments", post(payments::create_payment))
        .route("/payments/:id", get(payments::get_payment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    // Profile mutation - authenticated, but the demo account is refused
    let profile_routes = Router::new()
        .route("/profile", put(auth::update_profile))
        .layer(middleware::from_fn(auth::reject_test_principal))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    // Admin routes - authenticate, then re-check the stored role
    let admin_routes = Router::new()
        .route("/admin-check", get(auth::admin_check))
        .route("/secret", get(auth::secret))
        .route("/all-users", get(auth::get_all_users))
        .route("/admin/update-role", put(auth::update_role))
        .route("/client/all", get(clients::get_all_clients))
        .route("/client/:id", get(clients::get_client_by_id))
        .route("/client/delete/:id", delete(clients::delete_client))
        .route("/bookings/:id/status", put(bookings::update_booking_status))
        .route("/bookings/delete/:id", delete(bookings::delete_booking))
        .route("/containers", post(containers::create_container))
        .route("/containers", get(containers::list_containers))
        .route("/containers/:id", get(containers::get_container))
        .route("/containers/:id", put(containers::update_container))
        .route("/containers/:id", delete(containers::delete_container))
        .route("/warehouses", post(warehouses::create_warehouse))
        .route("/warehouses", get(warehouses::list_warehouses))
        .route("/warehouses/:id", get(warehouses::get_warehouse))
        .route("/warehouses/:id", delete(warehouses::delete_warehouse))
        .route("/payments/:id/status", put(payments::update_payment_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authorize_admin,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    let api_routes = public_routes
        .merge(authed_routes)
        .merge(profile_routes)
        .merge(admin_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
