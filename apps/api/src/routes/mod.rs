pub mod health;

#[cfg(test)]
mod tests;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::applications::handlers as applications;
use crate::dashboard::handlers as dashboard;
use crate::listings::handlers as listings;
use crate::state::AppState;

/// Room for multipart framing and text fields around the largest allowed file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/sign-up", post(accounts::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(accounts::handle_sign_in))
        .route("/api/v1/auth/sign-in/link", post(accounts::handle_send_link))
        .route(
            "/api/v1/auth/sign-in/link/complete",
            post(accounts::handle_complete_link),
        )
        .route(
            "/api/v1/auth/sign-in/federated",
            post(accounts::handle_federated),
        )
        .route("/api/v1/auth/sign-out", post(accounts::handle_sign_out))
        .route("/api/v1/auth/session", get(accounts::handle_session))
        // Profile
        .route(
            "/api/v1/profile",
            get(accounts::handle_get_profile).put(accounts::handle_update_profile),
        )
        .route(
            "/api/v1/profile/avatar",
            post(accounts::handle_upload_avatar),
        )
        // Listings
        .route(
            "/api/v1/listings",
            get(listings::handle_search).post(listings::handle_create),
        )
        .route(
            "/api/v1/listings/highlights",
            get(listings::handle_highlights),
        )
        .route(
            "/api/v1/listings/:id",
            get(listings::handle_get).put(listings::handle_update),
        )
        .route(
            "/api/v1/listings/:id/status",
            patch(listings::handle_set_status),
        )
        .route(
            "/api/v1/listings/:id/applications",
            get(listings::handle_list_applications).post(listings::handle_apply),
        )
        .route("/api/v1/me/listings", get(listings::handle_my_listings))
        // Applications
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_set_status),
        )
        .route(
            "/api/v1/applications/:id",
            delete(applications::handle_withdraw),
        )
        .route(
            "/api/v1/me/applications",
            get(applications::handle_my_applications),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
