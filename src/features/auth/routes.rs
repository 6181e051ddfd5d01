use crate::features::auth::handlers::{self, AuthState};
use crate::features::auth::services::AuthService;
use crate::features::users::services::IdentityService;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(identity_service: Arc<IdentityService>, auth_service: Arc<AuthService>) -> Router {
    let state = AuthState {
        identity_service,
        auth_service,
    };

    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .with_state(state)
}
