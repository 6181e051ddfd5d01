use crate::features::users::handlers::profile_handler;
use crate::features::users::services::IdentityService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

/// Profile routes for the authenticated caller
pub fn routes(service: Arc<IdentityService>) -> Router {
    Router::new()
        .route(
            "/api/auth/profile",
            get(profile_handler::get_profile).put(profile_handler::update_profile),
        )
        .route(
            "/api/auth/change-password",
            put(profile_handler::change_password),
        )
        .with_state(service)
}
