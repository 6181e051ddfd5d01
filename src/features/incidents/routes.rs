use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::incidents::handlers;
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
///
/// All routes require the auth middleware to be applied by the caller
pub fn routes(service: Arc<IncidentService>) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            get(handlers::list_incidents).post(handlers::create_incident),
        )
        .route("/api/incidents/mine", get(handlers::list_my_incidents))
        .route("/api/incidents/stats/summary", get(handlers::get_stats))
        .route(
            "/api/incidents/stats/by-district/{district}",
            get(handlers::list_by_district),
        )
        .route("/api/incidents/{id}", get(handlers::get_incident))
        .route(
            "/api/incidents/{id}/status",
            patch(handlers::update_incident_status),
        )
        .with_state(service)
}
