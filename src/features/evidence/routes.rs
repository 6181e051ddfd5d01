use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::evidence::handlers::{list_evidence, upload_evidence};
use crate::features::evidence::services::EvidenceService;
use crate::shared::constants::{MAX_EVIDENCE_FILES, MAX_EVIDENCE_FILE_SIZE};

/// Create routes for the evidence feature
pub fn routes(evidence_service: Arc<EvidenceService>) -> Router {
    Router::new()
        .route(
            "/api/incidents/{id}/evidence",
            // Full batch plus a buffer for multipart overhead
            post(upload_evidence)
                .layer(DefaultBodyLimit::max(
                    MAX_EVIDENCE_FILES * MAX_EVIDENCE_FILE_SIZE + 1024 * 1024,
                ))
                .get(list_evidence),
        )
        .with_state(evidence_service)
}
