use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::evidence::dtos::{
    check_file_count, check_file_name, check_file_size, check_mime_type, EvidenceResponseDto,
    UploadEvidenceDto,
};
use crate::features::evidence::models::UploadedFile;
use crate::features::evidence::services::EvidenceService;
use crate::shared::constants::EVIDENCE_FIELD_NAMES;
use crate::shared::types::ApiResponse;

/// Attach evidence files to an incident
///
/// Accepts multipart/form-data with up to 5 files under `evidencias`
/// (or `files`). The reporter, operators and admins may attach evidence.
#[utoipa::path(
    post,
    path = "/api/incidents/{id}/evidence",
    tag = "evidence",
    params(
        ("id" = i64, Path, description = "Incident ID")
    ),
    request_body(
        content = UploadEvidenceDto,
        content_type = "multipart/form-data",
        description = "Evidence files (image/jpeg, image/png, image/gif, video/mp4)",
    ),
    responses(
        (status = 201, description = "Evidence attached", body = ApiResponse<Vec<EvidenceResponseDto>>),
        (status = 400, description = "Missing, oversize or disallowed files"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the reporter and not staff"),
        (status = 404, description = "Incident not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_evidence(
    user: AuthenticatedUser,
    State(service): State<Arc<EvidenceService>>,
    Path(incident_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<EvidenceResponseDto>>>), AppError> {
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if !EVIDENCE_FIELD_NAMES.contains(&field_name.as_str()) {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        check_file_count(files.len() + 1)?;

        let mime_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());

        // Reject before buffering the payload
        check_file_name(&file_name)?;
        check_mime_type(&file_name, &mime_type)?;

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;
        check_file_size(&file_name, data.len())?;

        files.push(UploadedFile {
            file_name,
            mime_type,
            data: data.to_vec(),
        });
    }

    let created = service
        .attach(incident_id, files, &user, Utc::now())
        .await?;
    let count = created.len();
    let dtos: Vec<EvidenceResponseDto> = created.into_iter().map(Into::into).collect();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(dtos),
            Some(format!("{} evidence file(s) uploaded", count)),
        )),
    ))
}

/// List the evidence attached to an incident, oldest first
#[utoipa::path(
    get,
    path = "/api/incidents/{id}/evidence",
    tag = "evidence",
    params(
        ("id" = i64, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "Evidence list", body = ApiResponse<Vec<EvidenceResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner and not staff"),
        (status = 404, description = "Incident not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_evidence(
    user: AuthenticatedUser,
    State(service): State<Arc<EvidenceService>>,
    Path(incident_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<EvidenceResponseDto>>>, AppError> {
    let evidence = service.list(incident_id, &user).await?;
    let dtos: Vec<EvidenceResponseDto> = evidence.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}
