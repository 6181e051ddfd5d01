use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::incidents::dtos::{
    CreateIncidentDto, IncidentQueryParams, IncidentResponseDto, IncidentStatDto,
    UpdateIncidentStatusDto,
};
use crate::features::incidents::services::IncidentService;
use crate::shared::types::ApiResponse;

/// File a new incident
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body = CreateIncidentDto,
    responses(
        (status = 201, description = "Incident created", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User pending validation")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn create_incident(
    user: AuthenticatedUser,
    State(service): State<Arc<IncidentService>>,
    AppJson(dto): AppJson<CreateIncidentDto>,
) -> Result<(StatusCode, Json<ApiResponse<IncidentResponseDto>>)> {
    dto.validate()?;

    let incident = service.create(&user, dto.into(), Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(incident.into()),
            Some("Incident created successfully".to_string()),
        )),
    ))
}

/// List the caller's own incidents, newest first
#[utoipa::path(
    get,
    path = "/api/incidents/mine",
    responses(
        (status = 200, description = "Caller's incidents", body = ApiResponse<Vec<IncidentResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn list_my_incidents(
    user: AuthenticatedUser,
    State(service): State<Arc<IncidentService>>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    let incidents = service.list_own(&user).await?;
    let dtos: Vec<IncidentResponseDto> = incidents.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Get one incident with its evidence
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    params(
        ("id" = i64, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "Incident found", body = ApiResponse<IncidentResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner and not staff"),
        (status = 404, description = "Incident not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn get_incident(
    user: AuthenticatedUser,
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = service.get_by_id(id, &user).await?;
    Ok(Json(ApiResponse::success(Some(incident.into()), None)))
}

/// List all incidents (operator/admin)
#[utoipa::path(
    get,
    path = "/api/incidents",
    params(IncidentQueryParams),
    responses(
        (status = 200, description = "Matching incidents", body = ApiResponse<Vec<IncidentResponseDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Operator or admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn list_incidents(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<IncidentService>>,
    AppQuery(params): AppQuery<IncidentQueryParams>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    let filter = params.into_filter()?;
    let incidents = service.list_all(&filter, &user).await?;
    let dtos: Vec<IncidentResponseDto> = incidents.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Change an incident's status (operator/admin)
#[utoipa::path(
    patch,
    path = "/api/incidents/{id}/status",
    params(
        ("id" = i64, Path, description = "Incident ID")
    ),
    request_body = UpdateIncidentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Operator or admin role required"),
        (status = 404, description = "Incident not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn update_incident_status(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<IncidentService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateIncidentStatusDto>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = service
        .update_status(id, dto.status, &user, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(incident.into()),
        Some("Incident status updated".to_string()),
    )))
}

/// Incident counts grouped by type, status and district (operator/admin)
#[utoipa::path(
    get,
    path = "/api/incidents/stats/summary",
    responses(
        (status = 200, description = "Grouped counts", body = ApiResponse<Vec<IncidentStatDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Operator or admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn get_stats(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<IncidentService>>,
) -> Result<Json<ApiResponse<Vec<IncidentStatDto>>>> {
    let stats = service.stats_by_group(&user).await?;
    let dtos: Vec<IncidentStatDto> = stats.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Incidents in one district, newest first (operator/admin)
#[utoipa::path(
    get,
    path = "/api/incidents/stats/by-district/{district}",
    params(
        ("district" = String, Path, description = "District (barrio) name")
    ),
    responses(
        (status = 200, description = "Incidents in the district", body = ApiResponse<Vec<IncidentResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Operator or admin role required")
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn list_by_district(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<IncidentService>>,
    Path(district): Path<String>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    let incidents = service.list_by_district(&district, &user).await?;
    let dtos: Vec<IncidentResponseDto> = incidents.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}
