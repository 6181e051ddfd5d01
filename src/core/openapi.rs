use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::evidence::{
    dtos as evidence_dtos, handlers as evidence_handlers, models as evidence_models,
};
use crate::features::incidents::{
    dtos as incidents_dtos, handlers as incidents_handlers, models as incidents_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler, models as users_models};
use crate::shared::types::{ApiResponse, ErrorBody};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        // Profile
        profile_handler::get_profile,
        profile_handler::update_profile,
        profile_handler::change_password,
        // Incidents
        incidents_handlers::create_incident,
        incidents_handlers::list_my_incidents,
        incidents_handlers::get_incident,
        incidents_handlers::list_incidents,
        incidents_handlers::update_incident_status,
        incidents_handlers::get_stats,
        incidents_handlers::list_by_district,
        // Evidence
        evidence_handlers::upload_evidence,
        evidence_handlers::list_evidence,
    ),
    components(
        schemas(
            ErrorBody,
            // Users
            users_models::UserStatus,
            users_models::UserRole,
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateProfileDto,
            users_dtos::ChangePasswordDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::RegisterResponseDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthUserDto,
            auth_dtos::LoginResponseDto,
            ApiResponse<auth_dtos::RegisterResponseDto>,
            ApiResponse<auth_dtos::LoginResponseDto>,
            // Incidents
            incidents_models::IncidentType,
            incidents_models::IncidentStatus,
            incidents_dtos::GeoPointDto,
            incidents_dtos::CreateIncidentDto,
            incidents_dtos::UpdateIncidentStatusDto,
            incidents_dtos::IncidentResponseDto,
            incidents_dtos::IncidentStatDto,
            ApiResponse<incidents_dtos::IncidentResponseDto>,
            ApiResponse<Vec<incidents_dtos::IncidentResponseDto>>,
            ApiResponse<Vec<incidents_dtos::IncidentStatDto>>,
            // Evidence
            evidence_models::EvidenceKind,
            evidence_dtos::UploadEvidenceDto,
            evidence_dtos::EvidenceResponseDto,
            evidence_dtos::EvidenceSummaryDto,
            ApiResponse<Vec<evidence_dtos::EvidenceResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "incidents", description = "Incident reports and their lifecycle"),
        (name = "evidence", description = "Media evidence attached to incidents"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "SAC API",
        version = "0.1.0",
        description = "Citizen incident reporting API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
