//! Router assembly shared by the server binary and the HTTP tests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{Config, SwaggerConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::auth::AccessGuard;
use crate::features::evidence::{routes as evidence_routes, EvidenceService};
use crate::features::incidents::{routes as incidents_routes, IncidentService};
use crate::features::users::routes as users_routes;
use crate::features::users::services::IdentityService;

/// Services the HTTP layer dispatches to
pub struct AppServices {
    pub identity: Arc<IdentityService>,
    pub auth: Arc<AuthService>,
    pub access: Arc<AccessGuard>,
    pub incidents: Arc<IncidentService>,
    pub evidence: Arc<EvidenceService>,
}

/// Transport-level settings for the router
pub struct HttpSettings {
    pub cors_allowed_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub upload_public_path: String,
    pub expose_error_detail: bool,
    pub swagger: SwaggerConfig,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cors_allowed_origins: config.app.cors_allowed_origins.clone(),
            upload_dir: config.storage.upload_dir.clone(),
            upload_public_path: config.storage.public_path.clone(),
            expose_error_detail: config.app.is_development(),
            swagger: config.swagger.clone(),
        }
    }
}

fn swagger_routes(config: &SwaggerConfig) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

pub fn build_app(services: AppServices, settings: &HttpSettings) -> Router {
    // Protected routes (require a valid token and a validated account)
    let protected_routes = Router::new()
        .merge(users_routes::routes(Arc::clone(&services.identity)))
        .merge(incidents_routes::routes(services.incidents))
        .merge(evidence_routes::routes(services.evidence))
        .route_layer(from_fn_with_state(
            services.access,
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(services.identity, services.auth))
        .route("/health", axum::routing::get(health_check))
        .nest_service(
            &settings.upload_public_path,
            ServeDir::new(&settings.upload_dir),
        );

    Router::new()
        .merge(swagger_routes(&settings.swagger))
        .merge(protected_routes)
        .merge(public_routes)
        .layer(from_fn_with_state(
            settings.expose_error_detail,
            middleware::diagnostics_middleware,
        ))
        .layer(middleware::cors_layer(settings.cors_allowed_origins.clone()))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
