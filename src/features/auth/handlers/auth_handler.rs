use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthUserDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto, RegisterResponseDto,
};
use crate::features::auth::services::AuthService;
use crate::features::users::services::IdentityService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

/// State for public auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub identity_service: Arc<IdentityService>,
    pub auth_service: Arc<AuthService>,
}

/// Register a new citizen account (pending validation)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered, pending validation", body = ApiResponse<RegisterResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or DNI already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponseDto>>)> {
    dto.validate()?;

    let user = state.identity_service.register(dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(RegisterResponseDto::from(&user)),
            Some("User registered. Awaiting validation by the 911 operators.".to_string()),
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "User pending validation")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()?;

    let outcome = state
        .auth_service
        .login(&dto.email, &dto.password, Utc::now())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(LoginResponseDto {
            token: outcome.token.token,
            expires_at: outcome.token.expires_at,
            user: AuthUserDto::from(&outcome.user),
        }),
        None,
    )))
}
