use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{User, UserRole, UserStatus};
use crate::features::users::services::Registration;
use crate::shared::validation::{not_blank, DNI_REGEX, PHONE_REGEX};

/// Request DTO for citizen registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[serde(rename = "nombre")]
    #[validate(custom(function = "not_blank", message = "nombre is required"))]
    #[validate(length(max = 255, message = "nombre must be at most 255 characters"))]
    pub first_name: String,

    #[serde(rename = "apellido")]
    #[validate(custom(function = "not_blank", message = "apellido is required"))]
    #[validate(length(max = 255, message = "apellido must be at most 255 characters"))]
    pub last_name: String,

    #[validate(regex(path = *DNI_REGEX, message = "dni must have 7 or 8 digits"))]
    pub dni: String,

    #[serde(rename = "direccion")]
    #[validate(custom(function = "not_blank", message = "direccion is required"))]
    #[validate(length(max = 255, message = "direccion must be at most 255 characters"))]
    pub address: String,

    #[validate(email(message = "email must be valid"))]
    #[validate(length(max = 255, message = "email must be at most 255 characters"))]
    pub email: String,

    #[serde(rename = "telefono")]
    #[validate(regex(path = *PHONE_REGEX, message = "telefono must have 10 digits"))]
    pub phone: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,

    #[serde(rename = "fotoRostro")]
    #[validate(custom(function = "not_blank", message = "fotoRostro is required"))]
    pub face_photo: String,

    #[serde(rename = "fotoDniFrente")]
    #[validate(custom(function = "not_blank", message = "fotoDniFrente is required"))]
    pub id_front_photo: String,

    #[serde(rename = "fotoDniDorso")]
    #[validate(custom(function = "not_blank", message = "fotoDniDorso is required"))]
    pub id_back_photo: String,
}

impl From<RegisterRequestDto> for Registration {
    fn from(dto: RegisterRequestDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            dni: dto.dni,
            address: dto.address,
            phone: dto.phone,
            email: dto.email,
            password: dto.password,
            face_photo: dto.face_photo,
            id_front_photo: dto.id_front_photo,
            id_back_photo: dto.id_back_photo,
        }
    }
}

/// Response DTO for registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponseDto {
    pub id: i64,
    pub email: String,
    #[serde(rename = "estado")]
    pub status: UserStatus,
}

impl From<&User> for RegisterResponseDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            status: user.status,
        }
    }
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "email must be valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// User summary returned with a login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: UserRole,
}

impl From<&User> for AuthUserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    /// HS256 access token, send as `Authorization: Bearer <token>`
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUserDto,
}
