use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::users::models::{ProfileChanges, User, UserRole, UserStatus};
use crate::shared::validation::PHONE_REGEX;

/// Complete user profile response. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponseDto {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub dni: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "fotoRostro")]
    pub face_photo: String,
    #[serde(rename = "fotoDniFrente")]
    pub id_front_photo: String,
    #[serde(rename = "fotoDniDorso")]
    pub id_back_photo: String,
    #[serde(rename = "estado")]
    pub status: UserStatus,
    #[serde(rename = "rol")]
    pub role: UserRole,
    #[serde(rename = "ultimoAcceso")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfileResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            dni: user.dni,
            address: user.address,
            phone: user.phone,
            email: user.email,
            face_photo: user.face_photo,
            id_front_photo: user.id_front_photo,
            id_back_photo: user.id_back_photo,
            status: user.status,
            role: user.role,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Blank values are ignored, so only a non-blank phone has to match
fn phone_or_blank(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || PHONE_REGEX.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("phone").with_message("telefono must have 10 digits".into()))
}

/// Request DTO for profile updates; absent or blank fields keep their value
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[serde(rename = "nombre", default)]
    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[serde(rename = "apellido", default)]
    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[serde(rename = "direccion", default)]
    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[serde(rename = "telefono", default)]
    #[validate(custom(function = "phone_or_blank"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileDto> for ProfileChanges {
    fn from(dto: UpdateProfileDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            address: dto.address,
            phone: dto.phone,
        }
    }
}

/// Request DTO for password change
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "currentPassword is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "newPassword must be at least 6 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_phone_rule() {
        let ok: UpdateProfileDto =
            serde_json::from_value(serde_json::json!({ "telefono": "1198765432" })).unwrap();
        assert!(ok.validate().is_ok());

        let blank: UpdateProfileDto =
            serde_json::from_value(serde_json::json!({ "telefono": "" })).unwrap();
        assert!(blank.validate().is_ok());

        let bad: UpdateProfileDto =
            serde_json::from_value(serde_json::json!({ "telefono": "123" })).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_change_password_wire_names() {
        let dto: ChangePasswordDto = serde_json::from_value(serde_json::json!({
            "currentPassword": "secret123",
            "newPassword": "short"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }
}
