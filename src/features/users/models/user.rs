use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Account lifecycle state matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "validado")]
    Validated,
    #[serde(alias = "rechazado")]
    Rejected,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "pending"),
            UserStatus::Validated => write!(f, "validated"),
            UserStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// User role matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[serde(alias = "ciudadano")]
    Citizen,
    #[serde(alias = "operador911")]
    Operator,
    Admin,
}

impl UserRole {
    /// Operators and admins triage every incident
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Operator | UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Citizen => write!(f, "citizen"),
            UserRole::Operator => write!(f, "operator"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Database model for user. Holds the password hash, so it is never
/// serialized directly; handlers map it to a response DTO.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub face_photo: String,
    pub id_front_photo: String,
    pub id_back_photo: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_validated(&self) -> bool {
        self.status == UserStatus::Validated
    }
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub face_photo: String,
    pub id_front_photo: String,
    pub id_back_photo: String,
    pub status: UserStatus,
    pub role: UserRole,
}

/// Editable profile fields; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
    }
}
