use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::{User, UserRole, UserStatus};

/// Caller resolved by the access guard and stored in request extensions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "rol")]
    pub role: UserRole,
    #[serde(rename = "estado")]
    pub status: UserStatus,
}

impl AuthenticatedUser {
    /// Check if user is operator or admin
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn owns(&self, owner_id: i64) -> bool {
        self.id == owner_id
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

/// Signed access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub rol: UserRole,
    pub iat: i64,
    pub exp: i64,
}
