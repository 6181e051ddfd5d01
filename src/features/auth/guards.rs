//! Role-based authorization guards.
//!
//! Route-level counterpart of [`crate::features::auth::policy`]: extracts the
//! authenticated user and rejects callers outside the required role set.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Permission};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for operator or admin access.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(user): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        authorize(user, Permission::ManageIncidents)?;

        Ok(RequireStaff(user.clone()))
    }
}
