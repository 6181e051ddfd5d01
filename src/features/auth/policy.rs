//! Incident permissions.
//!
//! Every role and ownership rule for incidents and evidence is expressed as
//! a `Permission` and decided by [`authorize`]. Callers reaching this point
//! are already authenticated and validated.

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// File a new incident
    CreateIncident,
    /// Read an incident (and its evidence) owned by `owner_id`
    ViewIncident { owner_id: i64 },
    /// Attach evidence to an incident owned by `owner_id`
    AttachEvidence { owner_id: i64 },
    /// List all incidents, change status, read statistics
    ManageIncidents,
}

pub fn is_allowed(user: &AuthenticatedUser, permission: Permission) -> bool {
    match permission {
        Permission::CreateIncident => true,
        Permission::ViewIncident { owner_id } | Permission::AttachEvidence { owner_id } => {
            user.owns(owner_id) || user.is_staff()
        }
        Permission::ManageIncidents => user.is_staff(),
    }
}

pub fn authorize(user: &AuthenticatedUser, permission: Permission) -> Result<()> {
    if is_allowed(user, permission) {
        return Ok(());
    }

    tracing::debug!("User {} denied {:?}", user.id, permission);

    let message = match permission {
        Permission::ManageIncidents => "Operator or admin role required",
        _ => "You do not have access to this incident",
    };
    Err(AppError::Forbidden(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::{UserRole, UserStatus};
    use crate::shared::test_helpers::authenticated;

    #[test]
    fn test_owner_and_staff_can_view() {
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);
        let other = authenticated(2, UserRole::Citizen, UserStatus::Validated);
        let operator = authenticated(3, UserRole::Operator, UserStatus::Validated);
        let admin = authenticated(4, UserRole::Admin, UserStatus::Validated);
        let view = Permission::ViewIncident { owner_id: 1 };

        assert!(authorize(&owner, view).is_ok());
        assert!(authorize(&operator, view).is_ok());
        assert!(authorize(&admin, view).is_ok());
        assert!(matches!(authorize(&other, view), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_attach_follows_view_rule() {
        let other = authenticated(2, UserRole::Citizen, UserStatus::Validated);
        let operator = authenticated(3, UserRole::Operator, UserStatus::Validated);
        let attach = Permission::AttachEvidence { owner_id: 1 };

        assert!(!is_allowed(&other, attach));
        assert!(is_allowed(&operator, attach));
    }

    #[test]
    fn test_manage_requires_staff() {
        let citizen = authenticated(1, UserRole::Citizen, UserStatus::Validated);
        let operator = authenticated(2, UserRole::Operator, UserStatus::Validated);

        assert!(!is_allowed(&citizen, Permission::ManageIncidents));
        assert!(is_allowed(&operator, Permission::ManageIncidents));
    }

    #[test]
    fn test_any_role_can_create() {
        for role in [UserRole::Citizen, UserRole::Operator, UserRole::Admin] {
            let user = authenticated(1, role, UserStatus::Validated);
            assert!(is_allowed(&user, Permission::CreateIncident));
        }
    }
}
