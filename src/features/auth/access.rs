use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenService;
use crate::features::users::repository::UserRepository;

/// Per-request authentication: bearer token, account lookup, validation gate
pub struct AccessGuard {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthenticatedUser> {
        let header = authorization
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid authorization header format".to_string())
            })?;

        let claims = self.tokens.verify(token)?;

        let user = self
            .users
            .find_by_id(claims.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        if !user.is_validated() {
            return Err(AppError::Forbidden("User pending validation".to_string()));
        }

        Ok(AuthenticatedUser::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::{UserRole, UserStatus};
    use crate::shared::test_helpers::{auth_config, user_fixture, InMemoryUserRepository};
    use chrono::{Duration, Utc};

    fn setup() -> (Arc<InMemoryUserRepository>, Arc<TokenService>, AccessGuard) {
        let repo = Arc::new(InMemoryUserRepository::default());
        let tokens = Arc::new(TokenService::new(&auth_config()));
        let guard = AccessGuard::new(Arc::clone(&tokens), repo.clone());
        (repo, tokens, guard)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (repo, tokens, guard) = setup();
        let user = repo.insert(user_fixture(0, UserRole::Operator, UserStatus::Validated));
        let token = tokens.issue(&user).unwrap().token;

        let resolved = guard
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.role, UserRole::Operator);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        let (_, _, guard) = setup();

        assert!(matches!(
            guard.authenticate(None).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            guard.authenticate(Some("Basic abc")).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            guard.authenticate(Some("Bearer ")).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_and_invalid_tokens_have_distinct_messages() {
        let (repo, tokens, guard) = setup();
        let user = repo.insert(user_fixture(0, UserRole::Citizen, UserStatus::Validated));
        let stale = tokens
            .issue_at(&user, Utc::now() - Duration::hours(25))
            .unwrap()
            .token;

        let expired = guard
            .authenticate(Some(&format!("Bearer {}", stale)))
            .await
            .unwrap_err();
        let invalid = guard
            .authenticate(Some("Bearer garbage"))
            .await
            .unwrap_err();

        assert!(matches!(expired, AppError::Unauthorized(ref m) if m == "Token expired"));
        assert!(matches!(invalid, AppError::Unauthorized(ref m) if m == "Invalid token"));
    }

    #[tokio::test]
    async fn test_deleted_user_is_unauthorized() {
        let (_, tokens, guard) = setup();
        let ghost = user_fixture(404, UserRole::Citizen, UserStatus::Validated);
        let token = tokens.issue(&ghost).unwrap().token;

        assert!(matches!(
            guard.authenticate(Some(&format!("Bearer {}", token))).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_pending_user_is_forbidden() {
        let (repo, tokens, guard) = setup();
        let user = repo.insert(user_fixture(0, UserRole::Citizen, UserStatus::Pending));
        let token = tokens.issue(&user).unwrap().token;

        assert!(matches!(
            guard.authenticate(Some(&format!("Bearer {}", token))).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
