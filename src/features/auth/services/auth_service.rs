use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::services::token_service::{IssuedToken, TokenService};
use crate::features::users::models::User;
use crate::features::users::services::IdentityService;

/// Successful login: the refreshed user record and its access token
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Service for session operations (login)
pub struct AuthService {
    identity: Arc<IdentityService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(identity: Arc<IdentityService>, tokens: Arc<TokenService>) -> Self {
        Self { identity, tokens }
    }

    /// Check credentials, gate on validation, stamp last access and issue a token
    pub async fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<LoginOutcome> {
        let mut user = self.identity.verify_credentials(email, password).await?;

        if !user.is_validated() {
            tracing::info!("Login refused for user {} with status {}", user.id, user.status);
            return Err(AppError::Forbidden("User pending validation".to_string()));
        }

        self.identity.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let token = self.tokens.issue_at(&user, now)?;
        tracing::info!("User {} logged in", user.id);

        Ok(LoginOutcome { user, token })
    }
}
