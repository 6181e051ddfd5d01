use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::config::BootstrapAccount;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{NewUser, ProfileChanges, User, UserRole, UserStatus};
use crate::features::users::password::PasswordHasher;
use crate::features::users::repository::UserRepository;
use crate::modules::mailer::Mailer;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration input, already validated at the boundary
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub face_photo: String,
    pub id_front_photo: String,
    pub id_back_photo: String,
}

/// Credential and identity store: user records, password checks and the
/// account lifecycle.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    mailer: Arc<dyn Mailer>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            users,
            hasher,
            mailer,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn password_matches(&self, password: String, hash: Option<String>) -> Result<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                hasher.verify_dummy(&password);
                false
            }
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    /// Create a `pending` account and fire the validation email
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let email = normalize_email(&registration.email);
        let dni = registration.dni.trim().to_string();

        if self.users.exists_by_email_or_dni(&email, &dni).await? {
            return Err(AppError::Conflict(
                "Email or DNI already registered".to_string(),
            ));
        }

        let password_hash = self.hash_password(registration.password).await?;

        let user = self
            .users
            .create(&NewUser {
                first_name: registration.first_name.trim().to_string(),
                last_name: registration.last_name.trim().to_string(),
                dni,
                address: registration.address.trim().to_string(),
                phone: registration.phone.trim().to_string(),
                email,
                password_hash,
                face_photo: registration.face_photo,
                id_front_photo: registration.id_front_photo,
                id_back_photo: registration.id_back_photo,
                status: UserStatus::Pending,
                role: UserRole::Citizen,
            })
            .await?;

        tracing::info!("Registered user {} pending validation", user.id);

        let mailer = Arc::clone(&self.mailer);
        let (to, name) = (user.email.clone(), user.first_name.clone());
        tokio::spawn(async move {
            if let Err(e) = mailer.send_validation_email(&to, &name).await {
                tracing::warn!("Failed to send validation email to {}: {}", to, e);
            }
        });

        Ok(user)
    }

    /// Same `Unauthorized` error for unknown email and wrong password
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let user = self.users.find_by_email(&normalize_email(email)).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        let matches = self
            .password_matches(password.to_string(), stored_hash)
            .await?;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string())),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Blank or absent fields keep their stored value
    pub async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<User> {
        let keep = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let changes = ProfileChanges {
            first_name: keep(changes.first_name),
            last_name: keep(changes.last_name),
            address: keep(changes.address),
            phone: keep(changes.phone),
        };

        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let user = self
            .users
            .update_profile(id, &changes, at)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("Updated profile for user {}", id);
        Ok(user)
    }

    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let user = self.get_by_id(id).await?;

        if !self
            .password_matches(current_password.to_string(), Some(user.password_hash))
            .await?
        {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = self.hash_password(new_password.to_string()).await?;
        self.users.update_password(id, &password_hash, at).await?;

        tracing::info!("Password changed for user {}", id);
        Ok(())
    }

    pub async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        self.users.record_login(id, at).await
    }

    /// Create a validated staff account unless the email already exists
    pub async fn ensure_account(&self, account: &BootstrapAccount, role: UserRole) -> Result<()> {
        let email = normalize_email(&account.email);

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Bootstrap {} account {} already present", role, email);
            return Ok(());
        }

        let (first_name, dni) = match role {
            UserRole::Admin => ("Admin", reserved_dni('A')),
            UserRole::Operator => ("Operador", reserved_dni('O')),
            UserRole::Citizen => ("Ciudadano", reserved_dni('C')),
        };

        let password_hash = self.hash_password(account.password.clone()).await?;

        let user = self
            .users
            .create(&NewUser {
                first_name: first_name.to_string(),
                last_name: "Sistema".to_string(),
                dni,
                address: "N/A".to_string(),
                phone: "0000000000".to_string(),
                email,
                password_hash,
                face_photo: "N/A".to_string(),
                id_front_photo: "N/A".to_string(),
                id_back_photo: "N/A".to_string(),
                status: UserStatus::Validated,
                role,
            })
            .await?;

        tracing::info!("Created bootstrap {} account {}", role, user.id);
        Ok(())
    }
}

/// DNI for system accounts: a letter prefix keeps it out of the citizen
/// 7-8 digit range, the random tail keeps each account unique.
fn reserved_dni(prefix: char) -> String {
    let tail = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &tail[..7])
}
