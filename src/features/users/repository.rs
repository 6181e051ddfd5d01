//! Persistence port for users and its PostgreSQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{NewUser, ProfileChanges, User};

const USER_COLUMNS: &str = r#"
    id, first_name, last_name, dni, address, phone, email, password_hash,
    face_photo, id_front_photo, id_back_photo, status, role,
    last_login_at, created_at, updated_at
"#;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn exists_by_email_or_dni(&self, email: &str, dni: &str) -> Result<bool>;

    /// Insert a user. A unique violation on email or dni is `Conflict`.
    async fn create(&self, user: &NewUser) -> Result<User>;

    async fn update_profile(
        &self,
        id: i64,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<User>>;

    async fn update_password(&self, id: i64, password_hash: &str, at: DateTime<Utc>)
        -> Result<()>;

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return AppError::Conflict("Email or DNI already registered".to_string());
        }
    }
    tracing::error!("Failed to write user: {:?}", e);
    AppError::Database(e)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by email: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    async fn exists_by_email_or_dni(&self, email: &str, dni: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR dni = $2)",
        )
        .bind(email)
        .bind(dni)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check user identity: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(exists)
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                first_name, last_name, dni, address, phone, email, password_hash,
                face_photo, id_front_photo, id_back_photo, status, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.dni)
        .bind(&user.address)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.face_photo)
        .bind(&user.id_front_photo)
        .bind(&user.id_back_photo)
        .bind(user.status)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.address)
        .bind(&changes.phone)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }
}
