//! Persistence port for evidence and its PostgreSQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::evidence::models::{Evidence, NewEvidence};

const EVIDENCE_COLUMNS: &str =
    "id, incident_id, kind, url, file_name, mime_type, size_bytes, uploaded_at";

#[async_trait]
pub trait EvidenceRepository: Send + Sync {
    /// Insert every item or none
    async fn create_batch(&self, items: &[NewEvidence], at: DateTime<Utc>) -> Result<Vec<Evidence>>;

    /// Oldest first
    async fn list_by_incident(&self, incident_id: i64) -> Result<Vec<Evidence>>;

    async fn list_by_incidents(&self, incident_ids: &[i64]) -> Result<Vec<Evidence>>;
}

pub struct PgEvidenceRepository {
    pool: PgPool,
}

impl PgEvidenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvidenceRepository for PgEvidenceRepository {
    async fn create_batch(&self, items: &[NewEvidence], at: DateTime<Utc>) -> Result<Vec<Evidence>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin evidence transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let evidence = sqlx::query_as::<_, Evidence>(&format!(
                r#"
                INSERT INTO evidence (incident_id, kind, url, file_name, mime_type, size_bytes, uploaded_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {}
                "#,
                EVIDENCE_COLUMNS
            ))
            .bind(item.incident_id)
            .bind(item.kind)
            .bind(&item.url)
            .bind(&item.file_name)
            .bind(&item.mime_type)
            .bind(item.size_bytes)
            .bind(at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert evidence for incident {}: {:?}", item.incident_id, e);
                AppError::Database(e)
            })?;
            created.push(evidence);
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit evidence transaction: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(created)
    }

    async fn list_by_incident(&self, incident_id: i64) -> Result<Vec<Evidence>> {
        let evidence = sqlx::query_as::<_, Evidence>(&format!(
            "SELECT {} FROM evidence WHERE incident_id = $1 ORDER BY uploaded_at ASC, id ASC",
            EVIDENCE_COLUMNS
        ))
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list evidence for incident {}: {:?}", incident_id, e);
            AppError::Database(e)
        })?;

        Ok(evidence)
    }

    async fn list_by_incidents(&self, incident_ids: &[i64]) -> Result<Vec<Evidence>> {
        if incident_ids.is_empty() {
            return Ok(Vec::new());
        }

        let evidence = sqlx::query_as::<_, Evidence>(&format!(
            "SELECT {} FROM evidence WHERE incident_id = ANY($1) ORDER BY uploaded_at ASC, id ASC",
            EVIDENCE_COLUMNS
        ))
        .bind(incident_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list evidence for incidents: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(evidence)
    }
}
