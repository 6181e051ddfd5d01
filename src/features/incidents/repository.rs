//! Persistence port for incidents and its PostgreSQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::{
    Incident, IncidentFilter, IncidentStat, IncidentStatus, NewIncident,
};

const INCIDENT_COLUMNS: &str = r#"
    id, user_id, incident_type, description, lat, lng, address, district,
    status, reported_at, updated_at
"#;

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn create(&self, incident: &NewIncident) -> Result<Incident>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>>;

    /// Owner's incidents, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Incident>>;

    /// Incidents matching every set filter, newest first
    async fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>>;

    /// Returns `None` if the incident does not exist
    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Incident>>;

    async fn stats(&self) -> Result<Vec<IncidentStat>>;
}

pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
    async fn create(&self, incident: &NewIncident) -> Result<Incident> {
        let created = sqlx::query_as::<_, Incident>(&format!(
            r#"
            INSERT INTO incidents (
                user_id, incident_type, description, lat, lng, address, district,
                status, reported_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'received', $8, $8)
            RETURNING {}
            "#,
            INCIDENT_COLUMNS
        ))
        .bind(incident.user_id)
        .bind(incident.incident_type)
        .bind(&incident.description)
        .bind(incident.lat)
        .bind(incident.lng)
        .bind(&incident.address)
        .bind(&incident.district)
        .bind(incident.reported_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create incident: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            "SELECT {} FROM incidents WHERE id = $1",
            INCIDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch incident {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(incident)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Incident>> {
        let incidents = sqlx::query_as::<_, Incident>(&format!(
            r#"
            SELECT {}
            FROM incidents
            WHERE user_id = $1
            ORDER BY reported_at DESC, id DESC
            "#,
            INCIDENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incidents for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(incidents)
    }

    async fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>> {
        let incidents = sqlx::query_as::<_, Incident>(&format!(
            r#"
            SELECT {}
            FROM incidents
            WHERE ($1::incident_status IS NULL OR status = $1)
              AND ($2::incident_type IS NULL OR incident_type = $2)
              AND ($3::text IS NULL OR district = $3)
              AND ($4::timestamptz IS NULL OR reported_at >= $4)
              AND ($5::timestamptz IS NULL OR reported_at <= $5)
            ORDER BY reported_at DESC, id DESC
            "#,
            INCIDENT_COLUMNS
        ))
        .bind(filter.status)
        .bind(filter.incident_type)
        .bind(filter.district.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incidents: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(incidents)
    }

    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Incident>> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            r#"
            UPDATE incidents
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            INCIDENT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update incident {} status: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(incident)
    }

    async fn stats(&self) -> Result<Vec<IncidentStat>> {
        let stats = sqlx::query_as::<_, IncidentStat>(
            r#"
            SELECT incident_type, status, district, COUNT(*) AS total
            FROM incidents
            GROUP BY incident_type, status, district
            ORDER BY total DESC, district, incident_type, status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute incident stats: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(stats)
    }
}
