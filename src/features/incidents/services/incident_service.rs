use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Permission};
use crate::features::evidence::models::Evidence;
use crate::features::evidence::repository::EvidenceRepository;
use crate::features::incidents::models::{
    Incident, IncidentDetails, IncidentFilter, IncidentStat, IncidentStatus, IncidentType,
    NewIncident,
};
use crate::features::incidents::realtime::room_name;
use crate::features::incidents::repository::IncidentRepository;

/// Incident fields supplied by the reporter
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub incident_type: IncidentType,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub district: String,
}

/// Service for incident operations
pub struct IncidentService {
    incidents: Arc<dyn IncidentRepository>,
    evidence: Arc<dyn EvidenceRepository>,
}

impl IncidentService {
    pub fn new(
        incidents: Arc<dyn IncidentRepository>,
        evidence: Arc<dyn EvidenceRepository>,
    ) -> Self {
        Self {
            incidents,
            evidence,
        }
    }

    async fn with_evidence(&self, incidents: Vec<Incident>) -> Result<Vec<IncidentDetails>> {
        let ids: Vec<i64> = incidents.iter().map(|i| i.id).collect();
        let mut by_incident: HashMap<i64, Vec<Evidence>> = HashMap::new();
        for item in self.evidence.list_by_incidents(&ids).await? {
            by_incident.entry(item.incident_id).or_default().push(item);
        }

        Ok(incidents
            .into_iter()
            .map(|incident| IncidentDetails {
                evidence: by_incident.remove(&incident.id).unwrap_or_default(),
                incident,
            })
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Incident> {
        self.incidents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", id)))
    }

    /// File a new incident in `received` state
    pub async fn create(
        &self,
        reporter: &AuthenticatedUser,
        report: IncidentReport,
        now: DateTime<Utc>,
    ) -> Result<IncidentDetails> {
        authorize(reporter, Permission::CreateIncident)?;

        let incident = self
            .incidents
            .create(&NewIncident {
                user_id: reporter.id,
                incident_type: report.incident_type,
                description: report.description.trim().to_string(),
                lat: report.lat,
                lng: report.lng,
                address: report.address.trim().to_string(),
                district: report.district.trim().to_string(),
                reported_at: now,
            })
            .await?;

        tracing::info!(
            "Created incident {} ({}) for user {}",
            incident.id,
            incident.incident_type,
            reporter.id
        );

        Ok(IncidentDetails {
            incident,
            evidence: Vec::new(),
        })
    }

    pub async fn list_own(&self, user: &AuthenticatedUser) -> Result<Vec<IncidentDetails>> {
        let incidents = self.incidents.list_by_user(user.id).await?;
        self.with_evidence(incidents).await
    }

    /// Visible to the owner and to staff
    pub async fn get_by_id(&self, id: i64, requester: &AuthenticatedUser) -> Result<IncidentDetails> {
        let incident = self.find(id).await?;
        authorize(
            requester,
            Permission::ViewIncident {
                owner_id: incident.user_id,
            },
        )?;

        let evidence = self.evidence.list_by_incident(id).await?;
        Ok(IncidentDetails { incident, evidence })
    }

    pub async fn list_all(
        &self,
        filter: &IncidentFilter,
        requester: &AuthenticatedUser,
    ) -> Result<Vec<IncidentDetails>> {
        authorize(requester, Permission::ManageIncidents)?;

        tracing::debug!("Listing incidents with {:?}", filter);
        let incidents = self.incidents.list(filter).await?;
        self.with_evidence(incidents).await
    }

    /// Any status may follow any other; concurrent updates are last-write-wins
    pub async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
        requester: &AuthenticatedUser,
        now: DateTime<Utc>,
    ) -> Result<IncidentDetails> {
        authorize(requester, Permission::ManageIncidents)?;

        let incident = self
            .incidents
            .update_status(id, status, now)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", id)))?;

        tracing::info!(
            room = %room_name(id),
            "Incident {} moved to {} by user {}",
            id,
            status,
            requester.id
        );

        let evidence = self.evidence.list_by_incident(id).await?;
        Ok(IncidentDetails { incident, evidence })
    }

    pub async fn stats_by_group(&self, requester: &AuthenticatedUser) -> Result<Vec<IncidentStat>> {
        authorize(requester, Permission::ManageIncidents)?;
        self.incidents.stats().await
    }

    pub async fn list_by_district(
        &self,
        district: &str,
        requester: &AuthenticatedUser,
    ) -> Result<Vec<IncidentDetails>> {
        let filter = IncidentFilter {
            district: Some(district.to_string()),
            ..Default::default()
        };
        self.list_all(&filter, requester).await
    }
}
