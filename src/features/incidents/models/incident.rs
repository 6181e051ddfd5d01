use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::features::evidence::models::Evidence;

/// Incident category matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    #[serde(alias = "robo")]
    Theft,
    #[serde(alias = "hurto")]
    PettyTheft,
    #[serde(alias = "vandalismo")]
    Vandalism,
    #[serde(alias = "acoso")]
    Harassment,
    #[serde(alias = "violencia")]
    Violence,
    #[serde(alias = "otro")]
    Other,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Theft => write!(f, "theft"),
            IncidentType::PettyTheft => write!(f, "petty_theft"),
            IncidentType::Vandalism => write!(f, "vandalism"),
            IncidentType::Harassment => write!(f, "harassment"),
            IncidentType::Violence => write!(f, "violence"),
            IncidentType::Other => write!(f, "other"),
        }
    }
}

/// Incident lifecycle state matching database enum.
/// Any state may move to any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[serde(alias = "recibida")]
    Received,
    #[serde(alias = "en_proceso")]
    InProgress,
    #[serde(alias = "resuelta")]
    Resolved,
    #[serde(alias = "archivada")]
    Archived,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Received => write!(f, "received"),
            IncidentStatus::InProgress => write!(f, "in_progress"),
            IncidentStatus::Resolved => write!(f, "resolved"),
            IncidentStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Database model for incident
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Incident {
    pub id: i64,
    pub user_id: i64,
    pub incident_type: IncidentType,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub district: String,
    pub status: IncidentStatus,
    pub reported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new incident
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub user_id: i64,
    pub incident_type: IncidentType,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub district: String,
    pub reported_at: DateTime<Utc>,
}

/// Exact-match filters plus an inclusive range on `reported_at`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub incident_type: Option<IncidentType>,
    pub district: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Incident with its attached evidence
#[derive(Debug, Clone)]
pub struct IncidentDetails {
    pub incident: Incident,
    pub evidence: Vec<Evidence>,
}

/// Incident count for one (type, status, district) group
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IncidentStat {
    pub incident_type: IncidentType,
    pub status: IncidentStatus,
    pub district: String,
    pub total: i64,
}
