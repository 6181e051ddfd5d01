mod incident_service;

pub use incident_service::{IncidentReport, IncidentService};
