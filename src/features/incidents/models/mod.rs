mod incident;

pub use incident::{
    Incident, IncidentDetails, IncidentFilter, IncidentStat, IncidentStatus, IncidentType,
    NewIncident,
};
