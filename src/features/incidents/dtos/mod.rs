mod incident_dto;

pub use incident_dto::{
    CreateIncidentDto, GeoPointDto, IncidentQueryParams, IncidentResponseDto, IncidentStatDto,
    UpdateIncidentStatusDto,
};
