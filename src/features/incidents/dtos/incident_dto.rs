use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::evidence::dtos::EvidenceSummaryDto;
use crate::features::incidents::models::{
    IncidentDetails, IncidentFilter, IncidentStat, IncidentStatus, IncidentType,
};
use crate::features::incidents::services::IncidentReport;
use crate::shared::validation::not_blank;

/// Geographic point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema)]
pub struct GeoPointDto {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "lng must be between -180 and 180"))]
    pub lng: f64,
}

/// Request DTO for filing an incident
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentDto {
    #[serde(rename = "tipo")]
    pub incident_type: IncidentType,

    #[serde(rename = "descripcion")]
    #[validate(custom(function = "not_blank", message = "descripcion is required"))]
    pub description: String,

    #[serde(rename = "ubicacion")]
    #[validate(nested)]
    pub location: GeoPointDto,

    #[serde(rename = "direccion")]
    #[validate(custom(function = "not_blank", message = "direccion is required"))]
    #[validate(length(max = 255, message = "direccion must be at most 255 characters"))]
    pub address: String,

    #[serde(rename = "barrio")]
    #[validate(custom(function = "not_blank", message = "barrio is required"))]
    #[validate(length(max = 255, message = "barrio must be at most 255 characters"))]
    pub district: String,
}

impl From<CreateIncidentDto> for IncidentReport {
    fn from(dto: CreateIncidentDto) -> Self {
        Self {
            incident_type: dto.incident_type,
            description: dto.description,
            lat: dto.location.lat,
            lng: dto.location.lng,
            address: dto.address,
            district: dto.district,
        }
    }
}

/// Request DTO for a status change
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateIncidentStatusDto {
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
}

/// Filters for listing all incidents
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncidentQueryParams {
    /// Exact status
    pub estado: Option<IncidentStatus>,
    /// Exact incident type
    pub tipo: Option<IncidentType>,
    /// Exact district
    pub barrio: Option<String>,
    /// Lower bound on report date, `YYYY-MM-DD` or RFC 3339 (inclusive)
    #[serde(rename = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    /// Upper bound on report date, `YYYY-MM-DD` or RFC 3339 (inclusive)
    #[serde(rename = "fechaFin")]
    pub fecha_fin: Option<String>,
}

enum Bound {
    Start,
    End,
}

/// A bare date covers the whole day: start of day as lower bound,
/// last microsecond of the day as upper bound.
fn parse_date_bound(field: &str, value: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "{}: expected YYYY-MM-DD or an RFC 3339 timestamp",
            field
        ))
    })?;

    let time = match bound {
        Bound::Start => NaiveTime::from_hms_micro_opt(0, 0, 0, 0),
        Bound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999),
    }
    .ok_or_else(|| AppError::Internal("Invalid day boundary".to_string()))?;

    Ok(date.and_time(time).and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl IncidentQueryParams {
    pub fn into_filter(self) -> Result<IncidentFilter> {
        let from = non_blank(self.fecha_inicio)
            .map(|v| parse_date_bound("fechaInicio", &v, Bound::Start))
            .transpose()?;
        let to = non_blank(self.fecha_fin)
            .map(|v| parse_date_bound("fechaFin", &v, Bound::End))
            .transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::Validation(
                    "fechaInicio: must not be after fechaFin".to_string(),
                ));
            }
        }

        Ok(IncidentFilter {
            status: self.estado,
            incident_type: self.tipo,
            district: non_blank(self.barrio),
            from,
            to,
        })
    }
}

/// Incident response with evidence summaries
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponseDto {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "tipo")]
    pub incident_type: IncidentType,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: GeoPointDto,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "barrio")]
    pub district: String,
    #[serde(rename = "estado")]
    pub status: IncidentStatus,
    #[serde(rename = "fecha")]
    pub reported_at: DateTime<Utc>,
    #[serde(rename = "ultimaActualizacion")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "evidencias")]
    pub evidence: Vec<EvidenceSummaryDto>,
}

impl From<IncidentDetails> for IncidentResponseDto {
    fn from(details: IncidentDetails) -> Self {
        let incident = details.incident;
        Self {
            id: incident.id,
            user_id: incident.user_id,
            incident_type: incident.incident_type,
            description: incident.description,
            location: GeoPointDto {
                lat: incident.lat,
                lng: incident.lng,
            },
            address: incident.address,
            district: incident.district,
            status: incident.status,
            reported_at: incident.reported_at,
            updated_at: incident.updated_at,
            evidence: details.evidence.into_iter().map(Into::into).collect(),
        }
    }
}

/// Incident count per (type, status, district)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentStatDto {
    pub tipo: IncidentType,
    pub estado: IncidentStatus,
    pub barrio: String,
    pub total: i64,
}

impl From<IncidentStat> for IncidentStatDto {
    fn from(stat: IncidentStat) -> Self {
        Self {
            tipo: stat.incident_type,
            estado: stat.status,
            barrio: stat.district,
            total: stat.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_dto_accepts_legacy_type_and_checks_location() {
        let dto: CreateIncidentDto = serde_json::from_value(serde_json::json!({
            "tipo": "robo",
            "descripcion": "stolen bike",
            "ubicacion": { "lat": -34.6, "lng": -58.4 },
            "direccion": "Calle 1",
            "barrio": "Centro"
        }))
        .unwrap();
        assert_eq!(dto.incident_type, IncidentType::Theft);
        assert!(dto.validate().is_ok());

        let bad: CreateIncidentDto = serde_json::from_value(serde_json::json!({
            "tipo": "theft",
            "descripcion": " ",
            "ubicacion": { "lat": 91.0, "lng": 0.0 },
            "direccion": "Calle 1",
            "barrio": "Centro"
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let text = errors.to_string();
        assert!(text.contains("description"));
        assert!(text.contains("lat"));
    }

    #[test]
    fn test_create_dto_rejects_overlong_address_and_district() {
        let dto: CreateIncidentDto = serde_json::from_value(serde_json::json!({
            "tipo": "theft",
            "descripcion": "stolen bike",
            "ubicacion": { "lat": -34.6, "lng": -58.4 },
            "direccion": "a".repeat(256),
            "barrio": "b".repeat(400)
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("address"));
        assert!(fields.contains_key("district"));
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let filter = IncidentQueryParams {
            fecha_inicio: Some("2025-05-01".to_string()),
            fecha_fin: Some("2025-05-01".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(
            filter.from,
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap())
        );
        let to = filter.to.unwrap();
        assert!(to > Utc.with_ymd_and_hms(2025, 5, 1, 23, 59, 59).unwrap());
        assert!(to < Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_and_single_bound() {
        let filter = IncidentQueryParams {
            fecha_inicio: Some("2025-05-01T10:00:00-03:00".to_string()),
            barrio: Some("  ".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(
            filter.from,
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 13, 0, 0).unwrap())
        );
        assert_eq!(filter.to, None);
        assert_eq!(filter.district, None);
    }

    #[test]
    fn test_inverted_or_malformed_range_is_validation_error() {
        let inverted = IncidentQueryParams {
            fecha_inicio: Some("2025-05-02".to_string()),
            fecha_fin: Some("2025-05-01".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(inverted, Err(AppError::Validation(_))));

        let malformed = IncidentQueryParams {
            fecha_fin: Some("01/05/2025".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(malformed, Err(AppError::Validation(_))));
    }
}
