use crate::shared::constants::INCIDENT_ROOM_PREFIX;

/// Channel on which updates for one incident are broadcast
pub fn room_name(incident_id: i64) -> String {
    format!("{}{}", INCIDENT_ROOM_PREFIX, incident_id)
}
