// =============================================================================
// EVIDENCE UPLOADS
// =============================================================================

/// Maximum size of a single evidence file (10 MB)
pub const MAX_EVIDENCE_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum length of a stored evidence file name, in characters
pub const MAX_EVIDENCE_FILE_NAME_LEN: usize = 255;

/// Maximum number of files accepted in one upload
pub const MAX_EVIDENCE_FILES: usize = 5;

/// Media types accepted as evidence
pub const ALLOWED_EVIDENCE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "video/mp4"];

/// Multipart field names that carry evidence files
pub const EVIDENCE_FIELD_NAMES: &[&str] = &["evidencias", "files"];

/// Room prefix for per-incident real-time channels
pub const INCIDENT_ROOM_PREFIX: &str = "incident_";
