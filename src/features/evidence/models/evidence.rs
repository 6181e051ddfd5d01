use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Evidence media kind matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "evidence_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    #[serde(alias = "imagen")]
    Image,
    Video,
}

impl EvidenceKind {
    /// `image/*` is an image, anything else accepted is a video
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            EvidenceKind::Image
        } else {
            EvidenceKind::Video
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceKind::Image => write!(f, "image"),
            EvidenceKind::Video => write!(f, "video"),
        }
    }
}

/// Database model for evidence
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Evidence {
    pub id: i64,
    pub incident_id: i64,
    pub kind: EvidenceKind,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Data for inserting one evidence row
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub incident_id: i64,
    pub kind: EvidenceKind,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// A file received from the client, not yet stored
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
