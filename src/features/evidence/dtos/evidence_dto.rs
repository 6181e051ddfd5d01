use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::evidence::models::{Evidence, EvidenceKind, UploadedFile};
use crate::shared::constants::{
    ALLOWED_EVIDENCE_MIME_TYPES, MAX_EVIDENCE_FILES, MAX_EVIDENCE_FILE_NAME_LEN,
    MAX_EVIDENCE_FILE_SIZE,
};

/// Upload form for OpenAPI documentation only.
/// The handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadEvidenceDto {
    /// Up to 5 files (jpeg, png, gif, mp4), 10 MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub evidencias: Vec<String>,
}

/// Full evidence record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceResponseDto {
    pub id: i64,
    #[serde(rename = "denunciaId")]
    pub incident_id: i64,
    #[serde(rename = "tipo")]
    pub kind: EvidenceKind,
    pub url: String,
    #[serde(rename = "nombreArchivo")]
    pub file_name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "tamanio")]
    pub size_bytes: i64,
    #[serde(rename = "fechaSubida")]
    pub uploaded_at: DateTime<Utc>,
}

impl From<Evidence> for EvidenceResponseDto {
    fn from(e: Evidence) -> Self {
        Self {
            id: e.id,
            incident_id: e.incident_id,
            kind: e.kind,
            url: e.url,
            file_name: e.file_name,
            mime_type: e.mime_type,
            size_bytes: e.size_bytes,
            uploaded_at: e.uploaded_at,
        }
    }
}

/// Evidence summary embedded in incident responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceSummaryDto {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: EvidenceKind,
    pub url: String,
}

impl From<Evidence> for EvidenceSummaryDto {
    fn from(e: Evidence) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            url: e.url,
        }
    }
}

/// Check if a MIME type is accepted as evidence
pub fn is_mime_type_allowed(mime_type: &str) -> bool {
    ALLOWED_EVIDENCE_MIME_TYPES.contains(&mime_type)
}

/// File extension for an accepted MIME type
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "video/mp4" => Some("mp4"),
        _ => None,
    }
}

pub fn check_file_size(file_name: &str, size: usize) -> Result<()> {
    if size > MAX_EVIDENCE_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File '{}' too large. Maximum size is {} MB",
            file_name,
            MAX_EVIDENCE_FILE_SIZE / 1024 / 1024
        )));
    }
    Ok(())
}

pub fn check_mime_type(file_name: &str, mime_type: &str) -> Result<()> {
    if !is_mime_type_allowed(mime_type) {
        return Err(AppError::BadRequest(format!(
            "File '{}' has type '{}' which is not allowed. Allowed types: {}",
            file_name,
            mime_type,
            ALLOWED_EVIDENCE_MIME_TYPES.join(", ")
        )));
    }
    Ok(())
}

pub fn check_file_name(file_name: &str) -> Result<()> {
    if file_name.chars().count() > MAX_EVIDENCE_FILE_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "File name too long. Maximum is {} characters",
            MAX_EVIDENCE_FILE_NAME_LEN
        )));
    }
    Ok(())
}

pub fn check_file_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(AppError::BadRequest(
            "At least one evidence file is required".to_string(),
        ));
    }
    if count > MAX_EVIDENCE_FILES {
        return Err(AppError::BadRequest(format!(
            "Too many files. Maximum is {} per upload",
            MAX_EVIDENCE_FILES
        )));
    }
    Ok(())
}

/// Accept the whole batch or reject it
pub fn validate_batch(files: &[UploadedFile]) -> Result<()> {
    check_file_count(files.len())?;
    for file in files {
        check_file_name(&file.file_name)?;
        check_file_size(&file.file_name, file.data.len())?;
        check_mime_type(&file.file_name, &file.mime_type)?;
    }
    Ok(())
}
