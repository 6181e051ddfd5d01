use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Permission};
use crate::features::evidence::dtos::{extension_for_mime, validate_batch};
use crate::features::evidence::models::{Evidence, EvidenceKind, NewEvidence, UploadedFile};
use crate::features::evidence::repository::EvidenceRepository;
use crate::features::incidents::models::Incident;
use crate::features::incidents::repository::IncidentRepository;
use crate::modules::storage::{FileStorage, StoredFile};

/// Service for attaching media evidence to incidents
pub struct EvidenceService {
    incidents: Arc<dyn IncidentRepository>,
    evidence: Arc<dyn EvidenceRepository>,
    storage: Arc<dyn FileStorage>,
}

impl EvidenceService {
    pub fn new(
        incidents: Arc<dyn IncidentRepository>,
        evidence: Arc<dyn EvidenceRepository>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            incidents,
            evidence,
            storage,
        }
    }

    async fn find_incident(&self, id: i64) -> Result<Incident> {
        self.incidents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", id)))
    }

    async fn discard(&self, stored: &[StoredFile]) {
        for file in stored {
            if let Err(e) = self.storage.remove(&file.key).await {
                tracing::warn!("Failed to remove orphaned evidence file {}: {}", file.key, e);
            }
        }
    }

    /// Store and record a batch of files. A rejected batch attaches nothing.
    pub async fn attach(
        &self,
        incident_id: i64,
        files: Vec<UploadedFile>,
        requester: &AuthenticatedUser,
        now: DateTime<Utc>,
    ) -> Result<Vec<Evidence>> {
        let incident = self.find_incident(incident_id).await?;
        authorize(
            requester,
            Permission::AttachEvidence {
                owner_id: incident.user_id,
            },
        )?;
        validate_batch(&files)?;

        let mut stored = Vec::with_capacity(files.len());
        let mut rows = Vec::with_capacity(files.len());
        for file in &files {
            let extension = extension_for_mime(&file.mime_type).ok_or_else(|| {
                AppError::BadRequest(format!("File type '{}' is not allowed", file.mime_type))
            })?;

            let saved = match self.storage.store(&file.data, extension).await {
                Ok(saved) => saved,
                Err(e) => {
                    self.discard(&stored).await;
                    return Err(AppError::Storage(e.to_string()));
                }
            };

            rows.push(NewEvidence {
                incident_id,
                kind: EvidenceKind::from_mime(&file.mime_type),
                url: saved.url.clone(),
                file_name: file.file_name.clone(),
                mime_type: file.mime_type.clone(),
                size_bytes: file.data.len() as i64,
            });
            stored.push(saved);
        }

        match self.evidence.create_batch(&rows, now).await {
            Ok(created) => {
                tracing::info!(
                    "Attached {} evidence file(s) to incident {} by user {}",
                    created.len(),
                    incident_id,
                    requester.id
                );
                Ok(created)
            }
            Err(e) => {
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    /// Oldest first; same visibility rule as the incident
    pub async fn list(&self, incident_id: i64, requester: &AuthenticatedUser) -> Result<Vec<Evidence>> {
        let incident = self.find_incident(incident_id).await?;
        authorize(
            requester,
            Permission::ViewIncident {
                owner_id: incident.user_id,
            },
        )?;

        self.evidence.list_by_incident(incident_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::{IncidentType, NewIncident};
    use crate::features::users::models::{UserRole, UserStatus};
    use crate::shared::constants::MAX_EVIDENCE_FILE_SIZE;
    use crate::shared::test_helpers::{
        authenticated, InMemoryEvidenceRepository, InMemoryIncidentRepository, MemoryStorage,
    };
    use chrono::Duration;

    struct Fixture {
        evidence: Arc<InMemoryEvidenceRepository>,
        storage: Arc<MemoryStorage>,
        service: EvidenceService,
        incident_id: i64,
    }

    async fn setup(storage: MemoryStorage) -> Fixture {
        let incidents = Arc::new(InMemoryIncidentRepository::default());
        let evidence = Arc::new(InMemoryEvidenceRepository::default());
        let storage = Arc::new(storage);
        let incident = incidents
            .create(&NewIncident {
                user_id: 1,
                incident_type: IncidentType::Vandalism,
                description: "graffiti".to_string(),
                lat: 0.0,
                lng: 0.0,
                address: "Calle 2".to_string(),
                district: "Sur".to_string(),
                reported_at: Utc::now(),
            })
            .await
            .unwrap();
        let service = EvidenceService::new(incidents, evidence.clone(), storage.clone());
        Fixture {
            evidence,
            storage,
            service,
            incident_id: incident.id,
        }
    }

    fn file(name: &str, mime: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            data: vec![1; size],
        }
    }

    #[tokio::test]
    async fn test_owner_attaches_and_kinds_follow_mime() {
        let f = setup(MemoryStorage::default()).await;
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);

        let created = f
            .service
            .attach(
                f.incident_id,
                vec![file("a.jpg", "image/jpeg", 3), file("b.mp4", "video/mp4", 5)],
                &owner,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].kind, EvidenceKind::Image);
        assert_eq!(created[1].kind, EvidenceKind::Video);
        assert_eq!(created[1].size_bytes, 5);
        assert!(created[0].url.starts_with("/uploads/evidencia-"));
        assert!(created[0].url.ends_with(".jpg"));
        assert_eq!(f.storage.len(), 2);
    }

    #[tokio::test]
    async fn test_oversize_batch_attaches_nothing() {
        let f = setup(MemoryStorage::default()).await;
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);

        let result = f
            .service
            .attach(
                f.incident_id,
                vec![
                    file("ok.png", "image/png", 1),
                    file("big.png", "image/png", MAX_EVIDENCE_FILE_SIZE + 1),
                ],
                &owner,
                Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(f.storage.len(), 0);
        assert!(f.evidence.all().is_empty());
    }

    #[tokio::test]
    async fn test_too_many_files_attaches_nothing() {
        let f = setup(MemoryStorage::default()).await;
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);
        let files = (0..6).map(|i| file(&format!("{}.gif", i), "image/gif", 1)).collect();

        let result = f.service.attach(f.incident_id, files, &owner, Utc::now()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(f.evidence.all().is_empty());
    }

    #[tokio::test]
    async fn test_stranger_cannot_attach_or_list() {
        let f = setup(MemoryStorage::default()).await;
        let stranger = authenticated(2, UserRole::Citizen, UserStatus::Validated);

        let attach = f
            .service
            .attach(
                f.incident_id,
                vec![file("a.jpg", "image/jpeg", 1)],
                &stranger,
                Utc::now(),
            )
            .await;
        assert!(matches!(attach, Err(AppError::Forbidden(_))));
        assert!(matches!(
            f.service.list(f.incident_id, &stranger).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(f.storage.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_incident_is_not_found() {
        let f = setup(MemoryStorage::default()).await;
        let operator = authenticated(3, UserRole::Operator, UserStatus::Validated);

        assert!(matches!(
            f.service
                .attach(404, vec![file("a.jpg", "image/jpeg", 1)], &operator, Utc::now())
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_files() {
        let f = setup(MemoryStorage::default()).await;
        let operator = authenticated(3, UserRole::Operator, UserStatus::Validated);
        f.evidence.fail_next_insert();

        let result = f
            .service
            .attach(
                f.incident_id,
                vec![file("a.jpg", "image/jpeg", 1), file("b.png", "image/png", 1)],
                &operator,
                Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(f.storage.len(), 0);
    }

    #[tokio::test]
    async fn test_failed_store_removes_earlier_files() {
        let f = setup(MemoryStorage::failing_after(1)).await;
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);

        let result = f
            .service
            .attach(
                f.incident_id,
                vec![file("a.jpg", "image/jpeg", 1), file("b.png", "image/png", 1)],
                &owner,
                Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(f.storage.len(), 0);
        assert!(f.evidence.all().is_empty());
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let f = setup(MemoryStorage::default()).await;
        let owner = authenticated(1, UserRole::Citizen, UserStatus::Validated);
        let t0 = Utc::now();

        f.service
            .attach(f.incident_id, vec![file("late.jpg", "image/jpeg", 1)], &owner, t0 + Duration::minutes(5))
            .await
            .unwrap();
        f.service
            .attach(f.incident_id, vec![file("early.jpg", "image/jpeg", 1)], &owner, t0)
            .await
            .unwrap();

        let listed = f.service.list(f.incident_id, &owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].file_name, "early.jpg");
        assert_eq!(listed[1].file_name, "late.jpg");
    }
}
