//! In-memory adapters and fixtures shared by unit and HTTP tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use fake::faker::address::en::StreetName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::evidence::models::{Evidence, NewEvidence};
use crate::features::evidence::repository::EvidenceRepository;
use crate::features::incidents::models::{
    Incident, IncidentFilter, IncidentStat, IncidentStatus, NewIncident,
};
use crate::features::incidents::repository::IncidentRepository;
use crate::features::users::models::{NewUser, ProfileChanges, User, UserRole, UserStatus};
use crate::features::users::password::PasswordHasher;
use crate::features::users::repository::UserRepository;
use crate::features::users::services::{IdentityService, Registration};
use crate::modules::mailer::{MailError, Mailer};
use crate::modules::storage::{FileStorage, StorageError, StoredFile};

// =============================================================================
// FIXTURES
// =============================================================================

/// Cheap argon2 parameters so tests stay fast
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        token_ttl_hours: 24,
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
    }
}

pub fn user_fixture(id: i64, role: UserRole, status: UserStatus) -> User {
    let now = Utc::now();
    User {
        id,
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        dni: format!("{:08}", id.rem_euclid(100_000_000)),
        address: StreetName().fake(),
        phone: "1123456789".to_string(),
        email: format!("user{}-{}@example.com", id, Uuid::new_v4().simple()),
        password_hash: String::new(),
        face_photo: "face.jpg".to_string(),
        id_front_photo: "front.jpg".to_string(),
        id_back_photo: "back.jpg".to_string(),
        status,
        role,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn authenticated(id: i64, role: UserRole, status: UserStatus) -> AuthenticatedUser {
    AuthenticatedUser::from(&user_fixture(id, role, status))
}

/// Registration with password `secret123`
pub fn registration(dni: &str, email: &str) -> Registration {
    Registration {
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        dni: dni.to_string(),
        address: StreetName().fake(),
        phone: "1123456789".to_string(),
        email: email.to_string(),
        password: "secret123".to_string(),
        face_photo: "face.jpg".to_string(),
        id_front_photo: "front.jpg".to_string(),
        id_back_photo: "back.jpg".to_string(),
    }
}

pub fn identity_service(
    repo: Arc<InMemoryUserRepository>,
    mailer: Arc<dyn Mailer>,
) -> IdentityService {
    let hasher = PasswordHasher::from_config(&auth_config()).unwrap();
    IdentityService::new(repo, hasher, mailer)
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn set_status(&self, id: i64, status: UserStatus) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.status = status;
        }
    }

    pub fn set_role(&self, id: i64, role: UserRole) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
    }

    /// Store a fixture under the next free id
    pub fn insert(&self, mut user: User) -> User {
        let mut users = self.users.lock().unwrap();
        user.id = users.len() as i64 + 1;
        users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email_or_dni(&self, email: &str, dni: &str) -> Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == email || u.dni == dni))
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == user.email || u.dni == user.dni)
        {
            return Err(AppError::Conflict(
                "Email or DNI already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: users.len() as i64 + 1,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            dni: user.dni.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            face_photo: user.face_photo.clone(),
            id_front_photo: user.id_front_photo.clone(),
            id_back_photo: user.id_back_photo.clone(),
            status: user.status,
            role: user.role,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &changes.address {
            user.address = v.clone();
        }
        if let Some(v) = &changes.phone {
            user.phone = v.clone();
        }
        user.updated_at = at;
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, password_hash: &str, at: DateTime<Utc>) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = at;
        }
        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

// =============================================================================
// INCIDENTS
// =============================================================================

#[derive(Default)]
pub struct InMemoryIncidentRepository {
    incidents: Mutex<Vec<Incident>>,
}

fn newest_first(incidents: &mut [Incident]) {
    incidents.sort_by(|a, b| b.reported_at.cmp(&a.reported_at).then(b.id.cmp(&a.id)));
}

fn matches_filter(incident: &Incident, filter: &IncidentFilter) -> bool {
    filter.status.map_or(true, |s| incident.status == s)
        && filter.incident_type.map_or(true, |t| incident.incident_type == t)
        && filter
            .district
            .as_deref()
            .map_or(true, |d| incident.district == d)
        && filter.from.map_or(true, |from| incident.reported_at >= from)
        && filter.to.map_or(true, |to| incident.reported_at <= to)
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn create(&self, incident: &NewIncident) -> Result<Incident> {
        let mut incidents = self.incidents.lock().unwrap();
        let created = Incident {
            id: incidents.len() as i64 + 1,
            user_id: incident.user_id,
            incident_type: incident.incident_type,
            description: incident.description.clone(),
            lat: incident.lat,
            lng: incident.lng,
            address: incident.address.clone(),
            district: incident.district.clone(),
            status: IncidentStatus::Received,
            reported_at: incident.reported_at,
            updated_at: incident.reported_at,
        };
        incidents.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Incident>> {
        Ok(self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Incident>> {
        let mut found: Vec<Incident> = self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>> {
        let mut found: Vec<Incident> = self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .filter(|i| matches_filter(i, filter))
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Incident>> {
        let mut incidents = self.incidents.lock().unwrap();
        let Some(incident) = incidents.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        incident.status = status;
        incident.updated_at = at;
        Ok(Some(incident.clone()))
    }

    async fn stats(&self) -> Result<Vec<IncidentStat>> {
        let incidents = self.incidents.lock().unwrap();
        let mut stats: Vec<IncidentStat> = Vec::new();
        for incident in incidents.iter() {
            match stats.iter_mut().find(|s| {
                s.incident_type == incident.incident_type
                    && s.status == incident.status
                    && s.district == incident.district
            }) {
                Some(stat) => stat.total += 1,
                None => stats.push(IncidentStat {
                    incident_type: incident.incident_type,
                    status: incident.status,
                    district: incident.district.clone(),
                    total: 1,
                }),
            }
        }
        stats.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.district.cmp(&b.district))
                .then_with(|| (a.incident_type as i32).cmp(&(b.incident_type as i32)))
                .then_with(|| (a.status as i32).cmp(&(b.status as i32)))
        });
        Ok(stats)
    }
}

// =============================================================================
// EVIDENCE
// =============================================================================

#[derive(Default)]
pub struct InMemoryEvidenceRepository {
    evidence: Mutex<Vec<Evidence>>,
    fail_next: AtomicBool,
}

impl InMemoryEvidenceRepository {
    pub fn all(&self) -> Vec<Evidence> {
        self.evidence.lock().unwrap().clone()
    }

    /// Make the next `create_batch` fail like a dropped connection
    pub fn fail_next_insert(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn oldest_first(mut found: Vec<Evidence>) -> Vec<Evidence> {
        found.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then(a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl EvidenceRepository for InMemoryEvidenceRepository {
    async fn create_batch(&self, items: &[NewEvidence], at: DateTime<Utc>) -> Result<Vec<Evidence>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut evidence = self.evidence.lock().unwrap();
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = Evidence {
                id: evidence.len() as i64 + 1,
                incident_id: item.incident_id,
                kind: item.kind,
                url: item.url.clone(),
                file_name: item.file_name.clone(),
                mime_type: item.mime_type.clone(),
                size_bytes: item.size_bytes,
                uploaded_at: at,
            };
            evidence.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn list_by_incident(&self, incident_id: i64) -> Result<Vec<Evidence>> {
        let found = self
            .evidence
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.incident_id == incident_id)
            .cloned()
            .collect();
        Ok(Self::oldest_first(found))
    }

    async fn list_by_incidents(&self, incident_ids: &[i64]) -> Result<Vec<Evidence>> {
        let found = self
            .evidence
            .lock()
            .unwrap()
            .iter()
            .filter(|e| incident_ids.contains(&e.incident_id))
            .cloned()
            .collect();
        Ok(Self::oldest_first(found))
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Keeps stored files in a map keyed by generated name
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    stores: AtomicUsize,
    fail_after: Option<usize>,
}

impl MemoryStorage {
    /// Accept `n` files, then fail every later store
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn store(&self, data: &[u8], extension: &str) -> std::result::Result<StoredFile, StorageError> {
        let attempt = self.stores.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| attempt >= n) {
            return Err(StorageError::Io {
                path: "memory".to_string(),
                source: std::io::Error::other("disk full"),
            });
        }

        let key = format!("evidencia-{}.{}", Uuid::new_v4(), extension);
        self.files.lock().unwrap().push((key.clone(), data.to_vec()));
        Ok(StoredFile {
            url: format!("/uploads/{}", key),
            key,
        })
    }

    async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        self.files.lock().unwrap().retain(|(k, _)| k != key);
        Ok(())
    }
}

// =============================================================================
// MAIL
// =============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<String>>,
    delivered: Notify,
}

impl RecordingMailer {
    /// Recipients in send order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until `count` emails were sent by background tasks
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                let sent = self.sent();
                if sent.len() >= count {
                    return sent;
                }
                self.delivered.notified().await;
            }
        })
        .await
        .expect("mailer was not called in time")
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_validation_email(&self, email: &str, _name: &str) -> std::result::Result<(), MailError> {
        self.sent.lock().unwrap().push(email.to_string());
        self.delivered.notify_one();
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_validation_email(&self, _email: &str, _name: &str) -> std::result::Result<(), MailError> {
        Err(MailError::Transport("relay unreachable".to_string()))
    }
}
