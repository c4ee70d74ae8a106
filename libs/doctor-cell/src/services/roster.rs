use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_database::JsonDocument;

use crate::models::{Doctor, DoctorError};

/// Read-only source of the doctor roster.
#[async_trait]
pub trait DoctorRoster: Send + Sync {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorError>;
}

/// Roster backed by a JSON file. The file is re-read on every call so edits
/// made outside the service are picked up without a restart.
pub struct JsonFileDoctorRoster {
    document: JsonDocument,
}

impl JsonFileDoctorRoster {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            document: JsonDocument::doctors(config),
        }
    }
}

#[async_trait]
impl DoctorRoster for JsonFileDoctorRoster {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.document.read_all().await.map_err(|e| {
            error!("Failed to load doctor roster: {:#}", e);
            DoctorError::Storage(format!("{:#}", e))
        })
    }
}

#[derive(Default)]
pub struct InMemoryDoctorRoster {
    doctors: Vec<Doctor>,
}

impl InMemoryDoctorRoster {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }
}

#[async_trait]
impl DoctorRoster for InMemoryDoctorRoster {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.doctors.clone())
    }
}

/// True iff some doctor in `roster` has the given id.
pub fn doctor_exists(doctor_id: i64, roster: &[Doctor]) -> bool {
    roster.iter().any(|doctor| doctor.id == doctor_id)
}

#[derive(Clone)]
pub struct DoctorService {
    roster: Arc<dyn DoctorRoster>,
}

impl DoctorService {
    pub fn new(roster: Arc<dyn DoctorRoster>) -> Self {
        Self { roster }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Arc::new(JsonFileDoctorRoster::new(config)))
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let doctors = self.roster.list().await?;
        debug!("Loaded {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, DoctorError> {
        let doctors = self.roster.list().await?;
        Ok(doctor_exists(doctor_id, &doctors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Doctor> {
        vec![Doctor::new(1), Doctor::new(2), Doctor::new(7)]
    }

    #[test]
    fn known_ids_exist() {
        let roster = roster();
        for doctor in &roster {
            assert!(doctor_exists(doctor.id, &roster));
        }
    }

    #[test]
    fn unknown_ids_do_not_exist() {
        let roster = roster();
        assert!(!doctor_exists(3, &roster));
        assert!(!doctor_exists(-1, &roster));
        assert!(!doctor_exists(1, &[]));
    }

    #[tokio::test]
    async fn service_checks_in_memory_roster() {
        let service = DoctorService::new(Arc::new(InMemoryDoctorRoster::new(roster())));
        assert!(service.doctor_exists(7).await.unwrap());
        assert!(!service.doctor_exists(8).await.unwrap());
        assert_eq!(service.list_doctors().await.unwrap().len(), 3);
    }
}
