// libs/appointment-cell/src/services/store.rs
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_database::JsonDocument;

use crate::models::{Appointment, AppointmentError};

/// Persistence contract for appointments. Each call is all-or-nothing;
/// nothing is promised across calls.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list(&self, doctor_id: i64, date: &str) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError>;

    async fn append(&self, appointment: Appointment) -> Result<(), AppointmentError>;

    async fn replace_all(&self, appointments: Vec<Appointment>) -> Result<(), AppointmentError>;

    async fn remove_by_id(&self, id: i64) -> Result<Option<Appointment>, AppointmentError>;
}

fn storage_error(e: anyhow::Error) -> AppointmentError {
    error!("Appointment storage failure: {:#}", e);
    AppointmentError::Storage(format!("{:#}", e))
}

/// Appointments kept in one JSON file, rewritten wholesale on every
/// mutation.
pub struct JsonFileAppointmentStore {
    document: JsonDocument,
    // Serializes the read-modify-write inside append/remove_by_id.
    io_lock: Mutex<()>,
}

impl JsonFileAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_document(JsonDocument::appointments(config))
    }

    pub fn with_document(document: JsonDocument) -> Self {
        Self {
            document,
            io_lock: Mutex::new(()),
        }
    }

    async fn load_raw(&self) -> Result<Vec<Value>, AppointmentError> {
        self.document.read_all().await.map_err(storage_error)
    }

    async fn load(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.load_raw().await?.iter().filter_map(decode).collect())
    }

    async fn save<T: serde::Serialize + Sync>(&self, records: &[T]) -> Result<(), AppointmentError> {
        self.document.write_all(records).await.map_err(storage_error)
    }
}

/// One stored record. Entries that are not appointments are skipped here but
/// left in the file by append and remove_by_id.
fn decode(record: &Value) -> Option<Appointment> {
    match serde_json::from_value(record.clone()) {
        Ok(appointment) => Some(appointment),
        Err(e) => {
            warn!("Skipping unreadable appointment record {}: {}", record, e);
            None
        }
    }
}

#[async_trait]
impl AppointmentStore for JsonFileAppointmentStore {
    async fn list(&self, doctor_id: i64, date: &str) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.load().await?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.is_on(doctor_id, date))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.load().await
    }

    async fn append(&self, appointment: Appointment) -> Result<(), AppointmentError> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.load_raw().await?;
        let record = serde_json::to_value(&appointment)
            .map_err(|e| storage_error(anyhow::Error::new(e).context("serializing appointment")))?;
        records.push(record);
        self.save(&records).await
    }

    async fn replace_all(&self, appointments: Vec<Appointment>) -> Result<(), AppointmentError> {
        let _guard = self.io_lock.lock().await;
        self.save(&appointments).await
    }

    async fn remove_by_id(&self, id: i64) -> Result<Option<Appointment>, AppointmentError> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.load_raw().await?;

        let found = records
            .iter()
            .enumerate()
            .find_map(|(index, record)| decode(record).filter(|a| a.id == id).map(|a| (index, a)));
        let Some((index, removed)) = found else {
            debug!("No stored appointment with id {}", id);
            return Ok(None);
        };

        records.remove(index);
        self.save(&records).await?;
        Ok(Some(removed))
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: RwLock::new(appointments),
        }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn list(&self, doctor_id: i64, date: &str) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self
            .appointments
            .read()
            .await
            .iter()
            .filter(|a| a.is_on(doctor_id, date))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.appointments.read().await.clone())
    }

    async fn append(&self, appointment: Appointment) -> Result<(), AppointmentError> {
        self.appointments.write().await.push(appointment);
        Ok(())
    }

    async fn replace_all(&self, appointments: Vec<Appointment>) -> Result<(), AppointmentError> {
        *self.appointments.write().await = appointments;
        Ok(())
    }

    async fn remove_by_id(&self, id: i64) -> Result<Option<Appointment>, AppointmentError> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments
            .iter()
            .position(|a| a.id == id)
            .map(|index| appointments.remove(index)))
    }
}
