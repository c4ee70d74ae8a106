use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use tracing::debug;

use shared_config::{AppConfig, DEFAULT_MAX_APPOINTMENTS_PER_SLOT};

/// An `AppConfig` whose data files live in a private temp directory. The
/// directory is removed when the `TestConfig` is dropped, so keep it alive
/// for the duration of the test.
pub struct TestConfig {
    pub dir: TempDir,
    pub max_appointments_per_slot: usize,
    pub enforce_unique_appointment_ids: bool,
}

impl TestConfig {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            max_appointments_per_slot: DEFAULT_MAX_APPOINTMENTS_PER_SLOT,
            enforce_unique_appointment_ids: true,
        })
    }

    /// Seeds the roster with `Fixtures::default_doctors()` and leaves the
    /// appointments file absent.
    pub fn with_default_roster() -> std::io::Result<Self> {
        let config = Self::new()?;
        config.write_doctors(&Fixtures::default_doctors())?;
        Ok(config)
    }

    pub fn doctors_path(&self) -> PathBuf {
        self.dir.path().join("doctors.json")
    }

    pub fn appointments_path(&self) -> PathBuf {
        self.dir.path().join("appointments.json")
    }

    pub fn write_doctors(&self, doctors: &Value) -> std::io::Result<()> {
        debug!("Seeding test roster at {}", self.doctors_path().display());
        std::fs::write(self.doctors_path(), pretty(doctors))
    }

    pub fn write_appointments(&self, appointments: &Value) -> std::io::Result<()> {
        std::fs::write(self.appointments_path(), pretty(appointments))
    }

    pub fn read_appointments(&self) -> std::io::Result<Value> {
        let raw = std::fs::read_to_string(self.appointments_path())?;
        serde_json::from_str(&raw).map_err(std::io::Error::other)
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            doctors_path: self.doctors_path(),
            appointments_path: self.appointments_path(),
            max_appointments_per_slot: self.max_appointments_per_slot,
            enforce_unique_appointment_ids: self.enforce_unique_appointment_ids,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub struct Fixtures;

impl Fixtures {
    pub fn doctor(id: i64, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name
        })
    }

    pub fn default_doctors() -> Value {
        json!([
            Self::doctor(1, "Julius", "Hibbert"),
            Self::doctor(2, "Algernop", "Krieger"),
            Self::doctor(7, "Nick", "Riviera")
        ])
    }

    pub fn appointment(id: i64, doctor_id: i64, date: &str, time: &str) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "date": date,
            "time": time,
            "first_name": "Sterling",
            "last_name": "Archer",
            "new_patient": true
        })
    }

    /// `count` appointments for one doctor, all on the same date and time,
    /// with ids starting at `first_id`.
    pub fn full_slot(first_id: i64, count: usize, doctor_id: i64, date: &str, time: &str) -> Value {
        Value::Array(
            (0..count as i64)
                .map(|offset| Self::appointment(first_id + offset, doctor_id, date, time))
                .collect(),
        )
    }
}
