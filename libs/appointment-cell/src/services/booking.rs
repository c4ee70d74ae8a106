// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use doctor_cell::services::{DoctorService, JsonFileDoctorRoster};
use shared_config::AppConfig;

use crate::models::{Appointment, AppointmentError};
use crate::services::store::{AppointmentStore, JsonFileAppointmentStore};
use crate::services::validation::{validate_date, AppointmentValidator};

pub struct AppointmentBookingService {
    doctors: DoctorService,
    store: Arc<dyn AppointmentStore>,
    validator: AppointmentValidator,
    enforce_unique_ids: bool,
    // Held across the read and write phases of every mutation so creates
    // and deletes never interleave.
    write_lock: Mutex<()>,
}

impl AppointmentBookingService {
    pub fn new(doctors: DoctorService, store: Arc<dyn AppointmentStore>, config: &AppConfig) -> Self {
        Self {
            doctors,
            store,
            validator: AppointmentValidator::new(config.max_appointments_per_slot),
            enforce_unique_ids: config.enforce_unique_appointment_ids,
            write_lock: Mutex::new(()),
        }
    }

    /// File-backed roster and store at the paths named in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DoctorService::new(Arc::new(JsonFileDoctorRoster::new(config))),
            Arc::new(JsonFileAppointmentStore::new(config)),
            config,
        )
    }

    pub fn doctors(&self) -> &DoctorService {
        &self.doctors
    }

    async fn ensure_doctor_exists(&self, doctor_id: i64) -> Result<(), AppointmentError> {
        if self.doctors.doctor_exists(doctor_id).await? {
            Ok(())
        } else {
            warn!("Doctor {} does not exist", doctor_id);
            Err(AppointmentError::DoctorNotFound(doctor_id))
        }
    }

    /// Appointments for one doctor on one date, in booking order. An empty
    /// day is an empty list, not an error.
    pub async fn get_appointments_for_doctor_on_day(
        &self,
        doctor_id: i64,
        date: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for doctor {} on {}", doctor_id, date);

        if !validate_date(date) {
            return Err(AppointmentError::InvalidDateFormat);
        }
        self.ensure_doctor_exists(doctor_id).await?;

        self.store.list(doctor_id, date).await
    }

    /// Runs the admission checks in order and stores the appointment if all
    /// of them pass: shape, doctor, time, date, slot capacity, id uniqueness.
    pub async fn create_appointment(
        &self,
        doctor_id: i64,
        candidate: Value,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Creating appointment for doctor {}", doctor_id);

        let roster = self.doctors.list_doctors().await?;
        let appointment = self
            .validator
            .validate_candidate(doctor_id, candidate, &roster)
            .inspect_err(|e| warn!("Rejected appointment for doctor {}: {}", doctor_id, e))?;

        let _guard = self.write_lock.lock().await;

        let existing = self.store.list(doctor_id, &appointment.date).await?;
        if let Err(e) = self.validator.check_capacity(&existing, &appointment) {
            warn!(
                "Doctor {} already has {} appointments at {} on {}",
                doctor_id,
                self.validator.max_per_slot(),
                appointment.time,
                appointment.date
            );
            return Err(e);
        }

        if self.enforce_unique_ids {
            let all = self.store.list_all().await?;
            if all.iter().any(|a| a.id == appointment.id) {
                warn!("Appointment id {} is already taken", appointment.id);
                return Err(AppointmentError::DuplicateAppointmentId(appointment.id));
            }
        }

        self.store.append(appointment.clone()).await?;

        info!(
            "Booked appointment {} with doctor {} on {} at {}",
            appointment.id, doctor_id, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Removes the appointment with `appointment_id`. The doctor must exist;
    /// the appointment is matched on id alone.
    pub async fn delete_appointment(
        &self,
        doctor_id: i64,
        appointment_id: i64,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Deleting appointment {} for doctor {}", appointment_id, doctor_id);

        self.ensure_doctor_exists(doctor_id).await?;

        let _guard = self.write_lock.lock().await;

        match self.store.remove_by_id(appointment_id).await? {
            Some(removed) => {
                info!(
                    "Deleted appointment {} for {} on {}",
                    removed.id,
                    removed.patient_name(),
                    removed.date
                );
                Ok(removed)
            }
            None => {
                warn!("No appointment with id {}", appointment_id);
                Err(AppointmentError::AppointmentNotFound(appointment_id))
            }
        }
    }
}
