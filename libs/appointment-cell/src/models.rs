// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};

use doctor_cell::models::DoctorError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` on a quarter hour
    pub time: String,
    // Older records may lack the patient fields; requests still require them.
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub new_patient: bool,
}

impl Appointment {
    pub fn patient_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_on(&self, doctor_id: i64, date: &str) -> bool {
        self.doctor_id == doctor_id && self.date == date
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Typed form of a create-appointment body. `doctor_id` may be omitted, in
/// which case the doctor from the request path is used.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub id: i64,
    pub doctor_id: Option<i64>,
    pub date: String,
    pub time: String,
    pub first_name: String,
    pub last_name: String,
    pub new_patient: bool,
}

impl AppointmentRequest {
    pub fn into_appointment(self, doctor_id: i64) -> Appointment {
        Appointment {
            id: self.id,
            doctor_id,
            date: self.date,
            time: self.time,
            first_name: self.first_name,
            last_name: self.last_name,
            new_patient: self.new_patient,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteAppointmentQuery {
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedAppointmentResponse {
    pub success: bool,
    pub appointment: Appointment,
    pub message: String,
}

impl DeletedAppointmentResponse {
    pub fn new(appointment: Appointment) -> Self {
        let message = format!(
            "Appointment for {} on {} has been deleted.",
            appointment.patient_name(),
            appointment.date
        );
        Self {
            success: true,
            appointment,
            message,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Invalid appointment data format: {0}")]
    InvalidAppointmentData(String),

    #[error("Doctor {0} does not exist")]
    DoctorNotFound(i64),

    #[error("Incorrect date format, needs to be YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("Invalid time or time format, needs to be HH:MM")]
    InvalidTimeFormat,

    #[error("Invalid time or time format, minutes must be one of 00, 15, 30, 45")]
    InvalidTimeSlot,

    #[error("Doctor has too many appointments at this time {time}")]
    SlotFull { time: String },

    #[error("No appointment found with id {0}")]
    AppointmentNotFound(i64),

    #[error("Appointment {0} already exists")]
    DuplicateAppointmentId(i64),

    #[error("Missing appointment_id parameter")]
    MissingAppointmentId,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DoctorError> for AppointmentError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::Storage(msg) => AppointmentError::Storage(msg),
        }
    }
}
