// libs/appointment-cell/src/services/validation.rs
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use tracing::debug;

use doctor_cell::models::Doctor;
use doctor_cell::services::doctor_exists;
use shared_config::DEFAULT_MAX_APPOINTMENTS_PER_SLOT;

use crate::models::{Appointment, AppointmentError, AppointmentRequest};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub const ALLOWED_MINUTES: [&str; 4] = ["00", "15", "30", "45"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Integer,
    String,
    Boolean,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Integer => value.is_i64(),
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "an integer",
            FieldType::String => "a string",
            FieldType::Boolean => "a boolean",
        }
    }
}

const APPOINTMENT_FIELDS: [(&str, FieldType); 7] = [
    ("id", FieldType::Integer),
    ("first_name", FieldType::String),
    ("last_name", FieldType::String),
    ("date", FieldType::String),
    ("doctor_id", FieldType::Integer),
    ("new_patient", FieldType::Boolean),
    ("time", FieldType::String),
];

/// `YYYY-MM-DD` that survives a parse/format round trip unchanged.
pub fn validate_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
        .unwrap_or(false)
}

/// Accepts 24-hour `HH:MM` on a quarter hour. A string that is not a time at
/// all is `InvalidTimeFormat`; a real time on another minute is
/// `InvalidTimeSlot`.
pub fn validate_time(time: &str) -> Result<(), AppointmentError> {
    let round_trips = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map(|parsed| parsed.format(TIME_FORMAT).to_string() == time)
        .unwrap_or(false);
    if !round_trips {
        return Err(AppointmentError::InvalidTimeFormat);
    }

    match time.split(':').nth(1) {
        Some(minutes) if ALLOWED_MINUTES.iter().any(|allowed| *allowed == minutes) => Ok(()),
        _ => Err(AppointmentError::InvalidTimeSlot),
    }
}

/// Type-checks the fields that are present. Absent fields pass here; the
/// conversion to `AppointmentRequest` is what requires them.
pub fn validate_appointment_shape(candidate: &Value) -> Result<(), AppointmentError> {
    let object = candidate.as_object().ok_or_else(|| {
        AppointmentError::InvalidAppointmentData("body must be a JSON object".to_string())
    })?;

    for (field, expected) in APPOINTMENT_FIELDS {
        if let Some(value) = object.get(field) {
            if !expected.matches(value) {
                return Err(AppointmentError::InvalidAppointmentData(format!(
                    "field `{}` must be {}",
                    field,
                    expected.name()
                )));
            }
        }
    }

    Ok(())
}

pub fn is_valid_appointment_shape(candidate: &Value) -> bool {
    validate_appointment_shape(candidate).is_ok()
}

pub fn parse_appointment_request(candidate: Value) -> Result<AppointmentRequest, AppointmentError> {
    validate_appointment_shape(&candidate)?;
    serde_json::from_value(candidate)
        .map_err(|e| AppointmentError::InvalidAppointmentData(e.to_string()))
}

/// True while fewer than `max_per_slot` of `existing` share `time`.
/// `existing` must already be narrowed to one doctor and date.
pub fn validate_slot_capacity(existing: &[Appointment], time: &str, max_per_slot: usize) -> bool {
    let mut count = 0;
    for appointment in existing {
        if appointment.time == time {
            count += 1;
        }
        if count >= max_per_slot {
            return false;
        }
    }
    // An empty day with a zero limit never enters the loop.
    max_per_slot > 0
}

/// The pure half of the admission algorithm: everything that can be decided
/// without looking at the booked appointments.
#[derive(Debug, Clone)]
pub struct AppointmentValidator {
    max_per_slot: usize,
}

impl Default for AppointmentValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_APPOINTMENTS_PER_SLOT)
    }
}

impl AppointmentValidator {
    pub fn new(max_per_slot: usize) -> Self {
        Self { max_per_slot }
    }

    pub fn max_per_slot(&self) -> usize {
        self.max_per_slot
    }

    /// Shape, doctor, time, then date. Returns the record that would be
    /// stored.
    pub fn validate_candidate(
        &self,
        doctor_id: i64,
        candidate: Value,
        roster: &[Doctor],
    ) -> Result<Appointment, AppointmentError> {
        let request = parse_appointment_request(candidate)?;

        if let Some(body_doctor_id) = request.doctor_id {
            if body_doctor_id != doctor_id {
                return Err(AppointmentError::InvalidAppointmentData(format!(
                    "doctor_id {} does not match doctor {} in the path",
                    body_doctor_id, doctor_id
                )));
            }
        }

        if !doctor_exists(doctor_id, roster) {
            return Err(AppointmentError::DoctorNotFound(doctor_id));
        }

        validate_time(&request.time)?;

        if !validate_date(&request.date) {
            return Err(AppointmentError::InvalidDateFormat);
        }

        debug!("Candidate appointment {} passed validation", request.id);
        Ok(request.into_appointment(doctor_id))
    }

    pub fn check_capacity(
        &self,
        existing: &[Appointment],
        candidate: &Appointment,
    ) -> Result<(), AppointmentError> {
        if validate_slot_capacity(existing, &candidate.time, self.max_per_slot) {
            Ok(())
        } else {
            Err(AppointmentError::SlotFull {
                time: candidate.time.clone(),
            })
        }
    }
}
