// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentError, DeleteAppointmentQuery, DeletedAppointmentResponse,
};
use crate::services::AppointmentBookingService;

pub fn map_appointment_error(e: AppointmentError) -> AppError {
    let message = e.to_string();
    match e {
        AppointmentError::InvalidAppointmentData(_)
        | AppointmentError::InvalidDateFormat
        | AppointmentError::InvalidTimeFormat
        | AppointmentError::InvalidTimeSlot => AppError::ValidationError(message),
        AppointmentError::DoctorNotFound(_)
        | AppointmentError::SlotFull { .. }
        | AppointmentError::MissingAppointmentId => AppError::BadRequest(message),
        AppointmentError::AppointmentNotFound(_) => AppError::NotFound(message),
        AppointmentError::DuplicateAppointmentId(_) => AppError::Conflict(message),
        AppointmentError::Storage(msg) => AppError::Storage(msg),
    }
}

/// A path whose `doctor_id` is not an integer names no doctor, so it is a
/// 404 with the usual JSON error body rather than axum's plain-text reply.
fn doctor_path<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value).map_err(|rejection| {
        debug!("Unmatched appointment path: {}", rejection.body_text());
        AppError::NotFound("doctor_id must be an integer".to_string())
    })
}

#[axum::debug_handler]
pub async fn get_appointments_for_doctor_on_day(
    State(service): State<Arc<AppointmentBookingService>>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let (doctor_id, date) = doctor_path(path)?;
    let appointments = service
        .get_appointments_for_doctor_on_day(doctor_id, &date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(appointments))
}

/// The body is parsed here rather than by the `Json` extractor so that a
/// malformed body is reported like any other invalid appointment.
#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Appointment>, AppError> {
    let doctor_id = doctor_path(path)?;
    let candidate: Value = serde_json::from_slice(&body).map_err(|e| {
        map_appointment_error(AppointmentError::InvalidAppointmentData(e.to_string()))
    })?;

    let appointment = service
        .create_appointment(doctor_id, candidate)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<DeleteAppointmentQuery>,
) -> Result<Json<DeletedAppointmentResponse>, AppError> {
    let doctor_id = doctor_path(path)?;
    let raw_id = query
        .appointment_id
        .ok_or(AppointmentError::MissingAppointmentId)
        .map_err(map_appointment_error)?;
    let appointment_id: i64 = raw_id.trim().parse().map_err(|_| {
        map_appointment_error(AppointmentError::InvalidAppointmentData(format!(
            "appointment_id `{}` is not an integer",
            raw_id
        )))
    })?;

    let removed = service
        .delete_appointment(doctor_id, appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(DeletedAppointmentResponse::new(removed)))
}
