use axum::{extract::State, Json};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{Doctor, DoctorError};
use crate::services::DoctorService;

pub(crate) fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::Storage(msg) => AppError::Storage(msg),
    }
}

#[axum::debug_handler]
pub async fn get_doctors(
    State(service): State<DoctorService>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    debug!("Listing doctors");

    let doctors = service.list_doctors().await.map_err(map_doctor_error)?;

    Ok(Json(doctors))
}
