// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::AppointmentBookingService;

pub fn appointment_routes(service: Arc<AppointmentBookingService>) -> Router {
    Router::new()
        .route(
            "/appointments/{doctor_id}/{date}/",
            get(handlers::get_appointments_for_doctor_on_day),
        )
        .route(
            "/appointments/{doctor_id}/{date}",
            get(handlers::get_appointments_for_doctor_on_day),
        )
        .route(
            "/appointments/{doctor_id}/",
            post(handlers::create_appointment).delete(handlers::delete_appointment),
        )
        .route(
            "/appointments/{doctor_id}",
            post(handlers::create_appointment).delete(handlers::delete_appointment),
        )
        .with_state(service)
}
