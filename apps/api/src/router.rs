use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentBookingService;
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    // One roster shared by both cells.
    let booking = Arc::new(AppointmentBookingService::from_config(&config));
    let doctors = booking.doctors().clone();

    Router::new()
        .route("/", get(|| async { "Clinic Scheduler API is running!" }))
        .merge(doctor_routes(doctors))
        .merge(appointment_routes(booking))
}
