use axum::{routing::get, Router};

use crate::handlers;
use crate::services::DoctorService;

pub fn doctor_routes(service: DoctorService) -> Router {
    Router::new()
        .route("/doctors", get(handlers::get_doctors))
        .route("/doctors/", get(handlers::get_doctors))
        .with_state(service)
}
