pub mod booking;
pub mod store;
pub mod validation;

pub use booking::AppointmentBookingService;
pub use store::{AppointmentStore, InMemoryAppointmentStore, JsonFileAppointmentStore};
pub use validation::AppointmentValidator;
