pub mod roster;

pub use roster::{
    doctor_exists, DoctorRoster, DoctorService, InMemoryDoctorRoster, JsonFileDoctorRoster,
};
