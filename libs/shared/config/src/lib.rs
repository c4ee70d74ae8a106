use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_MAX_APPOINTMENTS_PER_SLOT: usize = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub doctors_path: PathBuf,
    pub appointments_path: PathBuf,
    pub max_appointments_per_slot: usize,
    pub enforce_unique_appointment_ids: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            doctors_path: PathBuf::from("./doctors.json"),
            appointments_path: PathBuf::from("./appointments.json"),
            max_appointments_per_slot: DEFAULT_MAX_APPOINTMENTS_PER_SLOT,
            enforce_unique_appointment_ids: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST")
                .unwrap_or_else(|_| {
                    warn!("HOST not set, using default {}", defaults.host);
                    defaults.host.clone()
                }),
            port: parse_var("PORT", defaults.port),
            doctors_path: env::var("DOCTORS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("DOCTORS_FILE not set, using default {}", defaults.doctors_path.display());
                    defaults.doctors_path.clone()
                }),
            appointments_path: env::var("APPOINTMENTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENTS_FILE not set, using default {}", defaults.appointments_path.display());
                    defaults.appointments_path.clone()
                }),
            max_appointments_per_slot: parse_var(
                "MAX_APPOINTMENTS_PER_SLOT",
                defaults.max_appointments_per_slot,
            ),
            enforce_unique_appointment_ids: parse_var(
                "ENFORCE_UNIQUE_APPOINTMENT_IDS",
                defaults.enforce_unique_appointment_ids,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - data files missing");
        }

        config
    }

    /// The roster file exists on disk. The appointments file is created on
    /// the first write, so a fresh deployment only needs the roster.
    pub fn is_configured(&self) -> bool {
        Path::new(&self.doctors_path).exists()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", name, default);
            default
        }
    }
}
