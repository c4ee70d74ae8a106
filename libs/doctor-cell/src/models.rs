use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A roster entry. Only `id` is interpreted; every other field is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Doctor {
    pub fn new(id: i64) -> Self {
        Self { id, details: Map::new() }
    }
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor roster unavailable: {0}")]
    Storage(String),
}
