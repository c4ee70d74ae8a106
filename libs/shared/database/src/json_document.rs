use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, error};

use shared_config::AppConfig;

/// A JSON array persisted as a single file and rewritten in full on every
/// write.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn doctors(config: &AppConfig) -> Self {
        Self::new(config.doctors_path.clone())
    }

    pub fn appointments(config: &AppConfig) -> Self {
        Self::new(config.appointments_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record. A missing or blank file is an empty collection.
    pub async fn read_all<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        debug!("Reading {}", self.path.display());

        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Failed to read {}: {}", self.path.display(), e);
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("parsing {} as a JSON array", self.path.display()))
    }

    /// Replaces the file contents. The new document is written to a sibling
    /// temp file and renamed over the target, so readers never observe a
    /// partial write.
    pub async fn write_all<T>(&self, records: &[T]) -> Result<()>
    where
        T: Serialize,
    {
        let body = serde_json::to_string_pretty(records).context("serializing records")?;
        let tmp = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;

        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
