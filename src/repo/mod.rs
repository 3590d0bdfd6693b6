//! Persistence for the most recent heat-loss analysis.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::HeatLossResult;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("heat-loss store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("heat-loss store is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// What gets written: the result plus when it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHeatLoss {
    pub saved_at: DateTime<Utc>,
    pub result: HeatLossResult,
}

#[async_trait]
pub trait HeatLossRepository: Send + Sync {
    async fn save(&self, result: &HeatLossResult) -> Result<(), RepositoryError>;
    async fn load(&self) -> Result<Option<StoredHeatLoss>, RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    slot: RwLock<Option<StoredHeatLoss>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HeatLossRepository for InMemoryRepository {
    async fn save(&self, result: &HeatLossResult) -> Result<(), RepositoryError> {
        *self.slot.write().await = Some(StoredHeatLoss { saved_at: Utc::now(), result: result.clone() });
        Ok(())
    }

    async fn load(&self) -> Result<Option<StoredHeatLoss>, RepositoryError> {
        Ok(self.slot.read().await.clone())
    }
}

/// One JSON document on disk. A missing file loads as `None`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io { path: self.path.clone(), source }
    }
}

#[async_trait]
impl HeatLossRepository for JsonFileRepository {
    async fn save(&self, result: &HeatLossResult) -> Result<(), RepositoryError> {
        let stored = StoredHeatLoss { saved_at: Utc::now(), result: result.clone() };
        let body = serde_json::to_vec_pretty(&stored)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(|e| self.io_err(e))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), "heat-loss result saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<StoredHeatLoss>, RepositoryError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
