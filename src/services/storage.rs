use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::AppError;

const CURRENT_TRIP_FILE: &str = "current_trip.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurrentTrip {
    trip_id: String,
}

/// Small on-device state kept outside the database: which trip is open.
#[derive(Clone)]
pub struct DeviceStorage {
    root: Arc<PathBuf>,
}

impl DeviceStorage {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    fn current_trip_path(&self) -> PathBuf {
        self.root().join(CURRENT_TRIP_FILE)
    }

    pub async fn save_current_trip(&self, trip_id: &str) -> Result<(), AppError> {
        self.ensure_structure().await?;
        let data = serde_json::to_vec_pretty(&CurrentTrip {
            trip_id: trip_id.to_string(),
        })
        .map_err(|err| AppError::Other(err.into()))?;
        fs::write(self.current_trip_path(), data).await?;
        debug!(%trip_id, "current trip saved");
        Ok(())
    }

    pub async fn current_trip(&self) -> Result<Option<String>, AppError> {
        let path = self.current_trip_path();
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read(&path).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        let current: CurrentTrip =
            serde_json::from_slice(&raw).map_err(|err| AppError::Other(err.into()))?;
        Ok(Some(current.trip_id))
    }

    pub async fn clear_current_trip(&self) -> Result<(), AppError> {
        let path = self.current_trip_path();
        if fs::try_exists(&path).await? {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
