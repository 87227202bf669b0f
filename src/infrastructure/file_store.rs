// Local JSON store - Collaborators backed by files, used when no backend is configured
use crate::application::collaborators::{ClientRegistry, PersistenceGateway, SensorCatalog};
use crate::domain::client::DisplayClient;
use crate::domain::display_config::DisplayConfigDocument;
use crate::domain::sensor::Sensor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const CLIENTS_FILE: &str = "clients.json";
const SENSORS_FILE: &str = "sensors.json";
const DISPLAYS_DIR: &str = "displays";

/// Layout under `directory`:
/// `clients.json` (client id -> client), `sensors.json` (sensor list),
/// `displays/<client>.json` (one display config per client).
#[derive(Debug)]
pub struct JsonFileStore {
    directory: PathBuf,
    clients_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            clients_lock: Mutex::new(()),
        }
    }

    fn display_path(&self, client_id: &str) -> PathBuf {
        self.directory
            .join(DISPLAYS_DIR)
            .join(format!("{}.json", file_stem(client_id)))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", path)),
        }
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize JSON")?;
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, bytes)
            .await
            .with_context(|| format!("Failed to write {:?}", temp))?;
        tokio::fs::rename(&temp, path)
            .await
            .with_context(|| format!("Failed to move {:?} into place", temp))?;
        Ok(())
    }
}

/// Client ids are MAC addresses or similar; keep them filesystem safe.
fn file_stem(client_id: &str) -> String {
    client_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[async_trait]
impl SensorCatalog for JsonFileStore {
    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        let path = self.directory.join(SENSORS_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ClientRegistry for JsonFileStore {
    async fn list_clients(&self) -> Result<HashMap<String, DisplayClient>> {
        let path = self.directory.join(CLIENTS_FILE);
        Ok(Self::read_json(&path).await?.unwrap_or_default())
    }

    async fn set_client_active(&self, client_id: &str, active: bool) -> Result<()> {
        let _guard = self.clients_lock.lock().await;
        let path = self.directory.join(CLIENTS_FILE);

        let mut clients: HashMap<String, DisplayClient> =
            Self::read_json(&path).await?.unwrap_or_default();
        let client = clients
            .get_mut(client_id)
            .with_context(|| format!("Client {} is not registered", client_id))?;
        client.active = active;

        Self::write_json(&path, &clients).await
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileStore {
    async fn load_display_config(&self, client_id: &str) -> Result<Option<DisplayConfigDocument>> {
        Self::read_json(&self.display_path(client_id)).await
    }

    async fn save_display_config(&self, client_id: &str, document: &DisplayConfigDocument) -> Result<()> {
        let path = self.display_path(client_id);
        Self::write_json(&path, document).await?;
        tracing::debug!("Wrote display config for {} to {:?}", client_id, path);
        Ok(())
    }
}
