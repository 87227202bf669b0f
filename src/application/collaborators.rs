// Collaborator traits for everything the designer does not own
use crate::domain::client::DisplayClient;
use crate::domain::display_config::DisplayConfigDocument;
use crate::domain::sensor::Sensor;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

#[async_trait]
pub trait SensorCatalog: Send + Sync {
    /// All sensors currently reported by the backend
    async fn list_sensors(&self) -> anyhow::Result<Vec<Sensor>>;
}

#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Registered display clients keyed by client id
    async fn list_clients(&self) -> anyhow::Result<HashMap<String, DisplayClient>>;

    async fn set_client_active(&self, client_id: &str, active: bool) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// `None` when nothing has been saved for the client yet
    async fn load_display_config(
        &self,
        client_id: &str,
    ) -> anyhow::Result<Option<DisplayConfigDocument>>;

    async fn save_display_config(
        &self,
        client_id: &str,
        document: &DisplayConfigDocument,
    ) -> anyhow::Result<()>;
}

/// A file filter, e.g. `("Images", ["png", "jpg"])`
#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn images() -> Self {
        Self::new("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
    }
}

/// Chooses a file or directory. `None` means the choice was cancelled or rejected.
#[async_trait]
pub trait PathPicker: Send + Sync {
    async fn pick_file(&self, filters: &[FileFilter]) -> Option<PathBuf>;

    async fn pick_directory(&self) -> Option<PathBuf>;
}

/// Turns an image path into something a preview can display.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, path: &str) -> anyhow::Result<String>;
}
