// Client service - Use cases for listing clients and sensors
use crate::application::collaborators::{ClientRegistry, SensorCatalog};
use crate::application::designer_service::{DesignerError, DesignerService};
use crate::domain::client::DisplayClient;
use crate::domain::sensor::Sensor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct ClientService {
    registry: Arc<dyn ClientRegistry>,
    sensors: Arc<dyn SensorCatalog>,
    designer: DesignerService,
    clients: Arc<RwLock<HashMap<String, DisplayClient>>>,
}

impl ClientService {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        sensors: Arc<dyn SensorCatalog>,
        designer: DesignerService,
    ) -> Self {
        Self {
            registry,
            sensors,
            designer,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Refresh the client list. A designer bound to a client that disappeared is released.
    pub async fn list_clients(&self) -> anyhow::Result<HashMap<String, DisplayClient>> {
        let clients = self.registry.list_clients().await?;
        self.designer.release_if_missing(&clients).await;
        *self.clients.write().await = clients.clone();
        Ok(clients)
    }

    /// Sensors sorted by label
    pub async fn list_sensors(&self) -> anyhow::Result<Vec<Sensor>> {
        let mut sensors = self.sensors.list_sensors().await?;
        sensors.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(sensors)
    }

    /// Flip a client's active flag in the cached list first, reverting it if
    /// the registry rejects the change. The cache is refreshed from the
    /// registry when it does not know the client yet.
    pub async fn set_client_active(
        &self,
        client_id: &str,
        active: bool,
    ) -> Result<DisplayClient, DesignerError> {
        if self.cached_client(client_id).await.is_none() {
            self.list_clients()
                .await
                .map_err(DesignerError::CollaboratorFailure)?;
        }

        let previous = {
            let mut clients = self.clients.write().await;
            let client = clients
                .get_mut(client_id)
                .ok_or_else(|| DesignerError::UnknownClient(client_id.to_string()))?;
            std::mem::replace(&mut client.active, active)
        };

        if let Err(e) = self.registry.set_client_active(client_id, active).await {
            tracing::warn!("Reverting active={} for client {}: {:#}", active, client_id, e);
            if let Some(client) = self.clients.write().await.get_mut(client_id) {
                client.active = previous;
            }
            return Err(DesignerError::CollaboratorFailure(e));
        }

        tracing::info!(client = %client_id, active, "Client active flag updated");
        self.cached_client(client_id)
            .await
            .ok_or_else(|| DesignerError::UnknownClient(client_id.to_string()))
    }

    pub async fn cached_client(&self, client_id: &str) -> Option<DisplayClient> {
        self.clients.read().await.get(client_id).cloned()
    }
}
