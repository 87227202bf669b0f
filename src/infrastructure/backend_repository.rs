// Backend bridge repository - Collaborators served by the remote device backend
use crate::application::collaborators::{ClientRegistry, PersistenceGateway, SensorCatalog};
use crate::domain::client::DisplayClient;
use crate::domain::display_config::DisplayConfigDocument;
use crate::domain::sensor::Sensor;
use crate::infrastructure::config::{prepare_path, BackendSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct BackendRepository {
    base_url: String,
    token: Option<String>,
    paths: BackendSettings,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ActiveUpdate {
    active: bool,
}

impl BackendRepository {
    pub fn new(base_url: String, settings: BackendSettings) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            paths: settings,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, template: &str, client_id: Option<&str>) -> String {
        let mut vars = HashMap::new();
        if let Some(id) = client_id {
            vars.insert("client_id".to_string(), id.to_string());
        }
        format!("{}{}", self.base_url, prepare_path(template, &vars))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend {} failed with status {}: {}", what, status, body);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to backend", what))?;

        Self::check(response, what)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse backend {} response", what))
    }
}

#[async_trait]
impl SensorCatalog for BackendRepository {
    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        let url = self.url(&self.paths.sensors_path, None);
        self.get_json(&url, "sensor list").await
    }
}

#[async_trait]
impl ClientRegistry for BackendRepository {
    async fn list_clients(&self) -> Result<HashMap<String, DisplayClient>> {
        let url = self.url(&self.paths.clients_path, None);
        let clients: HashMap<String, DisplayClient> = self.get_json(&url, "client list").await?;
        tracing::debug!("Backend reported {} clients", clients.len());
        Ok(clients)
    }

    async fn set_client_active(&self, client_id: &str, active: bool) -> Result<()> {
        let url = self.url(&self.paths.client_active_path, Some(client_id));
        let response = self
            .authorize(self.client.put(&url))
            .json(&ActiveUpdate { active })
            .send()
            .await
            .context("Failed to send client update to backend")?;

        Self::check(response, "client update").await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for BackendRepository {
    async fn load_display_config(&self, client_id: &str) -> Result<Option<DisplayConfigDocument>> {
        let url = self.url(&self.paths.display_config_path, Some(client_id));
        tracing::debug!("GET {}", url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to send display config request to backend")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document = Self::check(response, "display config load")
            .await?
            .json::<Option<DisplayConfigDocument>>()
            .await
            .context("Failed to parse display config from backend")?;

        Ok(document)
    }

    async fn save_display_config(&self, client_id: &str, document: &DisplayConfigDocument) -> Result<()> {
        let url = self.url(&self.paths.display_config_path, Some(client_id));
        let response = self
            .authorize(self.client.put(&url))
            .json(document)
            .send()
            .await
            .context("Failed to send display config to backend")?;

        Self::check(response, "display config save").await?;
        Ok(())
    }
}
