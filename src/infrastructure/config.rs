use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DesignerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Remote backend bridge. When `base_url` is unset the local JSON store is used.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_sensors_path")]
    pub sensors_path: String,
    #[serde(default = "default_clients_path")]
    pub clients_path: String,
    #[serde(default = "default_client_active_path")]
    pub client_active_path: String,
    #[serde(default = "default_display_config_path")]
    pub display_config_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_storage_directory")]
    pub directory: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetSettings {
    #[serde(default = "default_assets_root")]
    pub root: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_sensors_path() -> String {
    "/sensors".to_string()
}

fn default_clients_path() -> String {
    "/clients".to_string()
}

fn default_client_active_path() -> String {
    "/clients/${client_id}/active".to_string()
}

fn default_display_config_path() -> String {
    "/clients/${client_id}/display-config".to_string()
}

fn default_storage_directory() -> String {
    "data".to_string()
}

fn default_assets_root() -> String {
    ".".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            sensors_path: default_sensors_path(),
            clients_path: default_clients_path(),
            client_active_path: default_client_active_path(),
            display_config_path: default_display_config_path(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            directory: default_storage_directory(),
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
        }
    }
}

/// `config/designer.{toml,...}` (optional) overlaid by `DESIGNER__SECTION__KEY` variables
pub fn load_designer_config() -> anyhow::Result<DesignerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/designer").required(false))
        .add_source(config::Environment::with_prefix("DESIGNER").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` variables in a path template, URL-encoding each value
pub fn prepare_path(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
