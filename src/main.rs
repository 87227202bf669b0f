// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::client_service::ClientService;
use crate::application::collaborators::{ClientRegistry, PersistenceGateway, SensorCatalog};
use crate::application::designer_service::DesignerService;
use crate::infrastructure::backend_repository::BackendRepository;
use crate::infrastructure::config::load_designer_config;
use crate::infrastructure::file_store::JsonFileStore;
use crate::infrastructure::local_assets::LocalAssets;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers;

type Collaborators = (
    Arc<dyn SensorCatalog>,
    Arc<dyn ClientRegistry>,
    Arc<dyn PersistenceGateway>,
);

/// One adapter serving all three backend-facing collaborators
fn collaborators<C>(adapter: Arc<C>) -> Collaborators
where
    C: SensorCatalog + ClientRegistry + PersistenceGateway + 'static,
{
    (adapter.clone(), adapter.clone(), adapter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG, default info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_designer_config()?;

    // Create collaborators (infrastructure layer)
    let (sensors, registry, gateway) = match &config.backend.base_url {
        Some(base_url) => {
            tracing::info!("Using device backend at {}", base_url);
            collaborators(Arc::new(BackendRepository::new(base_url.clone(), config.backend.clone())))
        }
        None => {
            tracing::info!("Using local JSON store in {}", config.storage.directory);
            collaborators(Arc::new(JsonFileStore::new(&config.storage.directory)))
        }
    };
    let assets = LocalAssets::new(&config.assets.root);

    // Create services (application layer)
    let designer = DesignerService::new(registry.clone(), gateway, Arc::new(assets.clone()));
    let clients = ClientService::new(registry, sensors, designer.clone());

    // Create application state
    let state = Arc::new(AppState {
        designer,
        clients,
        assets,
    });

    // Build router (presentation layer)
    // Note: responses are compressed in the response builders, not by a layer
    let router = Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/sensors", get(handlers::list_sensors))
        .route("/clients", get(handlers::list_clients))
        .route("/clients/:id/active", put(handlers::set_client_active))
        .route("/designer", get(handlers::get_designer).delete(handlers::unbind))
        .route("/designer/clients/:id", post(handlers::bind_client))
        .route("/designer/elements", post(handlers::add_element))
        .route("/designer/elements/:id/select", post(handlers::select_element))
        .route("/designer/selection", delete(handlers::deselect))
        .route("/designer/selection/element", delete(handlers::remove_element))
        .route("/designer/selection/duplicate", post(handlers::duplicate_element))
        .route("/designer/selection/reorder", post(handlers::reorder_element))
        .route("/designer/selection/type", put(handlers::set_element_type))
        .route("/designer/selection/nudge", post(handlers::nudge_element))
        .route("/designer/selection/position", put(handlers::place_element))
        .route("/designer/selection/config", patch(handlers::update_config))
        .route("/designer/selection/name", put(handlers::rename_element))
        .route("/designer/selection/image", post(handlers::pick_image_source))
        .route("/designer/save", post(handlers::save))
        .route("/designer/export", get(handlers::export_config))
        .route("/designer/import", post(handlers::import_config))
        .route("/designer/events", get(handlers::stream_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address '{}'", config.server.bind))?;
    tracing::info!("Starting display-designer service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
