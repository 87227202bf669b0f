// Application state for HTTP handlers
use crate::application::client_service::ClientService;
use crate::application::designer_service::DesignerService;
use crate::infrastructure::local_assets::LocalAssets;

#[derive(Clone)]
pub struct AppState {
    pub designer: DesignerService,
    pub clients: ClientService,
    pub assets: LocalAssets,
}
