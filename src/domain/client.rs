// Display client domain model
use super::display_config::DisplayConfigDocument;
use super::document::Canvas;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayClient {
    pub mac_address: String,
    pub name: String,
    #[serde(default)]
    pub ip_address: String,
    pub resolution_width: u32,
    pub resolution_height: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub display_config: Option<DisplayConfigDocument>,
}

impl DisplayClient {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.resolution_width, self.resolution_height)
    }
}
