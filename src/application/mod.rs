// Application layer - Designer use cases and collaborator seams
pub mod client_service;
pub mod collaborators;
pub mod designer_service;
pub mod editor;
pub mod preview_renderer;
