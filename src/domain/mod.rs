// Domain layer - Designer model and collaborator data
pub mod client;
pub mod color;
pub mod display_config;
pub mod document;
pub mod element;
pub mod sensor;
