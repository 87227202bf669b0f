// Infrastructure layer - External dependencies and adapters
pub mod backend_repository;
pub mod chunked_json;
pub mod config;
pub mod file_store;
pub mod http_response;
pub mod local_assets;
pub mod wire_mapper;
