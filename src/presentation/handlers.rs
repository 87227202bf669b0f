// HTTP request handlers
use crate::application::designer_service::DesignerError;
use crate::application::editor::{ConfigPatch, Direction, EditorError, MoveBounds};
use crate::domain::display_config::DisplayConfigDocument;
use crate::domain::element::{ElementId, ElementType};
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::local_assets::RequestedPathPicker;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub direction: Direction,
}

#[derive(Deserialize)]
pub struct TypeRequest {
    pub element_type: ElementType,
}

#[derive(Deserialize)]
pub struct NudgeRequest {
    #[serde(default)]
    pub dx: i64,
    #[serde(default)]
    pub dy: i64,
}

#[derive(Deserialize)]
pub struct PositionRequest {
    pub x: i64,
    pub y: i64,
    #[serde(default)]
    pub bounds: MoveBounds,
}

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

#[derive(Deserialize)]
pub struct PickRequest {
    pub path: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct SaveBody {
    revision: u64,
}

#[derive(Serialize)]
struct PickBody {
    path: Option<String>,
}

fn error_status(error: &DesignerError) -> StatusCode {
    match error {
        DesignerError::NoClientBound | DesignerError::StaleLoad(_) => StatusCode::CONFLICT,
        DesignerError::UnknownClient(_) => StatusCode::NOT_FOUND,
        DesignerError::NotAnImageElement(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DesignerError::Editor(EditorError::NoSelection) => StatusCode::CONFLICT,
        DesignerError::Editor(EditorError::TypeMismatch { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        DesignerError::CollaboratorFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response {
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn error_response(error: DesignerError, compress: bool) -> Response {
    let status = error_status(&error);
    if status.is_server_error() {
        tracing::warn!("Request failed: {}", error);
    } else {
        tracing::debug!("Request rejected: {}", error);
    }
    let body = ErrorBody {
        error: error.to_string(),
    };
    respond(status, &body, compress).await
}

async fn result_response<T: Serialize>(result: Result<T, DesignerError>, compress: bool) -> Response {
    match result {
        Ok(data) => respond(StatusCode::OK, &data, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_sensors(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);
    match state.clients.list_sensors().await {
        Ok(sensors) => respond(StatusCode::OK, &sensors, compress).await,
        Err(e) => error_response(DesignerError::CollaboratorFailure(e), compress).await,
    }
}

pub async fn list_clients(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);
    match state.clients.list_clients().await {
        Ok(clients) => respond(StatusCode::OK, &clients, compress).await,
        Err(e) => error_response(DesignerError::CollaboratorFailure(e), compress).await,
    }
}

pub async fn set_client_active(
    Path(client_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActiveRequest>,
) -> Response {
    let result = state.clients.set_client_active(&client_id, request.active).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn bind_client(
    Path(client_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.designer.bind_client(&client_id).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn unbind(State(state): State<Arc<AppState>>) -> StatusCode {
    state.designer.unbind().await;
    StatusCode::NO_CONTENT
}

pub async fn get_designer(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    result_response(state.designer.view().await, accepts_brotli(&headers)).await
}

pub async fn add_element(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.designer.edit_view(|editor| Ok(editor.add_element())).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn select_element(
    Path(element_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let id = ElementId::from(element_id);
    let result = state.designer.edit_view(|editor| Ok(editor.select(&id))).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn deselect(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state
        .designer
        .edit_view(|editor| {
            editor.deselect();
            Ok(())
        })
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn remove_element(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.designer.edit_view(|editor| editor.remove_element()).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn duplicate_element(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.designer.edit_view(|editor| editor.duplicate_element()).await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn reorder_element(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| Ok(editor.move_element(request.direction)))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn set_element_type(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<TypeRequest>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| editor.set_element_type(request.element_type))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn nudge_element(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NudgeRequest>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| editor.move_selected_by(request.dx, request.dy))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn place_element(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PositionRequest>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| editor.move_selected_to(request.x, request.y, request.bounds))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn update_config(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| editor.update_selected_config(patch))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn rename_element(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NameRequest>,
) -> Response {
    let result = state
        .designer
        .edit_view(|editor| editor.rename_selected(request.name))
        .await;
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn pick_image_source(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PickRequest>,
) -> Response {
    let picker = RequestedPathPicker::new(state.assets.clone(), request.path);
    let result = state
        .designer
        .pick_image_source(&picker)
        .await
        .map(|path| PickBody { path });
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn save(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.designer.save().await.map(|revision| SaveBody { revision });
    result_response(result, accepts_brotli(&headers)).await
}

pub async fn export_config(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    result_response(state.designer.export().await, accepts_brotli(&headers)).await
}

pub async fn import_config(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(document): Json<DisplayConfigDocument>,
) -> Response {
    result_response(state.designer.import(document).await, accepts_brotli(&headers)).await
}

/// Stream designer change events (progressive preview refresh)
pub async fn stream_events(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rx = state.designer.subscribe();
    stream_from_receiver(rx, accepts_brotli(&headers)).await
}
