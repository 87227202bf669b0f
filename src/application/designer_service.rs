// Designer service - One bound client, its document, loads, saves and change events
use crate::application::collaborators::{
    AssetResolver, ClientRegistry, FileFilter, PathPicker, PersistenceGateway,
};
use crate::application::editor::{
    ConditionalImagePatch, ConfigPatch, DesignerEditor, EditorError, StaticImagePatch,
};
use crate::application::preview_renderer::{render, VisualDescription};
use crate::domain::display_config::{DisplayConfigDocument, WireElement};
use crate::domain::document::Canvas;
use crate::domain::element::ElementType;
use crate::infrastructure::wire_mapper::{document_to_wire, element_to_wire};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum DesignerError {
    #[error("no client is bound to the designer")]
    NoClientBound,

    #[error("unknown client '{0}'")]
    UnknownClient(String),

    #[error("load for client '{0}' was superseded by a newer request")]
    StaleLoad(String),

    #[error("a {0} element has no image source to pick")]
    NotAnImageElement(ElementType),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("collaborator call failed: {0:#}")]
    CollaboratorFailure(anyhow::Error),
}

/// Issued when a load starts; the result is applied only while the ticket is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub client_id: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DesignerEvent {
    Bound { client_id: String },
    Unbound,
    Changed { client_id: String, revision: u64 },
    Saved { client_id: String, revision: u64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementView {
    #[serde(flatten)]
    pub element: WireElement,
    pub preview: VisualDescription,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignerView {
    pub client_id: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub selection: Option<String>,
    pub revision: u64,
    pub dirty: bool,
    pub elements: Vec<ElementView>,
}

struct BoundDesigner {
    client_id: String,
    editor: DesignerEditor,
    /// Bumped on every applied operation, selection changes included
    revision: u64,
    /// Elements as last loaded or saved
    persisted: Vec<WireElement>,
}

impl BoundDesigner {
    fn dirty(&self) -> bool {
        self.editor.serialize() != self.persisted
    }
}

#[derive(Default)]
struct Session {
    generation: u64,
    bound: Option<BoundDesigner>,
}

impl Session {
    fn bound_mut(&mut self) -> Result<&mut BoundDesigner, DesignerError> {
        self.bound.as_mut().ok_or(DesignerError::NoClientBound)
    }
}

#[derive(Clone)]
pub struct DesignerService {
    registry: Arc<dyn ClientRegistry>,
    gateway: Arc<dyn PersistenceGateway>,
    assets: Arc<dyn AssetResolver>,
    session: Arc<Mutex<Session>>,
    events: broadcast::Sender<DesignerEvent>,
}

impl DesignerService {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        gateway: Arc<dyn PersistenceGateway>,
        assets: Arc<dyn AssetResolver>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            registry,
            gateway,
            assets,
            session: Arc::new(Mutex::new(Session::default())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DesignerEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: DesignerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Bind the designer to a client and load its saved configuration.
    ///
    /// On failure the previously bound document stays in place.
    pub async fn bind_client(&self, client_id: &str) -> Result<DesignerView, DesignerError> {
        let ticket = self.begin_load(client_id).await;

        let clients = self
            .registry
            .list_clients()
            .await
            .map_err(DesignerError::CollaboratorFailure)?;
        let client = clients
            .get(client_id)
            .ok_or_else(|| DesignerError::UnknownClient(client_id.to_string()))?;

        let saved = self
            .gateway
            .load_display_config(client_id)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to load display config for {}: {:#}", client_id, e);
                DesignerError::CollaboratorFailure(e)
            })?;

        let elements = saved.map(|doc| doc.elements).unwrap_or_default();
        self.apply_load(&ticket, client.canvas(), elements).await
    }

    /// Start a load: every earlier ticket becomes stale.
    pub async fn begin_load(&self, client_id: &str) -> LoadTicket {
        let mut session = self.session.lock().await;
        session.generation += 1;
        LoadTicket {
            client_id: client_id.to_string(),
            generation: session.generation,
        }
    }

    /// Apply a finished load if its ticket is still current, otherwise discard it.
    pub async fn apply_load(
        &self,
        ticket: &LoadTicket,
        canvas: Canvas,
        elements: Vec<WireElement>,
    ) -> Result<DesignerView, DesignerError> {
        let mut session = self.session.lock().await;
        if session.generation != ticket.generation {
            tracing::debug!(
                client = %ticket.client_id,
                ticket = ticket.generation,
                current = session.generation,
                "Discarding stale display config load"
            );
            return Err(DesignerError::StaleLoad(ticket.client_id.clone()));
        }

        let editor = DesignerEditor::from_wire(canvas, elements);
        tracing::info!(
            client = %ticket.client_id,
            elements = editor.document().len(),
            "Designer bound to client ({}x{})",
            canvas.width,
            canvas.height
        );

        let bound = BoundDesigner {
            client_id: ticket.client_id.clone(),
            persisted: editor.serialize(),
            editor,
            revision: 0,
        };
        let view = self.view_of(&bound);
        session.bound = Some(bound);
        drop(session);

        self.publish(DesignerEvent::Bound {
            client_id: ticket.client_id.clone(),
        });
        Ok(view)
    }

    /// Drop the bound document; in-flight loads become stale.
    pub async fn unbind(&self) {
        let released = {
            let mut session = self.session.lock().await;
            session.generation += 1;
            session.bound.take()
        };
        if let Some(bound) = released {
            tracing::info!(client = %bound.client_id, "Designer unbound");
            self.publish(DesignerEvent::Unbound);
        }
    }

    /// Unbind when the bound client is no longer registered.
    pub async fn release_if_missing(&self, clients: &HashMap<String, impl Sized>) {
        let missing = {
            let session = self.session.lock().await;
            session
                .bound
                .as_ref()
                .is_some_and(|b| !clients.contains_key(&b.client_id))
        };
        if missing {
            self.unbind().await;
        }
    }

    pub async fn bound_client(&self) -> Option<String> {
        let session = self.session.lock().await;
        session.bound.as_ref().map(|b| b.client_id.clone())
    }

    pub async fn view(&self) -> Result<DesignerView, DesignerError> {
        let mut session = self.session.lock().await;
        let bound = session.bound_mut()?;
        Ok(self.view_of(bound))
    }

    /// Run one editor operation against the bound document.
    pub async fn edit<T, F>(&self, operation: F) -> Result<T, DesignerError>
    where
        F: FnOnce(&mut DesignerEditor) -> Result<T, EditorError>,
    {
        self.edit_then(operation, |_, _, output| output).await
    }

    /// Run one editor operation and return the view it produced, taken
    /// under the same lock so no other edit can slip in between.
    pub async fn edit_view<T, F>(&self, operation: F) -> Result<DesignerView, DesignerError>
    where
        F: FnOnce(&mut DesignerEditor) -> Result<T, EditorError>,
    {
        self.edit_then(operation, |service, bound, _| service.view_of(bound))
            .await
    }

    async fn edit_then<T, F, R, G>(&self, operation: F, finish: G) -> Result<R, DesignerError>
    where
        F: FnOnce(&mut DesignerEditor) -> Result<T, EditorError>,
        G: FnOnce(&Self, &BoundDesigner, T) -> R,
    {
        let mut session = self.session.lock().await;
        let bound = session.bound_mut()?;

        let output = operation(&mut bound.editor)?;
        bound.revision += 1;

        let event = DesignerEvent::Changed {
            client_id: bound.client_id.clone(),
            revision: bound.revision,
        };
        let result = finish(self, bound, output);
        drop(session);
        self.publish(event);
        Ok(result)
    }

    /// Replace the bound document with a supplied configuration, keeping the
    /// bound client's canvas.
    pub async fn import(&self, document: DisplayConfigDocument) -> Result<DesignerView, DesignerError> {
        let view = {
            let mut session = self.session.lock().await;
            let bound = session.bound_mut()?;
            let canvas = bound.editor.document().canvas();
            if (document.resolution_width, document.resolution_height) != (canvas.width, canvas.height) {
                tracing::warn!(
                    "Imported config is {}x{}, client canvas is {}x{}",
                    document.resolution_width,
                    document.resolution_height,
                    canvas.width,
                    canvas.height
                );
            }
            bound.editor.load(canvas, document.elements);
            bound.revision += 1;
            self.view_of(bound)
        };

        self.publish(DesignerEvent::Changed {
            client_id: view.client_id.clone(),
            revision: view.revision,
        });
        Ok(view)
    }

    pub async fn export(&self) -> Result<DisplayConfigDocument, DesignerError> {
        let mut session = self.session.lock().await;
        let bound = session.bound_mut()?;
        Ok(document_to_wire(bound.editor.document()))
    }

    /// Hand the serialized document to the persistence gateway.
    ///
    /// The document is not locked while the save is in flight; edits made
    /// meanwhile keep the document dirty.
    pub async fn save(&self) -> Result<u64, DesignerError> {
        let (client_id, generation, revision, document) = {
            let mut session = self.session.lock().await;
            let generation = session.generation;
            let bound = session.bound_mut()?;
            (
                bound.client_id.clone(),
                generation,
                bound.revision,
                document_to_wire(bound.editor.document()),
            )
        };

        self.gateway
            .save_display_config(&client_id, &document)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to save display config for {}: {:#}", client_id, e);
                DesignerError::CollaboratorFailure(e)
            })?;

        tracing::info!(client = %client_id, revision, "Saved display config");

        {
            let mut session = self.session.lock().await;
            if session.generation == generation {
                if let Some(bound) = session.bound.as_mut() {
                    bound.persisted = document.elements;
                }
            }
        }

        self.publish(DesignerEvent::Saved { client_id, revision });
        Ok(revision)
    }

    /// Ask the picker for an image file (static image) or image directory
    /// (conditional image) and store it on the selected element.
    ///
    /// Returns `None` when the pick was cancelled.
    pub async fn pick_image_source(
        &self,
        picker: &dyn PathPicker,
    ) -> Result<Option<String>, DesignerError> {
        let element_type = {
            let mut session = self.session.lock().await;
            let bound = session.bound_mut()?;
            bound
                .editor
                .document()
                .selected()
                .ok_or(EditorError::NoSelection)?
                .element_type()
        };

        let picked = match element_type {
            ElementType::StaticImage => picker.pick_file(&[FileFilter::images()]).await,
            ElementType::ConditionalImage => picker.pick_directory().await,
            other => return Err(DesignerError::NotAnImageElement(other)),
        };

        let Some(path) = picked else {
            return Ok(None);
        };
        let path = path.to_string_lossy().into_owned();

        let patch = match element_type {
            ElementType::StaticImage => ConfigPatch::StaticImage(StaticImagePatch {
                image_path: Some(path.clone()),
                ..StaticImagePatch::default()
            }),
            _ => ConfigPatch::ConditionalImage(ConditionalImagePatch {
                images_path: Some(path.clone()),
                ..ConditionalImagePatch::default()
            }),
        };

        self.edit(|editor| editor.update_selected_config(patch)).await?;
        Ok(Some(path))
    }

    fn view_of(&self, bound: &BoundDesigner) -> DesignerView {
        let document = bound.editor.document();
        let canvas = document.canvas();
        DesignerView {
            client_id: bound.client_id.clone(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            selection: document.selection().map(|id| id.to_string()),
            revision: bound.revision,
            dirty: bound.dirty(),
            elements: document
                .elements()
                .iter()
                .map(|element| ElementView {
                    element: element_to_wire(element),
                    preview: render(&element.config, self.assets.as_ref()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::editor::{Direction, MoveBounds};
    use crate::domain::client::DisplayClient;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::{oneshot, Notify};

    fn client(width: u32, height: u32) -> DisplayClient {
        DisplayClient {
            mac_address: "00:11:22:33:44:55".to_string(),
            name: "panel".to_string(),
            ip_address: "10.0.0.2".to_string(),
            resolution_width: width,
            resolution_height: height,
            active: true,
            last_seen: None,
            display_config: None,
        }
    }

    struct FakeRegistry {
        clients: HashMap<String, DisplayClient>,
    }

    #[async_trait]
    impl ClientRegistry for FakeRegistry {
        async fn list_clients(&self) -> anyhow::Result<HashMap<String, DisplayClient>> {
            Ok(self.clients.clone())
        }

        async fn set_client_active(&self, _client_id: &str, _active: bool) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeGateway {
        stored: StdMutex<HashMap<String, DisplayConfigDocument>>,
        fail_saves: bool,
        started: Notify,
        gate: StdMutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl PersistenceGateway for FakeGateway {
        async fn load_display_config(&self, client_id: &str) -> anyhow::Result<Option<DisplayConfigDocument>> {
            if client_id == "slow" {
                self.started.notify_one();
                let gate = self.gate.lock().unwrap().take();
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
            }
            Ok(self.stored.lock().unwrap().get(client_id).cloned())
        }

        async fn save_display_config(
            &self,
            client_id: &str,
            document: &DisplayConfigDocument,
        ) -> anyhow::Result<()> {
            if self.fail_saves {
                anyhow::bail!("backend rejected the save");
            }
            self.stored.lock().unwrap().insert(client_id.to_string(), document.clone());
            Ok(())
        }
    }

    struct NoAssets;

    impl AssetResolver for NoAssets {
        fn resolve(&self, path: &str) -> anyhow::Result<String> {
            anyhow::bail!("{} not found", path)
        }
    }

    struct FixedPicker(Option<PathBuf>);

    #[async_trait]
    impl PathPicker for FixedPicker {
        async fn pick_file(&self, _filters: &[FileFilter]) -> Option<PathBuf> {
            self.0.clone()
        }

        async fn pick_directory(&self) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    fn service_with(gateway: Arc<FakeGateway>) -> DesignerService {
        let registry = FakeRegistry {
            clients: HashMap::from([
                ("desk".to_string(), client(800, 600)),
                ("slow".to_string(), client(320, 240)),
                ("fast".to_string(), client(480, 320)),
            ]),
        };
        DesignerService::new(Arc::new(registry), gateway, Arc::new(NoAssets))
    }

    #[tokio::test]
    async fn test_edits_require_bound_client() {
        let service = service_with(Arc::new(FakeGateway::default()));
        let result = service.edit(|editor| Ok(editor.add_element())).await;
        assert!(matches!(result, Err(DesignerError::NoClientBound)));
    }

    #[tokio::test]
    async fn test_bind_loads_saved_elements_and_selects_first() {
        let gateway = Arc::new(FakeGateway::default());
        let saved: DisplayConfigDocument = serde_json::from_value(json!({
            "resolution_width": 800,
            "resolution_height": 600,
            "elements": [
                {"id": "1", "name": "Temp", "element_type": "text", "x": 5, "y": 6,
                 "text_config": {"format": "{value}{unit}"}},
                {"id": "2", "element_type": "graph", "x": 10, "y": 10}
            ]
        }))
        .unwrap();
        gateway.stored.lock().unwrap().insert("desk".to_string(), saved);

        let service = service_with(gateway);
        let view = service.bind_client("desk").await.unwrap();

        assert_eq!((view.canvas_width, view.canvas_height), (800, 600));
        assert_eq!(view.elements.len(), 2);
        assert_eq!(view.selection.as_deref(), Some("1"));
        assert!(!view.dirty);
        assert!(matches!(view.elements[1].preview, VisualDescription::Graph { .. }));
    }

    #[tokio::test]
    async fn test_bind_unknown_client_keeps_previous_binding() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();

        let result = service.bind_client("nope").await;
        assert!(matches!(result, Err(DesignerError::UnknownClient(_))));
        assert_eq!(service.bound_client().await.as_deref(), Some("desk"));
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let gateway = Arc::new(FakeGateway::default());
        let (release, gate) = oneshot::channel();
        *gateway.gate.lock().unwrap() = Some(gate);

        let service = service_with(gateway.clone());
        let slow = {
            let service = service.clone();
            tokio::spawn(async move { service.bind_client("slow").await })
        };

        gateway.started.notified().await;
        service.bind_client("fast").await.unwrap();
        release.send(()).unwrap();

        let result = slow.await.unwrap();
        assert!(matches!(result, Err(DesignerError::StaleLoad(ref id)) if id == "slow"));

        let view = service.view().await.unwrap();
        assert_eq!(view.client_id, "fast");
        assert_eq!((view.canvas_width, view.canvas_height), (480, 320));
    }

    #[tokio::test]
    async fn test_load_after_unbind_is_stale() {
        let service = service_with(Arc::new(FakeGateway::default()));
        let ticket = service.begin_load("desk").await;
        service.unbind().await;

        let result = service.apply_load(&ticket, Canvas::new(10, 10), Vec::new()).await;
        assert!(matches!(result, Err(DesignerError::StaleLoad(_))));
        assert!(service.bound_client().await.is_none());
    }

    #[tokio::test]
    async fn test_save_round_trips_through_gateway() {
        let gateway = Arc::new(FakeGateway::default());
        let service = service_with(gateway.clone());
        service.bind_client("desk").await.unwrap();

        service.edit(|editor| Ok(editor.add_element())).await.unwrap();
        service
            .edit(|editor| editor.move_selected_to(900, 900, MoveBounds::Canvas))
            .await
            .unwrap();
        assert!(service.view().await.unwrap().dirty);

        service.save().await.unwrap();
        assert!(!service.view().await.unwrap().dirty);

        let stored = gateway.stored.lock().unwrap().get("desk").cloned().unwrap();
        assert_eq!(stored.resolution_width, 800);
        assert_eq!(stored.elements.len(), 1);
        assert_eq!((stored.elements[0].x, stored.elements[0].y), (700, 580));
    }

    #[tokio::test]
    async fn test_selection_changes_do_not_dirty_saved_document() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();
        service.edit(|editor| Ok(editor.add_element())).await.unwrap();
        let second = service.edit(|editor| Ok(editor.add_element())).await.unwrap();
        service.save().await.unwrap();

        service.edit(|editor| Ok(editor.move_element(Direction::Down))).await.unwrap();
        service
            .edit(|editor| {
                editor.deselect();
                Ok(())
            })
            .await
            .unwrap();
        let view = service.edit_view(|editor| Ok(editor.select(&second))).await.unwrap();

        assert_eq!(view.selection.as_deref(), Some(second.as_str()));
        assert_eq!(view.revision, 5);
        assert!(!view.dirty);

        let view = service
            .edit_view(|editor| editor.move_selected_by(5, 0))
            .await
            .unwrap();
        assert!(view.dirty);
    }

    #[tokio::test]
    async fn test_edit_view_reflects_the_edit() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();

        let view = service.edit_view(|editor| Ok(editor.add_element())).await.unwrap();
        assert_eq!(view.revision, 1);
        assert_eq!(view.elements.len(), 1);
        assert_eq!(view.selection.as_deref(), Some(view.elements[0].element.id.as_str()));

        let result = service.edit_view(|editor| editor.duplicate_element()).await;
        assert_eq!(result.unwrap().elements.len(), 2);

        service.unbind().await;
        let result = service.edit_view(|editor| Ok(editor.add_element())).await;
        assert!(matches!(result, Err(DesignerError::NoClientBound)));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_document_dirty() {
        let gateway = Arc::new(FakeGateway {
            fail_saves: true,
            ..FakeGateway::default()
        });
        let service = service_with(gateway);
        service.bind_client("desk").await.unwrap();
        service.edit(|editor| Ok(editor.add_element())).await.unwrap();

        let result = service.save().await;
        assert!(matches!(result, Err(DesignerError::CollaboratorFailure(_))));

        let view = service.view().await.unwrap();
        assert!(view.dirty);
        assert_eq!(view.elements.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_edit_does_not_bump_revision() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();

        let result = service.edit(|editor| editor.remove_element()).await;
        assert!(matches!(result, Err(DesignerError::Editor(EditorError::NoSelection))));
        assert_eq!(service.view().await.unwrap().revision, 0);
    }

    #[tokio::test]
    async fn test_edit_publishes_change_event() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();
        let mut events = service.subscribe();

        service.edit(|editor| Ok(editor.add_element())).await.unwrap();
        service.edit(|editor| Ok(editor.move_element(Direction::Up))).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            DesignerEvent::Changed { client_id: "desk".to_string(), revision: 1 }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            DesignerEvent::Changed { client_id: "desk".to_string(), revision: 2 }
        );
    }

    #[tokio::test]
    async fn test_pick_image_source_updates_selected_element() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();
        service.edit(|editor| Ok(editor.add_element())).await.unwrap();

        let picker = FixedPicker(Some(PathBuf::from("/images/logo.png")));
        let result = service.pick_image_source(&picker).await;
        assert!(matches!(result, Err(DesignerError::NotAnImageElement(ElementType::Text))));

        service
            .edit(|editor| editor.set_element_type(ElementType::StaticImage))
            .await
            .unwrap();
        let picked = service.pick_image_source(&picker).await.unwrap();
        assert_eq!(picked.as_deref(), Some("/images/logo.png"));

        let exported = service.export().await.unwrap();
        let image = exported.elements[0].image_config.clone().unwrap();
        assert_eq!(image.image_path, "/images/logo.png");

        let cancelled = service.pick_image_source(&FixedPicker(None)).await.unwrap();
        assert_eq!(cancelled, None);
    }

    #[tokio::test]
    async fn test_import_replaces_elements_on_bound_canvas() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();

        let document: DisplayConfigDocument = serde_json::from_value(json!({
            "resolution_width": 1024,
            "resolution_height": 768,
            "elements": [{"element_type": "conditional-image", "x": 3, "y": 4}]
        }))
        .unwrap();

        let view = service.import(document).await.unwrap();
        assert_eq!((view.canvas_width, view.canvas_height), (800, 600));
        assert_eq!(view.elements.len(), 1);
        assert!(view.elements[0].element.conditional_image_config.is_some());
        assert!(view.dirty);
    }

    #[tokio::test]
    async fn test_release_if_missing_unbinds() {
        let service = service_with(Arc::new(FakeGateway::default()));
        service.bind_client("desk").await.unwrap();

        service.release_if_missing(&HashMap::from([("desk".to_string(), ())])).await;
        assert!(service.bound_client().await.is_some());

        service.release_if_missing(&HashMap::<String, ()>::new()).await;
        assert!(service.bound_client().await.is_none());
    }
}
