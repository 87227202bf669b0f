// Designer editor - Edit operations over a designer document
use crate::domain::color::Rgba;
use crate::domain::display_config::WireElement;
use crate::domain::document::{Canvas, DesignerDocument};
use crate::domain::element::{
    floor_at_zero, lenient_number, Alignment, DisplayElement, ElementConfig, ElementId, ElementType,
    GraphKind, Position,
};
use crate::infrastructure::wire_mapper::{elements_from_wire, elements_to_wire};
use serde::{Deserialize, Deserializer};

/// Offset applied to a duplicated element, on both axes
pub const DUPLICATE_OFFSET: i64 = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EditorError {
    #[error("no element is selected")]
    NoSelection,

    #[error("config patch for {found} cannot be applied to a {expected} element")]
    TypeMismatch {
        expected: ElementType,
        found: ElementType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Clamping policy for absolute moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveBounds {
    /// Floor at 0 only
    #[default]
    Unbounded,
    /// Keep the whole element inside the canvas (pointer drag)
    Canvas,
}

/// Present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextPatch {
    pub format: Option<String>,
    #[serde(alias = "fontFamily")]
    pub font_family: Option<String>,
    #[serde(alias = "fontSize")]
    pub font_size: Option<u32>,
    #[serde(alias = "fontColor")]
    pub font_color: Option<Rgba>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(alias = "textAlign")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticImagePatch {
    #[serde(alias = "imagePath")]
    pub image_path: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// `min_value`/`max_value` distinguish "absent" (keep) from `null` or `""` (clear).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphPatch {
    #[serde(alias = "sensorId")]
    pub sensor_id: Option<String>,
    #[serde(default, alias = "minValue", deserialize_with = "present_or_null")]
    pub min_value: Option<Option<f64>>,
    #[serde(default, alias = "maxValue", deserialize_with = "present_or_null")]
    pub max_value: Option<Option<f64>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(alias = "type")]
    pub graph_type: Option<GraphKind>,
    pub color: Option<Rgba>,
    #[serde(alias = "strokeWidth")]
    pub stroke_width: Option<u32>,
    #[serde(alias = "backgroundColor")]
    pub background_color: Option<Rgba>,
    #[serde(alias = "borderColor")]
    pub border_color: Option<Rgba>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConditionalImagePatch {
    #[serde(alias = "sensorId")]
    pub sensor_id: Option<String>,
    #[serde(alias = "imagesPath")]
    pub images_path: Option<String>,
    #[serde(default, alias = "minValue", deserialize_with = "present_or_null")]
    pub min_value: Option<Option<f64>>,
    #[serde(default, alias = "maxValue", deserialize_with = "present_or_null")]
    pub max_value: Option<Option<f64>>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "element_type", rename_all = "kebab-case")]
pub enum ConfigPatch {
    Text(TextPatch),
    StaticImage(StaticImagePatch),
    Graph(GraphPatch),
    ConditionalImage(ConditionalImagePatch),
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ConfigPatch {
    pub fn element_type(&self) -> ElementType {
        match self {
            ConfigPatch::Text(_) => ElementType::Text,
            ConfigPatch::StaticImage(_) => ElementType::StaticImage,
            ConfigPatch::Graph(_) => ElementType::Graph,
            ConfigPatch::ConditionalImage(_) => ElementType::ConditionalImage,
        }
    }

    /// Merge into `config`, leaving it untouched on a type mismatch.
    pub fn apply_to(self, config: &mut ElementConfig) -> Result<(), EditorError> {
        let mismatch = EditorError::TypeMismatch {
            expected: config.element_type(),
            found: self.element_type(),
        };

        match (self, config) {
            (ConfigPatch::Text(p), ElementConfig::Text(c)) => {
                merge(&mut c.format, p.format);
                merge(&mut c.font_family, p.font_family);
                merge(&mut c.font_size, p.font_size);
                merge(&mut c.font_color, p.font_color);
                merge(&mut c.width, p.width);
                merge(&mut c.height, p.height);
                merge(&mut c.alignment, p.alignment);
            }
            (ConfigPatch::StaticImage(p), ElementConfig::StaticImage(c)) => {
                merge(&mut c.image_path, p.image_path);
                merge(&mut c.width, p.width);
                merge(&mut c.height, p.height);
            }
            (ConfigPatch::Graph(p), ElementConfig::Graph(c)) => {
                merge(&mut c.sensor_id, p.sensor_id);
                merge(&mut c.min_value, p.min_value);
                merge(&mut c.max_value, p.max_value);
                merge(&mut c.width, p.width);
                merge(&mut c.height, p.height);
                merge(&mut c.graph_type, p.graph_type);
                merge(&mut c.color, p.color);
                merge(&mut c.stroke_width, p.stroke_width);
                merge(&mut c.background_color, p.background_color);
                merge(&mut c.border_color, p.border_color);
            }
            (ConfigPatch::ConditionalImage(p), ElementConfig::ConditionalImage(c)) => {
                merge(&mut c.sensor_id, p.sensor_id);
                merge(&mut c.images_path, p.images_path);
                merge(&mut c.min_value, p.min_value);
                merge(&mut c.max_value, p.max_value);
                merge(&mut c.width, p.width);
                merge(&mut c.height, p.height);
            }
            _ => return Err(mismatch),
        }

        Ok(())
    }
}

/// Owns one designer document and applies edit operations to it.
///
/// Every operation either applies completely or leaves the document as it was.
#[derive(Debug, Clone)]
pub struct DesignerEditor {
    document: DesignerDocument,
}

impl DesignerEditor {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            document: DesignerDocument::new(canvas),
        }
    }

    /// Editor over a document rebuilt from wire elements, first element selected.
    pub fn from_wire(canvas: Canvas, elements: Vec<WireElement>) -> Self {
        let mut editor = Self::new(canvas);
        editor.load(canvas, elements);
        editor
    }

    pub fn document(&self) -> &DesignerDocument {
        &self.document
    }

    pub fn add_element(&mut self) -> ElementId {
        let element = DisplayElement::new(
            ElementConfig::default_for(ElementType::Text),
            Position::default(),
        );
        let id = self.document.push(element);
        self.document.select(&id);
        tracing::debug!(element = %id, "Added element");
        id
    }

    pub fn remove_element(&mut self) -> Result<DisplayElement, EditorError> {
        let index = self.document.selected_index().ok_or(EditorError::NoSelection)?;
        let removed = self.document.remove_at(index);
        self.document.deselect();
        tracing::debug!(element = %removed.id, "Removed element");
        Ok(removed)
    }

    pub fn duplicate_element(&mut self) -> Result<ElementId, EditorError> {
        let original = self.document.selected().ok_or(EditorError::NoSelection)?;

        let mut copy = DisplayElement::new(
            original.config.clone(),
            original.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
        );
        copy.name = format!("{} Copy", original.name);

        let id = self.document.push(copy);
        self.document.select(&id);
        tracing::debug!(element = %id, "Duplicated element");
        Ok(id)
    }

    /// Swap the selected element with its neighbour. Returns whether anything moved.
    pub fn move_element(&mut self, direction: Direction) -> bool {
        let Some(index) = self.document.selected_index() else {
            return false;
        };

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.document.len() => index + 1,
            _ => return false,
        };

        self.document.swap(index, target);
        true
    }

    /// Replace the selected element's type; its config is reset to the new type's defaults.
    pub fn set_element_type(&mut self, element_type: ElementType) -> Result<(), EditorError> {
        let element = self.document.selected_mut().ok_or(EditorError::NoSelection)?;
        element.config = ElementConfig::default_for(element_type);
        Ok(())
    }

    /// Nudge: each axis is floored at 0, no upper bound.
    pub fn move_selected_by(&mut self, dx: i64, dy: i64) -> Result<Position, EditorError> {
        let element = self.document.selected_mut().ok_or(EditorError::NoSelection)?;
        element.position = element.position.offset(dx, dy);
        Ok(element.position)
    }

    /// Absolute placement. With `MoveBounds::Canvas` the element stays fully
    /// inside the canvas; an element larger than the canvas is pinned at 0.
    pub fn move_selected_to(
        &mut self,
        x: i64,
        y: i64,
        bounds: MoveBounds,
    ) -> Result<Position, EditorError> {
        let canvas = self.document.canvas();
        let element = self.document.selected_mut().ok_or(EditorError::NoSelection)?;

        let mut position = Position::new(floor_at_zero(x), floor_at_zero(y));
        if bounds == MoveBounds::Canvas {
            let (width, height) = element.size();
            position.x = position.x.min(canvas.width.saturating_sub(width));
            position.y = position.y.min(canvas.height.saturating_sub(height));
        }

        element.position = position;
        Ok(position)
    }

    /// Unknown ids are ignored.
    pub fn select(&mut self, id: &ElementId) -> bool {
        self.document.select(id)
    }

    pub fn deselect(&mut self) {
        self.document.deselect();
    }

    pub fn update_selected_config(&mut self, patch: ConfigPatch) -> Result<(), EditorError> {
        let element = self.document.selected_mut().ok_or(EditorError::NoSelection)?;

        let mut config = element.config.clone();
        patch.apply_to(&mut config)?;
        element.config = config.normalized();
        Ok(())
    }

    pub fn rename_selected(&mut self, name: String) -> Result<(), EditorError> {
        let element = self.document.selected_mut().ok_or(EditorError::NoSelection)?;
        element.name = name;
        Ok(())
    }

    pub fn serialize(&self) -> Vec<WireElement> {
        elements_to_wire(self.document.elements())
    }

    /// Replace the whole document and select its first element.
    pub fn load(&mut self, canvas: Canvas, elements: Vec<WireElement>) {
        let mut document = DesignerDocument::with_elements(canvas, elements_from_wire(elements));
        if let Some(first) = document.elements().first().map(|e| e.id.clone()) {
            document.select(&first);
        }
        self.document = document;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::{ConditionalImageConfig, GraphConfig, TextConfig};
    use serde_json::json;

    fn editor() -> DesignerEditor {
        DesignerEditor::new(Canvas::new(800, 600))
    }

    fn selected_config(editor: &DesignerEditor) -> ElementConfig {
        editor.document().selected().unwrap().config.clone()
    }

    #[test]
    fn test_add_element_on_empty_document() {
        let mut editor = editor();
        let id = editor.add_element();

        let document = editor.document();
        assert_eq!(document.len(), 1);
        let element = &document.elements()[0];
        assert_eq!(element.id, id);
        assert_eq!(element.element_type(), ElementType::Text);
        assert_eq!(element.position, Position::new(0, 0));
        assert_eq!(element.name, format!("Element {}", id));
        assert_eq!(document.selection(), Some(&id));
    }

    #[test]
    fn test_remove_requires_selection() {
        let mut editor = editor();
        assert_eq!(editor.remove_element(), Err(EditorError::NoSelection));

        editor.add_element();
        editor.add_element();
        let removed = editor.remove_element().unwrap();
        assert_eq!(editor.document().len(), 1);
        assert!(!editor.document().contains(&removed.id));
        assert_eq!(editor.document().selection(), None);
    }

    #[test]
    fn test_duplicate_offsets_and_copies() {
        let mut editor = editor();
        assert_eq!(editor.duplicate_element(), Err(EditorError::NoSelection));

        let original = editor.add_element();
        editor.move_selected_to(30, 40, MoveBounds::Unbounded).unwrap();
        editor
            .update_selected_config(ConfigPatch::Text(TextPatch {
                format: Some("{value} {unit}".to_string()),
                ..TextPatch::default()
            }))
            .unwrap();

        let copy = editor.duplicate_element().unwrap();
        let document = editor.document();
        assert_eq!(document.len(), 2);
        assert_ne!(copy, original);
        assert_eq!(document.selection(), Some(&copy));

        let source = document.get(&original).unwrap();
        let duplicate = document.get(&copy).unwrap();
        assert_eq!(duplicate.position, Position::new(40, 50));
        assert_eq!(duplicate.name, format!("{} Copy", source.name));
        assert_eq!(duplicate.config, source.config);

        // Independent after copying
        editor.rename_selected("Changed".to_string()).unwrap();
        editor
            .update_selected_config(ConfigPatch::Text(TextPatch {
                font_size: Some(30),
                ..TextPatch::default()
            }))
            .unwrap();
        assert_ne!(
            editor.document().get(&original).unwrap().config,
            editor.document().get(&copy).unwrap().config
        );
    }

    #[test]
    fn test_duplicate_is_not_clamped_to_canvas() {
        let mut editor = DesignerEditor::new(Canvas::new(50, 50));
        editor.add_element();
        editor.move_selected_to(45, 45, MoveBounds::Unbounded).unwrap();
        editor.duplicate_element().unwrap();
        assert_eq!(editor.document().selected().unwrap().position, Position::new(55, 55));
    }

    #[test]
    fn test_move_element_reorders_and_keeps_selection() {
        let elements = serde_json::from_value(json!([
            {"id": "A", "element_type": "text", "x": 0, "y": 0},
            {"id": "B", "element_type": "graph", "x": 50, "y": 50}
        ]))
        .unwrap();
        let mut editor = DesignerEditor::from_wire(Canvas::new(800, 600), elements);
        let b = ElementId::from("B");
        editor.select(&b);

        assert!(editor.move_element(Direction::Up));
        let order: Vec<&str> = editor.document().elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert_eq!(editor.document().selection(), Some(&b));

        // Already at the head
        assert!(!editor.move_element(Direction::Up));
        assert!(editor.move_element(Direction::Down));
        assert!(!editor.move_element(Direction::Down));
    }

    #[test]
    fn test_move_element_without_selection_is_noop() {
        let mut editor = editor();
        editor.add_element();
        editor.deselect();
        assert!(!editor.move_element(Direction::Down));
    }

    #[test]
    fn test_set_element_type_discards_previous_config() {
        let mut editor = editor();
        editor.add_element();
        editor
            .update_selected_config(ConfigPatch::Text(TextPatch {
                format: Some("{value}".to_string()),
                ..TextPatch::default()
            }))
            .unwrap();

        editor.set_element_type(ElementType::Graph).unwrap();
        let element = editor.document().selected().unwrap();
        assert_eq!(element.element_type(), ElementType::Graph);
        assert_eq!(element.config, ElementConfig::Graph(GraphConfig::default()));

        editor.deselect();
        assert_eq!(editor.set_element_type(ElementType::Text), Err(EditorError::NoSelection));
    }

    #[test]
    fn test_move_selected_by_never_goes_negative() {
        let mut editor = editor();
        editor.add_element();

        assert_eq!(editor.move_selected_by(5, 3).unwrap(), Position::new(5, 3));
        assert_eq!(editor.move_selected_by(-100, 1).unwrap(), Position::new(0, 4));
        assert_eq!(editor.move_selected_by(i64::MIN / 4, i64::MIN / 4).unwrap(), Position::new(0, 0));
        // No upper clamp on the nudge path
        assert_eq!(editor.move_selected_by(2000, 2000).unwrap(), Position::new(2000, 2000));
    }

    #[test]
    fn test_move_selected_to_canvas_bounds() {
        let mut editor = editor();
        editor.add_element(); // 100x20 text box

        assert_eq!(
            editor.move_selected_to(900, 700, MoveBounds::Canvas).unwrap(),
            Position::new(700, 580)
        );
        assert_eq!(
            editor.move_selected_to(-5, -5, MoveBounds::Canvas).unwrap(),
            Position::new(0, 0)
        );
        assert_eq!(
            editor.move_selected_to(900, 700, MoveBounds::Unbounded).unwrap(),
            Position::new(900, 700)
        );
    }

    #[test]
    fn test_move_selected_to_oversized_element_pins_at_origin() {
        let mut editor = DesignerEditor::new(Canvas::new(50, 50));
        editor.add_element();
        editor.set_element_type(ElementType::Graph).unwrap(); // 200x50
        assert_eq!(
            editor.move_selected_to(30, 30, MoveBounds::Canvas).unwrap(),
            Position::new(0, 0)
        );
    }

    #[test]
    fn test_update_selected_config_merges_fields() {
        let mut editor = editor();
        assert_eq!(
            editor.update_selected_config(ConfigPatch::Text(TextPatch::default())),
            Err(EditorError::NoSelection)
        );

        editor.add_element();
        editor
            .update_selected_config(ConfigPatch::Text(TextPatch {
                font_size: Some(24),
                alignment: Some(Alignment::Right),
                ..TextPatch::default()
            }))
            .unwrap();

        match selected_config(&editor) {
            ElementConfig::Text(c) => {
                assert_eq!(c.font_size, 24);
                assert_eq!(c.alignment, Alignment::Right);
                assert_eq!(c.format, TextConfig::default().format);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_update_selected_config_type_mismatch_leaves_config() {
        let mut editor = editor();
        editor.add_element();
        let before = selected_config(&editor);

        let result = editor.update_selected_config(ConfigPatch::Graph(GraphPatch {
            sensor_id: Some("cpu".to_string()),
            ..GraphPatch::default()
        }));

        assert_eq!(
            result,
            Err(EditorError::TypeMismatch {
                expected: ElementType::Text,
                found: ElementType::Graph
            })
        );
        assert_eq!(selected_config(&editor), before);
    }

    #[test]
    fn test_graph_patch_distinguishes_null_from_absent() {
        let mut editor = editor();
        editor.add_element();
        editor.set_element_type(ElementType::Graph).unwrap();

        let set: ConfigPatch =
            serde_json::from_value(json!({"element_type": "graph", "min_value": 10.0, "max_value": 90.0})).unwrap();
        editor.update_selected_config(set).unwrap();

        let clear: ConfigPatch =
            serde_json::from_value(json!({"element_type": "graph", "min_value": null})).unwrap();
        editor.update_selected_config(clear).unwrap();

        match selected_config(&editor) {
            ElementConfig::Graph(c) => {
                assert_eq!(c.min_value, None);
                assert_eq!(c.max_value, Some(90.0));
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_range_patch_accepts_form_strings() {
        let mut editor = editor();
        editor.add_element();
        editor.set_element_type(ElementType::Graph).unwrap();

        let set: ConfigPatch = serde_json::from_value(
            json!({"element_type": "graph", "min_value": "10.5", "max_value": " 90 "}),
        )
        .unwrap();
        editor.update_selected_config(set).unwrap();

        let clear: ConfigPatch =
            serde_json::from_value(json!({"element_type": "graph", "max_value": ""})).unwrap();
        editor.update_selected_config(clear).unwrap();

        match selected_config(&editor) {
            ElementConfig::Graph(c) => {
                assert_eq!(c.min_value, Some(10.5));
                assert_eq!(c.max_value, None);
            }
            other => panic!("unexpected config {:?}", other),
        }

        let bad = serde_json::from_value::<ConfigPatch>(json!({"element_type": "graph", "min_value": "ten"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_camel_case_patch_keys_merge() {
        let mut editor = editor();
        editor.add_element();

        let patch: ConfigPatch = serde_json::from_value(json!({
            "element_type": "text",
            "fontSize": 20,
            "fontColor": "#ff0000",
            "textAlign": "center"
        }))
        .unwrap();
        editor.update_selected_config(patch).unwrap();

        assert_eq!(
            selected_config(&editor),
            ElementConfig::Text(TextConfig {
                font_size: 20,
                font_color: Rgba::new(255, 0, 0, 255),
                alignment: Alignment::Center,
                ..TextConfig::default()
            })
        );

        editor.set_element_type(ElementType::ConditionalImage).unwrap();
        let patch: ConfigPatch = serde_json::from_value(json!({
            "element_type": "conditional-image",
            "sensorId": "battery",
            "imagesPath": "/srv/battery",
            "minValue": "0"
        }))
        .unwrap();
        editor.update_selected_config(patch).unwrap();

        assert_eq!(
            selected_config(&editor),
            ElementConfig::ConditionalImage(ConditionalImageConfig {
                sensor_id: "battery".to_string(),
                images_path: "/srv/battery".to_string(),
                min_value: Some(0.0),
                ..ConditionalImageConfig::default()
            })
        );
    }

    #[test]
    fn test_load_selects_first_and_round_trips() {
        let mut editor = editor();
        editor.add_element();
        editor.move_selected_by(12, 34).unwrap();
        editor.add_element();
        editor.set_element_type(ElementType::ConditionalImage).unwrap();
        editor
            .update_selected_config(ConfigPatch::ConditionalImage(ConditionalImagePatch {
                images_path: Some("/srv/images/battery".to_string()),
                ..ConditionalImagePatch::default()
            }))
            .unwrap();

        let canvas = editor.document().canvas();
        let wire = editor.serialize();
        let reloaded = DesignerEditor::from_wire(canvas, wire);

        assert_eq!(reloaded.document().elements(), editor.document().elements());
        assert_eq!(
            reloaded.document().selection(),
            Some(&editor.document().elements()[0].id)
        );
        assert_eq!(
            reloaded.document().elements()[1].config,
            ElementConfig::ConditionalImage(ConditionalImageConfig {
                images_path: "/srv/images/battery".to_string(),
                ..ConditionalImageConfig::default()
            })
        );
    }

    #[test]
    fn test_load_empty_list_has_no_selection() {
        let mut editor = editor();
        editor.add_element();
        editor.load(Canvas::new(128, 64), Vec::new());
        assert!(editor.document().is_empty());
        assert_eq!(editor.document().selection(), None);
        assert_eq!(editor.document().canvas(), Canvas::new(128, 64));
    }

    #[test]
    fn test_config_type_matches_element_type_after_every_operation() {
        let mut editor = editor();
        editor.add_element();
        for t in [ElementType::Graph, ElementType::StaticImage, ElementType::ConditionalImage] {
            editor.set_element_type(t).unwrap();
            editor.duplicate_element().unwrap();
        }
        let wire = editor.serialize();
        editor.load(Canvas::new(800, 600), wire);

        for element in editor.document().elements() {
            assert_eq!(element.config.element_type(), element.element_type());
        }
    }
}
