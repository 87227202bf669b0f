// Mapper between designer domain models and the persisted wire format
use crate::domain::display_config::{DisplayConfigDocument, WireElement};
use crate::domain::document::DesignerDocument;
use crate::domain::element::{DisplayElement, ElementConfig, ElementId, ElementType, Position};

pub fn document_to_wire(document: &DesignerDocument) -> DisplayConfigDocument {
    let canvas = document.canvas();
    DisplayConfigDocument {
        resolution_width: canvas.width,
        resolution_height: canvas.height,
        elements: elements_to_wire(document.elements()),
    }
}

pub fn elements_to_wire(elements: &[DisplayElement]) -> Vec<WireElement> {
    elements.iter().map(element_to_wire).collect()
}

pub fn element_to_wire(element: &DisplayElement) -> WireElement {
    let mut wire = WireElement {
        id: element.id.to_string(),
        name: element.name.clone(),
        element_type: Some(element.element_type()),
        x: element.position.x,
        y: element.position.y,
        text_config: None,
        image_config: None,
        graph_config: None,
        conditional_image_config: None,
    };

    match &element.config {
        ElementConfig::Text(c) => wire.text_config = Some(c.clone()),
        ElementConfig::StaticImage(c) => wire.image_config = Some(c.clone()),
        ElementConfig::Graph(c) => wire.graph_config = Some(c.clone()),
        ElementConfig::ConditionalImage(c) => wire.conditional_image_config = Some(c.clone()),
    }

    wire
}

pub fn elements_from_wire(elements: Vec<WireElement>) -> Vec<DisplayElement> {
    elements.into_iter().map(element_from_wire).collect()
}

/// Rebuild a domain element, filling every gap with a default.
pub fn element_from_wire(wire: WireElement) -> DisplayElement {
    let id = if wire.id.trim().is_empty() {
        ElementId::generate()
    } else {
        ElementId::from(wire.id)
    };

    let name = if wire.name.is_empty() {
        DisplayElement::default_name(&id)
    } else {
        wire.name
    };

    let element_type = wire.element_type.unwrap_or(ElementType::Text);

    let config = match element_type {
        ElementType::Text => wire.text_config.map(ElementConfig::Text),
        ElementType::StaticImage => wire.image_config.map(ElementConfig::StaticImage),
        ElementType::Graph => wire.graph_config.map(ElementConfig::Graph),
        ElementType::ConditionalImage => wire
            .conditional_image_config
            .map(ElementConfig::ConditionalImage),
    };

    let config = match config {
        Some(config) => config.normalized(),
        None => {
            tracing::warn!(
                element = %id,
                element_type = %element_type,
                "Invalid reference: no config for element type, using defaults"
            );
            ElementConfig::default_for(element_type)
        }
    };

    DisplayElement {
        id,
        name,
        position: Position::new(wire.x, wire.y),
        config,
    }
}
