// Designer document aggregate
use super::element::{DisplayElement, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Both dimensions are raised to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Elements laid out on a client's canvas, in z-order, with at most one selected.
///
/// Fields are private so the id-uniqueness and selection invariants can only
/// be changed through the methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerDocument {
    canvas: Canvas,
    elements: Vec<DisplayElement>,
    selection: Option<ElementId>,
}

impl DesignerDocument {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            elements: Vec::new(),
            selection: None,
        }
    }

    /// Build from already-constructed elements. Elements whose id repeats an
    /// earlier one get a fresh id.
    pub fn with_elements(canvas: Canvas, elements: Vec<DisplayElement>) -> Self {
        let mut document = Self::new(canvas);
        for mut element in elements {
            if document.contains(&element.id) {
                let fresh = ElementId::generate();
                tracing::warn!("Duplicate element id {} replaced with {}", element.id, fresh);
                element.id = fresh;
            }
            document.elements.push(element);
        }
        document
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn elements(&self) -> &[DisplayElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&DisplayElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    pub fn selected(&self) -> Option<&DisplayElement> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        self.selection.as_ref().and_then(|id| self.index_of(id))
    }

    pub(crate) fn selected_mut(&mut self) -> Option<&mut DisplayElement> {
        let index = self.selected_index()?;
        self.elements.get_mut(index)
    }

    /// Returns false (and changes nothing) when the id is unknown.
    pub fn select(&mut self, id: &ElementId) -> bool {
        if self.contains(id) {
            self.selection = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Append an element; a colliding id is regenerated.
    pub(crate) fn push(&mut self, mut element: DisplayElement) -> ElementId {
        if self.contains(&element.id) {
            element.id = ElementId::generate();
        }
        let id = element.id.clone();
        self.elements.push(element);
        id
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> DisplayElement {
        let removed = self.elements.remove(index);
        if self.selection.as_ref() == Some(&removed.id) {
            self.selection = None;
        }
        removed
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
    }
}
