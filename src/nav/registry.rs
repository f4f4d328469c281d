//! Element Registry: discovers focusable images and reads their geometry.

use std::collections::HashMap;

use crate::dom::{Document, NodeId};

use super::geometry::ElementGeometry;

/// Id prefixes that mark an `<img>` as focusable.
pub const FOCUS_PREFIXES: &[&str] = &["page_", "focus_", "back_"];

/// Focusable elements in discovery (document) order with their geometry.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    ids: Vec<String>,
    geometry: HashMap<String, ElementGeometry>,
}

impl ElementRegistry {
    /// Scan every `<img>` whose id starts with a focus prefix.
    /// Images without an id are skipped.
    pub fn scan(doc: &Document) -> Self {
        let mut registry = Self::default();
        for node in doc.elements_by_tag("img") {
            let Some(id) = doc.id_of(node) else {
                continue;
            };
            if !FOCUS_PREFIXES.iter().any(|p| id.starts_with(p)) {
                continue;
            }
            if registry.geometry.contains_key(id) {
                continue;
            }
            let (x, y) = page_offset(doc, node);
            let geometry =
                ElementGeometry::from_box(x, y, doc.width_of(node), doc.height_of(node));
            registry.insert(id.to_string(), geometry);
        }
        log::debug!("registry: {} focusable elements", registry.len());
        registry
    }

    /// Register an element directly, appending it to the discovery order.
    pub fn insert(&mut self, id: String, geometry: ElementGeometry) {
        if self.geometry.insert(id.clone(), geometry).is_none() {
            self.ids.push(id);
        }
    }

    /// Ids in discovery order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn geometry(&self, id: &str) -> Option<&ElementGeometry> {
        self.geometry.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.geometry.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Last-discovered id, the fallback initial focus.
    pub fn last(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }
}

/// Absolute page offset: the element's own offset plus every offset parent's.
pub fn page_offset(doc: &Document, node: NodeId) -> (f32, f32) {
    let mut x = doc.offset_left(node);
    let mut y = doc.offset_top(node);
    let mut current = doc.offset_parent(node);
    while let Some(parent) = current {
        x += doc.offset_left(parent);
        y += doc.offset_top(parent);
        current = doc.offset_parent(parent);
    }
    (x, y)
}
