//! Widget store.
//!
//! Holds the top-level widgets of a canvas. Iteration follows draw order,
//! so the last widget yielded is drawn on top.

use std::collections::HashMap;

use widgetcanvas_core::{Point, WidgetId};

use crate::model::{Selectable, Widget};
use crate::selection_manager::SelectableStore;

#[derive(Debug, Clone, Default)]
pub struct WidgetStore {
    widgets: HashMap<WidgetId, Widget>,
    draw_order: Vec<WidgetId>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget on top. A widget with the same id is replaced in place.
    pub fn insert(&mut self, widget: Widget) {
        let id = widget.id;
        if self.widgets.insert(id, widget).is_none() {
            self.draw_order.push(id);
        }
    }

    /// Add a widget at draw position `index` (clamped to the end).
    pub fn insert_at(&mut self, index: usize, widget: Widget) {
        let id = widget.id;
        if self.widgets.insert(id, widget).is_none() {
            let index = index.min(self.draw_order.len());
            self.draw_order.insert(index, id);
        }
    }

    pub fn remove(&mut self, id: &WidgetId) -> Option<Widget> {
        let widget = self.widgets.remove(id)?;
        self.draw_order.retain(|other| other != id);
        Some(widget)
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Draw-order index of `id`.
    pub fn position(&self, id: &WidgetId) -> Option<usize> {
        self.draw_order.iter().position(|other| other == id)
    }

    /// Widgets in draw order, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.draw_order.iter().filter_map(|id| self.widgets.get(id))
    }

    /// Mutable access to every widget, in no particular order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Widget> {
        self.widgets.values_mut()
    }

    pub fn ids(&self) -> &[WidgetId] {
        &self.draw_order
    }

    /// Move `id` to the end of the draw order. Returns false if absent.
    pub fn raise_to_top(&mut self, id: &WidgetId) -> bool {
        match self.position(id) {
            Some(index) => {
                let id = self.draw_order.remove(index);
                self.draw_order.push(id);
                true
            }
            None => false,
        }
    }

    /// Topmost widget whose frame contains `point`.
    pub fn hit_test(&self, point: &Point) -> Option<WidgetId> {
        self.draw_order
            .iter()
            .rev()
            .find(|id| {
                self.widgets
                    .get(*id)
                    .is_some_and(|w| w.rect().contains_point(point))
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
        self.draw_order.clear();
    }
}

impl SelectableStore for WidgetStore {
    fn selectable_mut(&mut self, id: &WidgetId) -> Option<&mut dyn Selectable> {
        self.widgets
            .get_mut(id)
            .map(|widget| widget as &mut dyn Selectable)
    }

    fn raise_to_top(&mut self, id: &WidgetId) -> bool {
        WidgetStore::raise_to_top(self, id)
    }
}
