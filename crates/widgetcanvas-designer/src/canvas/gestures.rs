//! Resize and drag gesture callbacks.
//!
//! Hosts deliver gestures serially from their event loop. A cancelled
//! gesture behaves like an ended one: frames already applied stay applied.

use widgetcanvas_core::{CanvasFrame, Point, Rect, SelectionError, WidgetId};

use crate::handles::{GesturePhase, HandleCorner};
use crate::model::Selectable;

use super::Canvas;

/// Distance from a handle center that still grabs the handle.
pub const HANDLE_HIT_RADIUS: f64 = 22.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct DragGesture {
    pub(super) widget: WidgetId,
    start_point: Point,
    start_frame: Rect,
}

impl Canvas {
    /// Handle of the selected widget under `point`, if any.
    pub fn handle_at(&self, point: &Point) -> Option<(WidgetId, HandleCorner)> {
        let id = self.selection.current()?;
        let handles = self.store.get(&id)?.handle_positions()?;
        handles
            .hit_test(point, HANDLE_HIT_RADIUS)
            .map(|corner| (id, corner))
    }

    pub fn begin_resize(
        &mut self,
        id: &WidgetId,
        corner: HandleCorner,
        point: Point,
    ) -> Result<(), SelectionError> {
        let widget = self
            .store
            .get(id)
            .ok_or(SelectionError::NotRegistered { id: *id })?;
        self.resize
            .begin(*id, corner, widget.rect(), widget.aspect_locked, point);
        Ok(())
    }

    /// Apply the resize for pointer position `point`.
    ///
    /// Returns the new frame, or `None` when the tick was rejected and the
    /// previous frame stays.
    pub fn resize_to(&mut self, point: Point) -> Option<Rect> {
        let rect = self.resize.update(point)?;
        let id = self.resize.active_widget()?;
        let widget = self.store.get_mut(&id)?;
        widget.set_frame(CanvasFrame::new(rect));
        Some(rect)
    }

    /// Finish the resize. The last accepted frame is final.
    pub fn end_resize(&mut self) -> Option<(WidgetId, Rect)> {
        self.resize.end()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    /// Route one resize gesture callback. Returns the widget's frame after it.
    pub fn handle_resize(
        &mut self,
        phase: GesturePhase,
        id: &WidgetId,
        corner: HandleCorner,
        point: Point,
    ) -> Option<Rect> {
        match phase {
            GesturePhase::Began => {
                self.begin_resize(id, corner, point).ok()?;
            }
            GesturePhase::Changed => {
                self.resize_to(point);
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.end_resize();
            }
        }
        self.store.get(id).map(|w| w.rect())
    }

    /// Start moving a widget. Cancels any pending guide hide.
    pub fn begin_drag(&mut self, id: &WidgetId, point: Point) -> Result<(), SelectionError> {
        let widget = self
            .store
            .get(id)
            .ok_or(SelectionError::NotRegistered { id: *id })?;
        self.drag = Some(DragGesture {
            widget: *id,
            start_point: point,
            start_frame: widget.rect(),
        });
        self.guides.begin_drag();
        Ok(())
    }

    /// Move the dragged widget by the offset from the drag start, snapping
    /// its center to the canvas center axes.
    pub fn drag_to(&mut self, point: Point) -> Option<Rect> {
        let drag = self.drag?;
        let moved = drag.start_frame.translated(
            point.x - drag.start_point.x,
            point.y - drag.start_point.y,
        );
        let snapped = self.guides.apply(&moved, self.size);
        let widget = self.store.get_mut(&drag.widget)?;
        widget.set_frame(CanvasFrame::new(snapped));
        Some(snapped)
    }

    /// Finish the drag and schedule the guides to hide.
    pub fn end_drag(&mut self) -> Option<(WidgetId, Rect)> {
        let drag = self.drag.take()?;
        self.guides.end_drag();
        self.store.get(&drag.widget).map(|w| (drag.widget, w.rect()))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Route one drag gesture callback. Returns the widget's frame after it.
    pub fn handle_drag(
        &mut self,
        phase: GesturePhase,
        id: &WidgetId,
        point: Point,
    ) -> Option<Rect> {
        match phase {
            GesturePhase::Began => {
                self.begin_drag(id, point).ok()?;
            }
            GesturePhase::Changed => {
                self.drag_to(point);
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.end_drag();
            }
        }
        self.store.get(id).map(|w| w.rect())
    }

    /// Set a widget's rotation in degrees.
    pub fn rotate(&mut self, id: &WidgetId, degrees: f64) -> Result<(), SelectionError> {
        let widget = self
            .store
            .get_mut(id)
            .ok_or(SelectionError::NotRegistered { id: *id })?;
        widget.set_rotation(degrees);
        Ok(())
    }
}
