//! Canvas holding widgets and driving the layout components.

mod gestures;
mod operations;

pub use gestures::HANDLE_HIT_RADIUS;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info};

use widgetcanvas_core::{
    CanvasFrame, Point, PreferenceRepository, SelectionError, Size, SubscriptionId, WidgetId,
};
use widgetcanvas_settings::LayoutConfig;

use crate::aspect_ratio::AspectRatio;
use crate::grouping::GroupingEngine;
use crate::handles::{ResizeConstraints, ResizeHandleController};
use crate::model::{Selectable, Widget};
use crate::rescaler::{CanvasRescaler, CanvasResized, RescaleFactors, RescaleReason};
use crate::selection_manager::{SelectionEvent, SelectionManager};
use crate::snap_guides::{GuideVisibility, SnapGuideAssistant};
use crate::store::WidgetStore;
use crate::templates::{RatioFrame, TemplateCodec};

use gestures::DragGesture;

/// Canvas state: widgets, selection, gestures and the canvas size.
pub struct Canvas {
    store: WidgetStore,
    selection: SelectionManager,
    resize: ResizeHandleController,
    rescaler: CanvasRescaler,
    guides: SnapGuideAssistant,
    grouping: GroupingEngine,
    codec: TemplateCodec,
    config: LayoutConfig,
    size: Size,
    viewport: Size,
    aspect_ratio: AspectRatio,
    background: Value,
    preferences: Option<Box<dyn PreferenceRepository>>,
    drag: Option<DragGesture>,
    /// Canvas a template was placed on before the first layout.
    template_basis: Option<Size>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.size)
            .field("aspect_ratio", &self.aspect_ratio.tag)
            .field("widgets", &self.store.len())
            .field("selection", self.selection.state())
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Canvas {
    /// Creates an empty canvas. Its size is zero until the first [`layout`](Self::layout).
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            store: WidgetStore::new(),
            selection: SelectionManager::new(),
            resize: ResizeHandleController::new(ResizeConstraints::from(&config)),
            rescaler: CanvasRescaler::new(config.clamp_margin),
            guides: SnapGuideAssistant::from_config(&config),
            grouping: GroupingEngine::new(config.group_padding),
            codec: TemplateCodec::from_config(&config),
            config,
            size: Size::zero(),
            viewport: Size::zero(),
            aspect_ratio: AspectRatio::default(),
            background: Value::Null,
            preferences: None,
            drag: None,
            template_basis: None,
        }
    }

    /// Persist color and font choices through `preferences`.
    pub fn with_preferences(mut self, preferences: Box<dyn PreferenceRepository>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Run the snap guide hide timer on `handle`.
    ///
    /// Needed when the canvas lives on a thread outside the tokio runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.guides = SnapGuideAssistant::from_config(&self.config).with_runtime(handle);
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingEngine) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn background(&self) -> &Value {
        &self.background
    }

    /// Opaque background descriptor saved with the design.
    pub fn set_background(&mut self, descriptor: Value) {
        self.background = descriptor;
    }

    pub fn preferences(&self) -> Option<&dyn PreferenceRepository> {
        self.preferences.as_deref()
    }

    /// The enclosing surface laid out with `available` space.
    ///
    /// The canvas takes the largest size with the current aspect ratio and
    /// widgets are rescaled from the previous size.
    pub fn layout(&mut self, available: Size) -> Option<RescaleFactors> {
        self.viewport = available;
        let size = self.aspect_ratio.fit_within(available);
        self.apply_size(size, RescaleReason::ViewportResized)
    }

    /// Switch aspect ratio and refit the canvas to the last viewport.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) -> Option<RescaleFactors> {
        if aspect_ratio == self.aspect_ratio {
            return None;
        }
        debug!("Aspect ratio {} -> {}", self.aspect_ratio.tag, aspect_ratio.tag);
        self.aspect_ratio = aspect_ratio;
        let size = aspect_ratio.fit_within(self.viewport);
        self.apply_size(size, RescaleReason::AspectRatioChanged)
    }

    fn apply_size(&mut self, size: Size, reason: RescaleReason) -> Option<RescaleFactors> {
        if size.is_empty() {
            return None;
        }
        self.size = size;
        if let Some(basis) = self.template_basis.take() {
            self.place_template_widgets(basis, size);
            return None;
        }
        self.rescaler
            .resize_canvas(size, reason, self.store.iter_mut())
    }

    /// Ratio-place widgets laid out on `basis` onto the first real canvas size.
    fn place_template_widgets(&mut self, basis: Size, size: Size) {
        for widget in self.store.iter_mut() {
            if let Some(ratio) = RatioFrame::encode(&widget.rect(), basis) {
                let rect = ratio.decode(size);
                widget.set_frame(CanvasFrame::new(rect));
                widget.initial_size = rect.size();
            }
        }
        self.rescaler.reset(size);
        info!(
            "Placed template widgets from {:.0}x{:.0} onto {:.0}x{:.0} canvas",
            basis.width, basis.height, size.width, size.height
        );
    }

    /// Add a widget on top of the draw order and make it selectable.
    pub fn add_widget(&mut self, widget: Widget) -> WidgetId {
        let id = widget.id;
        self.selection.register(&widget);
        self.store.insert(widget);
        id
    }

    /// Remove a widget, deselecting it first.
    pub fn remove_widget(&mut self, id: &WidgetId) -> Option<Widget> {
        self.selection.unregister(&mut self.store, id);
        if self.drag.as_ref().is_some_and(|d| d.widget == *id) {
            self.drag = None;
        }
        if self.resize.active_widget() == Some(*id) {
            self.resize.cancel();
        }
        if let Some(preferences) = self.preferences.as_mut() {
            preferences.forget(id);
        }
        self.store.remove(id)
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.store.get(id)
    }

    /// Widgets in draw order, bottom first.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.store.iter()
    }

    pub fn widget_count(&self) -> usize {
        self.store.len()
    }

    /// Topmost widget under `point`.
    pub fn widget_at(&self, point: &Point) -> Option<WidgetId> {
        self.store.hit_test(point)
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn select(&mut self, id: &WidgetId) -> Result<(), SelectionError> {
        self.selection.select(&mut self.store, id)
    }

    /// Select the topmost widget under `point`, or clear the selection.
    pub fn select_at(&mut self, point: &Point) -> Option<WidgetId> {
        match self.store.hit_test(point) {
            Some(id) => self.select(&id).ok().map(|_| id),
            None => {
                if !self.selection.is_multi_select() {
                    self.deselect_all();
                }
                None
            }
        }
    }

    pub fn deselect(&mut self, id: &WidgetId) -> bool {
        self.selection.deselect(&mut self.store, id)
    }

    pub fn deselect_all(&mut self) -> usize {
        self.selection.deselect_all(&mut self.store)
    }

    pub fn enter_multi_select(&mut self) {
        self.selection.enter_multi_select();
    }

    pub fn toggle_selection(&mut self, id: &WidgetId) -> Result<bool, SelectionError> {
        self.selection.toggle_selection(&mut self.store, id)
    }

    pub fn exit_multi_select(&mut self) {
        self.selection.exit_multi_select(&mut self.store);
    }

    pub fn is_selected(&self, id: &WidgetId) -> bool {
        self.store.get(id).is_some_and(|w| w.is_selected())
    }

    pub fn subscribe_selection<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        self.selection.subscribe(handler)
    }

    pub fn unsubscribe_selection(&mut self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }

    pub fn subscribe_canvas<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&CanvasResized) + Send + Sync + 'static,
    {
        self.rescaler.subscribe(handler)
    }

    pub fn unsubscribe_canvas(&mut self, id: SubscriptionId) -> bool {
        self.rescaler.unsubscribe(id)
    }

    pub fn guide_visibility(&self) -> GuideVisibility {
        self.guides.visibility()
    }

    pub fn snap_guides(&self) -> &SnapGuideAssistant {
        &self.guides
    }

    /// Drop every widget and selection and start over with `widgets`.
    fn replace_widgets(&mut self, widgets: Vec<Widget>) {
        self.template_basis = None;
        self.drag = None;
        self.resize.cancel();
        self.selection.reset();
        self.store.clear();
        for widget in widgets {
            self.add_widget(widget);
        }
    }
}
