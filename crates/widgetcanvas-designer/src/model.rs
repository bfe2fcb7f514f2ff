//! Widget model.
//!
//! A widget is a rectangle on the canvas with a kind, presentation
//! attributes and a selection state. Top-level widgets live in
//! [`CanvasSpace`]; members of a group are stored as
//! `Widget<GroupLocalSpace>` and only become canvas widgets again when the
//! group is dissolved.

use serde_json::{json, Value};

use widgetcanvas_core::{
    CanvasFrame, CanvasSpace, Color, CoordinateSpace, FontStyle, Frame, GroupLocalSpace, Point,
    Rect, Size, WidgetId,
};

use crate::grouping::Group;
use crate::handles::HandlePositions;

/// What a widget displays.
#[derive(Debug, Clone)]
pub enum WidgetKind {
    /// A single metric readout.
    Stat { metric: String },
    /// A map snapshot. The region descriptor is opaque to the layout engine.
    Map { region: Value },
    /// Free text.
    Text { content: String },
    /// A bitmap referenced by source.
    Image { source: String },
    /// A container of other widgets.
    Group(Group),
}

impl WidgetKind {
    pub fn stat(metric: impl Into<String>) -> Self {
        WidgetKind::Stat {
            metric: metric.into(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        WidgetKind::Text {
            content: content.into(),
        }
    }

    pub fn image(source: impl Into<String>) -> Self {
        WidgetKind::Image {
            source: source.into(),
        }
    }

    pub fn map() -> Self {
        WidgetKind::Map { region: Value::Null }
    }

    /// Stable tag used in templates and saved designs.
    pub fn type_tag(&self) -> &'static str {
        match self {
            WidgetKind::Stat { .. } => "stat",
            WidgetKind::Map { .. } => "map",
            WidgetKind::Text { .. } => "text",
            WidgetKind::Image { .. } => "image",
            WidgetKind::Group(_) => widgetcanvas_core::constants::GROUP_TYPE_TAG,
        }
    }

    pub fn is_aspect_locked_by_default(&self) -> bool {
        matches!(
            self,
            WidgetKind::Map { .. } | WidgetKind::Image { .. } | WidgetKind::Group(_)
        )
    }

    /// Kinds that render text and therefore track a content scale factor.
    pub fn has_text_content(&self) -> bool {
        matches!(self, WidgetKind::Stat { .. } | WidgetKind::Text { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self, WidgetKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            WidgetKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            WidgetKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Kind-specific fields as a JSON object. Groups have none.
    pub fn content(&self) -> Value {
        match self {
            WidgetKind::Stat { metric } => json!({ "metric": metric }),
            WidgetKind::Map { region } => json!({ "region": region }),
            WidgetKind::Text { content } => json!({ "content": content }),
            WidgetKind::Image { source } => json!({ "source": source }),
            WidgetKind::Group(_) => Value::Null,
        }
    }

    /// Rebuild a non-group kind from its tag and [`content`](Self::content).
    ///
    /// Returns `None` for unknown tags and for `"group"`, which needs its
    /// members and is rebuilt by the caller.
    pub fn from_tag(tag: &str, content: &Value) -> Option<Self> {
        let text_field = |key: &str| {
            content
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match tag {
            "stat" => Some(WidgetKind::Stat {
                metric: text_field("metric"),
            }),
            "map" => Some(WidgetKind::Map {
                region: content.get("region").cloned().unwrap_or(Value::Null),
            }),
            "text" => Some(WidgetKind::Text {
                content: text_field("content"),
            }),
            "image" => Some(WidgetKind::Image {
                source: text_field("source"),
            }),
            _ => None,
        }
    }
}

/// Geometry, presentation and selection state of one widget.
///
/// `S` is the coordinate space of [`frame`](Self::frame).
#[derive(Debug, Clone)]
pub struct Widget<S: CoordinateSpace = CanvasSpace> {
    pub id: WidgetId,
    pub kind: WidgetKind,
    frame: Frame<S>,
    /// Size at which the content scale was last baselined.
    pub initial_size: Size,
    /// Rotation in degrees.
    pub rotation: f64,
    pub aspect_locked: bool,
    pub color: Color,
    pub font: FontStyle,
    /// Baselined text scale. See [`effective_content_scale`](Self::effective_content_scale).
    pub content_scale: f64,
    /// Group-type tag of the set this widget came from, if any.
    pub provenance: Option<String>,
    /// Host data carried through persistence untouched.
    pub payload: Value,
    selected: bool,
    handles: Option<HandlePositions>,
}

impl<S: CoordinateSpace> Widget<S> {
    pub fn new(kind: WidgetKind, frame: Frame<S>) -> Self {
        Self {
            id: WidgetId::new(),
            aspect_locked: kind.is_aspect_locked_by_default(),
            kind,
            initial_size: frame.size(),
            frame,
            rotation: 0.0,
            color: Color::default(),
            font: FontStyle::default(),
            content_scale: 1.0,
            provenance: None,
            payload: Value::Null,
            selected: false,
            handles: None,
        }
    }

    pub fn with_id(mut self, id: WidgetId) -> Self {
        self.id = id;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_aspect_locked(mut self, locked: bool) -> Self {
        self.aspect_locked = locked;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn frame(&self) -> Frame<S> {
        self.frame
    }

    pub fn rect(&self) -> Rect {
        self.frame.rect()
    }

    /// Move or resize the widget.
    ///
    /// A size change on a group rescales its members from the group's
    /// original frame. Handles follow the new frame while selected.
    pub fn set_frame(&mut self, frame: Frame<S>) {
        let new_size = frame.size();
        if new_size != self.frame.size() {
            if let WidgetKind::Group(group) = &mut self.kind {
                group.apply_resize(new_size);
            }
        }
        self.frame = frame;
        self.refresh_handles();
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    pub fn has_content_scale(&self) -> bool {
        self.kind.has_text_content()
    }

    /// `min(w / initial.w, h / initial.h)`, or 1.0 when the baseline is empty.
    pub fn live_content_scale(&self) -> f64 {
        if self.initial_size.is_empty() {
            return 1.0;
        }
        let size = self.frame.size();
        (size.width / self.initial_size.width).min(size.height / self.initial_size.height)
    }

    /// Text scale the renderer should use right now.
    pub fn effective_content_scale(&self) -> f64 {
        self.content_scale * self.live_content_scale()
    }

    /// Fold the live scale into `content_scale` and baseline on the current size.
    ///
    /// The effective scale is unchanged; the live scale becomes 1.0.
    /// No-op for kinds without text content.
    pub fn rebaseline(&mut self) {
        if !self.has_content_scale() {
            return;
        }
        self.content_scale = self.effective_content_scale();
        self.initial_size = self.frame.size();
    }

    fn refresh_handles(&mut self) {
        self.handles = if self.selected {
            Some(HandlePositions::for_rect(&self.frame.rect()))
        } else {
            None
        };
    }

    fn with_frame_space<T: CoordinateSpace>(self, frame: Frame<T>) -> Widget<T> {
        Widget {
            id: self.id,
            kind: self.kind,
            frame,
            initial_size: self.initial_size,
            rotation: self.rotation,
            aspect_locked: self.aspect_locked,
            color: self.color,
            font: self.font,
            content_scale: self.content_scale,
            provenance: self.provenance,
            payload: self.payload,
            selected: false,
            handles: None,
        }
    }
}

impl Widget<CanvasSpace> {
    /// Reparent into a group whose canvas origin is `group_origin`.
    ///
    /// The member comes out deselected.
    pub fn into_group_local(self, group_origin: Point) -> Widget<GroupLocalSpace> {
        let frame = self.frame.to_group_local(group_origin);
        self.with_frame_space(frame)
    }
}

impl Widget<GroupLocalSpace> {
    /// Lift a group member back onto the canvas.
    pub fn into_canvas(self, group_origin: Point) -> Widget<CanvasSpace> {
        let frame = self.frame.to_canvas(group_origin);
        self.with_frame_space(frame)
    }
}

/// Capability shared by everything the selection manager can drive.
pub trait Selectable {
    fn identifier(&self) -> WidgetId;
    fn frame(&self) -> CanvasFrame;
    fn set_frame(&mut self, frame: CanvasFrame);
    fn rotation(&self) -> f64;
    fn set_rotation(&mut self, degrees: f64);
    fn color(&self) -> Color;
    fn font_style(&self) -> &FontStyle;
    fn initial_size(&self) -> Size;
    fn is_aspect_locked(&self) -> bool;
    fn is_selected(&self) -> bool;
    /// Mark selected and place the resize handles.
    fn show_selected(&mut self);
    /// Clear the selected mark and drop the handles.
    fn hide_selected(&mut self);
    fn apply_color(&mut self, color: Color);
    fn apply_font(&mut self, font: FontStyle);
    /// Recompute handle positions from the current frame.
    fn position_handles(&mut self);
    /// Current handle positions, `None` while not selected.
    fn handle_positions(&self) -> Option<HandlePositions>;
}

impl Selectable for Widget<CanvasSpace> {
    fn identifier(&self) -> WidgetId {
        self.id
    }

    fn frame(&self) -> CanvasFrame {
        self.frame
    }

    fn set_frame(&mut self, frame: CanvasFrame) {
        Widget::<CanvasSpace>::set_frame(self, frame);
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn font_style(&self) -> &FontStyle {
        &self.font
    }

    fn initial_size(&self) -> Size {
        self.initial_size
    }

    fn is_aspect_locked(&self) -> bool {
        self.aspect_locked
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn show_selected(&mut self) {
        self.selected = true;
        self.refresh_handles();
    }

    fn hide_selected(&mut self) {
        self.selected = false;
        self.refresh_handles();
    }

    fn apply_color(&mut self, color: Color) {
        self.color = color;
        if let WidgetKind::Group(group) = &mut self.kind {
            for member in group.members_mut() {
                member.color = color;
            }
        }
    }

    fn apply_font(&mut self, font: FontStyle) {
        if let WidgetKind::Group(group) = &mut self.kind {
            for member in group.members_mut() {
                member.font = font.clone();
            }
        }
        self.font = font;
    }

    fn position_handles(&mut self) {
        self.refresh_handles();
    }

    fn handle_positions(&self) -> Option<HandlePositions> {
        self.handles
    }
}
