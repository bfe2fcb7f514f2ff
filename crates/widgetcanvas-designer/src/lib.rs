//! # WidgetCanvas Designer
//!
//! The canvas layout engine: widgets placed on a resizable canvas, selected,
//! resized from their corner handles, dragged with center snapping, grouped,
//! and stored in a form that reproduces the layout on any canvas size.
//!
//! ## Core Components
//!
//! - **Selection Manager**: single and multi selection with typed observers
//! - **Resize Handle Controller**: free and aspect-locked corner resize on a grid
//! - **Canvas Rescaler**: keeps widgets in proportion when the canvas changes size
//! - **Snap-Guide Assistant**: center snapping with timed guide hiding
//! - **Grouping Engine**: groups in their own local coordinate space
//! - **Template Codec**: ratio-based templates, with legacy migration
//! - **Serialization**: saved designs with absolute frames and canvas size
//!
//! ## Architecture
//!
//! ```text
//! Canvas (gesture callbacks, canvas size, aspect ratio)
//!   ├── WidgetStore (draw order)
//!   ├── SelectionManager
//!   ├── ResizeHandleController
//!   ├── SnapGuideAssistant
//!   ├── CanvasRescaler
//!   └── GroupingEngine
//!
//! TemplateCodec / DesignDocument (save and load)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use widgetcanvas_designer::{Canvas, Widget, WidgetKind};
//! use widgetcanvas_core::{CanvasFrame, Size};
//!
//! let mut canvas = Canvas::default();
//! canvas.layout(Size::new(390.0, 760.0));
//! let id = canvas.add_widget(Widget::new(
//!     WidgetKind::stat("distance"),
//!     CanvasFrame::from_xywh(20.0, 40.0, 160.0, 80.0),
//! ));
//! canvas.select(&id)?;
//! let template = canvas.export_template("Morning run")?;
//! ```

pub mod aspect_ratio;
pub mod canvas;
pub mod grouping;
pub mod handles;
pub mod model;
pub mod rescaler;
pub mod selection_manager;
pub mod serialization;
pub mod snap_guides;
pub mod store;
pub mod template_repository;
pub mod templates;

pub use aspect_ratio::{fit_canvas, AspectRatio};
pub use canvas::{Canvas, HANDLE_HIT_RADIUS};
pub use grouping::{
    resize_group, Group, GroupConflictPolicy, GroupPermission, GroupingEngine, ProvenancePolicy,
};
pub use handles::{
    aspect_locked_resize, free_resize, GesturePhase, HandleCorner, HandlePositions,
    ResizeConstraints, ResizeHandleController,
};
pub use model::{Selectable, Widget, WidgetKind};
pub use rescaler::{rescale_frame, CanvasRescaler, CanvasResized, RescaleFactors, RescaleReason};
pub use selection_manager::{SelectableStore, SelectionEvent, SelectionManager, SelectionState};
pub use serialization::{DesignDocument, GroupRecord, RestoredLayout, WidgetRecord};
pub use snap_guides::{snap_to_center, GuideVisibility, SnapGuideAssistant, SnapOutcome};
pub use store::WidgetStore;
pub use template_repository::{
    DirectoryTemplateRepository, InMemoryTemplateRepository, TemplateRepository,
};
pub use templates::{
    DecodedTemplate, RatioFrame, TemplateCodec, TemplateFile, TemplateItem, TemplateVersion,
};
