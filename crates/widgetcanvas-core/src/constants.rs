//! Layout constants.
//!
//! These are the built-in defaults. Runtime overrides live in
//! `widgetcanvas_settings::LayoutConfig`.

use crate::geometry::Size;

/// Grid step that resize edges snap to.
pub const DEFAULT_GRID_SIZE: f64 = 5.0;

/// Smallest width or height a resize gesture may commit.
pub const MIN_WIDGET_DIMENSION: f64 = 60.0;

/// Padding added around member bounds when a group is created.
pub const DEFAULT_GROUP_PADDING: f64 = 16.0;

/// Distance from the canvas center axis at which a dragged frame snaps.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;

/// Delay before snap guides hide after a drag ends.
pub const DEFAULT_GUIDE_HIDE_DELAY_MS: u64 = 1000;

/// Canvas size that version 1.0 templates were authored against.
pub const LEGACY_TEMPLATE_CANVAS_SIZE: Size = Size::new(375.0, 667.0);

/// Template format version written by the encoder.
pub const TEMPLATE_FORMAT_VERSION: &str = "2.0";

/// Template format version whose items carry absolute coordinates.
pub const LEGACY_TEMPLATE_FORMAT_VERSION: &str = "1.0";

/// Design document format version.
pub const DESIGN_FORMAT_VERSION: &str = "1.0";

/// Type tag used for group records.
pub const GROUP_TYPE_TAG: &str = "group";
