//! # WidgetCanvas
//!
//! A layout engine for canvases of user-placed widgets (stats, maps, text,
//! images) that stay in proportion when the canvas changes size.
//!
//! ## Architecture
//!
//! WidgetCanvas is organized as a workspace with multiple crates:
//!
//! 1. **widgetcanvas-core** - Geometry, identity, presentation, errors, observers
//! 2. **widgetcanvas-settings** - Layout configuration loading and validation
//! 3. **widgetcanvas-designer** - Canvas, selection, resize handles, rescaling,
//!    snap guides, grouping, templates and saved designs
//! 4. **widgetcanvas** - This facade, plus logging setup for hosts
//!
//! ## Features
//!
//! - **Proportional Rescaling**: widget centers follow the canvas, sizes scale uniformly
//! - **Corner Handles**: free or aspect-locked resize snapped to a grid
//! - **Snap Guides**: center alignment with guides that hide after a delay
//! - **Groups**: members kept in group-local coordinates and scaled from their original frame
//! - **Templates**: ratio-based layouts that reproduce on any canvas, with legacy migration

pub use widgetcanvas_core as core;
pub use widgetcanvas_designer as designer;
pub use widgetcanvas_settings as settings;

pub use widgetcanvas_core::{
    CanvasFrame, Color, DecodeError, Error, FontStyle, GroupingError, InMemoryPreferences,
    Point, PreferenceRepository, Rect, RepositoryError, Result, SelectionError, Size, WidgetId,
};

pub use widgetcanvas_designer::{
    AspectRatio, Canvas, DesignDocument, DirectoryTemplateRepository, GesturePhase,
    GroupingEngine, GuideVisibility, HandleCorner, RescaleReason, SelectionEvent,
    SelectionState, TemplateCodec, TemplateFile, TemplateRepository, Widget, WidgetKind,
};

pub use widgetcanvas_settings::{LayoutConfig, SettingsError};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

/// Build a canvas from the layout config at `config_path`.
///
/// A missing file yields the default configuration; an invalid one is an error.
pub fn open_canvas(config_path: &Path) -> anyhow::Result<Canvas> {
    let config = LayoutConfig::load_or_default(config_path)?;
    tracing::info!(
        "WidgetCanvas {} (built {}) using grid {} and snap threshold {}",
        VERSION,
        BUILD_DATE,
        config.grid_size,
        config.snap_threshold
    );
    Ok(Canvas::new(config))
}
