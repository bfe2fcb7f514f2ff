//! Snap-Guide Assistant
//!
//! While a widget is dragged, its center snaps to the canvas center axes when
//! within a threshold, and the matching guide line is shown. Guides hide a
//! fixed delay after the drag ends; starting a new drag cancels a pending hide.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use widgetcanvas_core::constants::{DEFAULT_GUIDE_HIDE_DELAY_MS, DEFAULT_SNAP_THRESHOLD};
use widgetcanvas_core::{Point, Rect, Size};
use widgetcanvas_settings::LayoutConfig;

/// Which guide lines are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuideVisibility {
    /// Line at the canvas horizontal center (x = width / 2).
    pub vertical: bool,
    /// Line at the canvas vertical center (y = height / 2).
    pub horizontal: bool,
}

impl GuideVisibility {
    pub fn any(&self) -> bool {
        self.vertical || self.horizontal
    }
}

/// Result of snapping one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOutcome {
    pub frame: Rect,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

/// Snap `frame`'s center to the center axes of `canvas`, per axis.
///
/// An axis snaps when the center is within `threshold` of the canvas center.
pub fn snap_to_center(frame: &Rect, canvas: Size, threshold: f64) -> SnapOutcome {
    let center = frame.center();
    let target = Point::new(canvas.width / 2.0, canvas.height / 2.0);

    let snapped_x = (center.x - target.x).abs() <= threshold;
    let snapped_y = (center.y - target.y).abs() <= threshold;

    let new_center = Point::new(
        if snapped_x { target.x } else { center.x },
        if snapped_y { target.y } else { center.y },
    );

    SnapOutcome {
        frame: Rect::from_center(new_center, frame.size()),
        snapped_x,
        snapped_y,
    }
}

/// Applies center snapping during drags and owns the guide hide timer.
///
/// The timer runs on the runtime given to [`with_runtime`](Self::with_runtime),
/// or else on the tokio runtime current when the drag ends. Without either,
/// guides hide as soon as the drag ends.
#[derive(Debug)]
pub struct SnapGuideAssistant {
    threshold: f64,
    hide_delay: Duration,
    guides: Arc<Mutex<GuideVisibility>>,
    pending_hide: Option<JoinHandle<()>>,
    runtime: Option<Handle>,
}

impl Default for SnapGuideAssistant {
    fn default() -> Self {
        Self::new(
            DEFAULT_SNAP_THRESHOLD,
            Duration::from_millis(DEFAULT_GUIDE_HIDE_DELAY_MS),
        )
    }
}

impl SnapGuideAssistant {
    pub fn new(threshold: f64, hide_delay: Duration) -> Self {
        Self {
            threshold,
            hide_delay,
            guides: Arc::new(Mutex::new(GuideVisibility::default())),
            pending_hide: None,
            runtime: None,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.snap_threshold, config.guide_hide_delay())
    }

    /// Use `handle` for the hide timer instead of the ambient runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Current guide visibility.
    pub fn visibility(&self) -> GuideVisibility {
        *self.guides.lock()
    }

    /// Shared visibility cell, for hosts that poll it from another thread.
    pub fn visibility_handle(&self) -> Arc<Mutex<GuideVisibility>> {
        Arc::clone(&self.guides)
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// A drag started: any scheduled hide is cancelled.
    pub fn begin_drag(&mut self) {
        self.cancel_pending_hide();
    }

    /// Snap `frame` and update guide visibility to match.
    pub fn apply(&mut self, frame: &Rect, canvas: Size) -> Rect {
        let outcome = snap_to_center(frame, canvas, self.threshold);
        let mut guides = self.guides.lock();
        guides.vertical = outcome.snapped_x;
        guides.horizontal = outcome.snapped_y;
        outcome.frame
    }

    /// The drag ended: schedule the guides to hide.
    pub fn end_drag(&mut self) {
        self.cancel_pending_hide();
        if !self.visibility().any() {
            return;
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            *self.guides.lock() = GuideVisibility::default();
            return;
        };

        let guides = Arc::clone(&self.guides);
        let delay = self.hide_delay;
        debug!("Scheduling snap guide hide in {:?}", delay);
        self.pending_hide = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            *guides.lock() = GuideVisibility::default();
        }));
    }

    pub fn cancel_pending_hide(&mut self) {
        if let Some(task) = self.pending_hide.take() {
            task.abort();
        }
    }
}

impl Drop for SnapGuideAssistant {
    fn drop(&mut self) {
        self.cancel_pending_hide();
    }
}
