//! Canvas Rescaler
//!
//! Keeps widgets in proportion when the canvas size changes. Centers scale
//! per axis; sizes scale by the uniform factor `sqrt(sx * sy)` so widgets
//! keep their own aspect ratio. Rescaled frames are translated back inside
//! the canvas, and text widgets are re-baselined so their effective content
//! scale follows the new size.

use tracing::{debug, info};

use widgetcanvas_core::{CanvasFrame, Listeners, Point, Rect, Size, SubscriptionId};

use crate::model::Widget;

/// Why the canvas changed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleReason {
    AspectRatioChanged,
    ViewportResized,
    TemplateApplied,
    StateRestored,
}

impl std::fmt::Display for RescaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RescaleReason::AspectRatioChanged => "aspect ratio changed",
            RescaleReason::ViewportResized => "viewport resized",
            RescaleReason::TemplateApplied => "template applied",
            RescaleReason::StateRestored => "state restored",
        };
        f.write_str(label)
    }
}

/// Scale factors between two canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleFactors {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Geometric mean of the axis factors, applied to widget sizes.
    pub uniform: f64,
}

impl RescaleFactors {
    /// Factors taking `from` to `to`. `None` when either size is empty.
    pub fn between(from: Size, to: Size) -> Option<Self> {
        if from.is_empty() || to.is_empty() {
            return None;
        }
        let scale_x = to.width / from.width;
        let scale_y = to.height / from.height;
        Some(Self {
            scale_x,
            scale_y,
            uniform: (scale_x * scale_y).sqrt(),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.scale_x == 1.0 && self.scale_y == 1.0
    }
}

/// Published after every rescale.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasResized {
    pub from: Size,
    pub to: Size,
    pub reason: RescaleReason,
    pub factors: RescaleFactors,
}

/// Rescale one frame and clamp it inside `canvas` inset by `margin`.
pub fn rescale_frame(frame: &Rect, factors: &RescaleFactors, canvas: Size, margin: f64) -> Rect {
    let center = frame.center();
    let scaled_center = Point::new(
        center.x * factors.scale_x,
        center.y * factors.scale_y,
    );
    Rect::from_center(scaled_center, frame.size().scaled(factors.uniform))
        .clamped_within(canvas, margin)
}

/// Tracks the canvas size and rescales widgets when it changes.
#[derive(Debug, Default)]
pub struct CanvasRescaler {
    previous: Size,
    margin: f64,
    listeners: Listeners<CanvasResized>,
}

impl CanvasRescaler {
    pub fn new(margin: f64) -> Self {
        Self {
            previous: Size::zero(),
            margin,
            listeners: Listeners::new(),
        }
    }

    /// Last canvas size seen. Zero before the first layout.
    pub fn previous_size(&self) -> Size {
        self.previous
    }

    /// Record `size` as the current canvas size without touching any widget.
    pub fn reset(&mut self, size: Size) {
        self.previous = size;
    }

    /// Move to `new_size`, rescaling `widgets` from the previous size.
    ///
    /// Returns `None` and leaves widgets alone when the previous size is
    /// empty (first layout) or unchanged. The new size is recorded either way.
    pub fn resize_canvas<'a, I>(
        &mut self,
        new_size: Size,
        reason: RescaleReason,
        widgets: I,
    ) -> Option<RescaleFactors>
    where
        I: IntoIterator<Item = &'a mut Widget>,
    {
        let from = self.previous;
        if new_size.is_empty() {
            debug!("Ignoring empty canvas size {:?} ({})", new_size, reason);
            return None;
        }
        self.previous = new_size;

        let factors = RescaleFactors::between(from, new_size)?;
        if factors.is_identity() {
            return None;
        }

        let mut count = 0usize;
        for widget in widgets {
            let rect = rescale_frame(&widget.rect(), &factors, new_size, self.margin);
            widget.set_frame(CanvasFrame::new(rect));
            widget.rebaseline();
            count += 1;
        }

        info!(
            "Canvas rescaled ({}): {:.1}x{:.1} -> {:.1}x{:.1}, sx={:.4} sy={:.4}, {} widgets",
            reason,
            from.width,
            from.height,
            new_size.width,
            new_size.height,
            factors.scale_x,
            factors.scale_y,
            count
        );

        self.listeners.emit(&CanvasResized {
            from,
            to: new_size,
            reason,
            factors,
        });
        Some(factors)
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&CanvasResized) + Send + Sync + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
