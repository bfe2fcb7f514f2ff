//! Canvas aspect-ratio presets and viewport fitting.

use widgetcanvas_core::Size;

/// A canvas aspect ratio with the pixel size used for export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub tag: &'static str,
    /// Width divided by height.
    pub ratio: f64,
    pub export_size: Size,
}

impl AspectRatio {
    pub const PORTRAIT_STORY: AspectRatio = AspectRatio::preset("9:16", 1080.0, 1920.0);
    pub const PORTRAIT_POST: AspectRatio = AspectRatio::preset("4:5", 1080.0, 1350.0);
    pub const SQUARE: AspectRatio = AspectRatio::preset("1:1", 1080.0, 1080.0);
    pub const LANDSCAPE: AspectRatio = AspectRatio::preset("16:9", 1920.0, 1080.0);
    pub const PORTRAIT_CLASSIC: AspectRatio = AspectRatio::preset("3:4", 1080.0, 1440.0);

    pub const PRESETS: [AspectRatio; 5] = [
        Self::PORTRAIT_STORY,
        Self::PORTRAIT_POST,
        Self::SQUARE,
        Self::LANDSCAPE,
        Self::PORTRAIT_CLASSIC,
    ];

    const fn preset(tag: &'static str, width: f64, height: f64) -> Self {
        Self {
            tag,
            ratio: width / height,
            export_size: Size::new(width, height),
        }
    }

    /// Look up a preset by tag, e.g. `"4:5"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::PRESETS.iter().copied().find(|preset| preset.tag == tag)
    }

    /// Largest size with this ratio that fits inside `available`.
    pub fn fit_within(&self, available: Size) -> Size {
        fit_canvas(available, self.ratio)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT_STORY
    }
}

/// Largest `width / height == ratio` size fitting inside `available`.
///
/// Returns zero for an empty viewport or a non-positive ratio.
pub fn fit_canvas(available: Size, ratio: f64) -> Size {
    if available.is_empty() || ratio <= 0.0 || !ratio.is_finite() {
        return Size::zero();
    }
    if available.width / available.height > ratio {
        Size::new(available.height * ratio, available.height)
    } else {
        Size::new(available.width, available.width / ratio)
    }
}
