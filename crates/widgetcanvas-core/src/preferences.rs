//! Per-widget presentation preferences.
//!
//! Color and font choices are remembered per widget identifier so they can
//! be re-applied when a design is restored without them.

use std::collections::HashMap;

use crate::identity::WidgetId;
use crate::presentation::{Color, FontStyle};

/// Storage for per-widget color and font preferences.
pub trait PreferenceRepository: Send + Sync {
    fn load_color(&self, id: &WidgetId) -> Option<Color>;
    fn save_color(&mut self, id: &WidgetId, color: Color);
    fn load_font(&self, id: &WidgetId) -> Option<FontStyle>;
    fn save_font(&mut self, id: &WidgetId, font: &FontStyle);
    /// Drop every preference stored for `id`.
    fn forget(&mut self, id: &WidgetId);
}

/// Process-local preference store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    colors: HashMap<WidgetId, Color>,
    fonts: HashMap<WidgetId, FontStyle>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colors.len() + self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.fonts.is_empty()
    }
}

impl PreferenceRepository for InMemoryPreferences {
    fn load_color(&self, id: &WidgetId) -> Option<Color> {
        self.colors.get(id).copied()
    }

    fn save_color(&mut self, id: &WidgetId, color: Color) {
        self.colors.insert(*id, color);
    }

    fn load_font(&self, id: &WidgetId) -> Option<FontStyle> {
        self.fonts.get(id).cloned()
    }

    fn save_font(&mut self, id: &WidgetId, font: &FontStyle) {
        self.fonts.insert(*id, font.clone());
    }

    fn forget(&mut self, id: &WidgetId) {
        self.colors.remove(id);
        self.fonts.remove(id);
    }
}
