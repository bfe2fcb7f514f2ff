//! Grouping, presentation, template and persistence operations for Canvas.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use widgetcanvas_core::{Color, DecodeError, FontStyle, GroupingError, Result, Size, WidgetId};

use crate::aspect_ratio::AspectRatio;
use crate::model::Selectable;
use crate::rescaler::RescaleReason;
use crate::serialization::DesignDocument;
use crate::templates::{TemplateFile, TemplateVersion};

use super::Canvas;

impl Canvas {
    /// Group the current selection.
    pub fn group_selected(&mut self) -> std::result::Result<WidgetId, GroupingError> {
        let ids = self.selection.selected_ids();
        self.group(&ids)
    }

    /// Group `ids`. On error nothing changes and the reason is user-presentable.
    pub fn group(&mut self, ids: &[WidgetId]) -> std::result::Result<WidgetId, GroupingError> {
        self.grouping
            .create_group(&mut self.store, &mut self.selection, ids)
    }

    /// Dissolve a group; returns the member ids in draw order.
    pub fn ungroup(&mut self, id: &WidgetId) -> std::result::Result<Vec<WidgetId>, GroupingError> {
        self.grouping.ungroup(&mut self.store, &mut self.selection, id)
    }

    /// Apply `color` to every selected widget. Returns how many changed.
    pub fn apply_color(&mut self, color: Color) -> usize {
        let ids = self.selection.selected_ids();
        let mut changed = 0;
        for id in &ids {
            if let Some(widget) = self.store.get_mut(id) {
                widget.apply_color(color);
                changed += 1;
                if let Some(preferences) = self.preferences.as_mut() {
                    preferences.save_color(id, color);
                }
            }
        }
        changed
    }

    /// Apply `font` to every selected widget. Returns how many changed.
    pub fn apply_font(&mut self, font: &FontStyle) -> usize {
        let ids = self.selection.selected_ids();
        let mut changed = 0;
        for id in &ids {
            if let Some(widget) = self.store.get_mut(id) {
                widget.apply_font(font.clone());
                changed += 1;
                if let Some(preferences) = self.preferences.as_mut() {
                    preferences.save_font(id, font);
                }
            }
        }
        changed
    }

    /// Encode the current layout as a template with a fresh id.
    pub fn export_template(&self, name: impl Into<String>) -> Result<TemplateFile> {
        let mut template = self.codec.encode(
            Uuid::new_v4().to_string(),
            name,
            self.size,
            self.store.iter(),
        )?;
        if !self.background.is_null() {
            template.background_transform = Some(self.background.clone());
        }
        Ok(template)
    }

    /// Replace the canvas contents with `template`, decoded for the current size.
    ///
    /// Before the first layout the widgets sit on the template's own canvas
    /// and are ratio-placed once the canvas gets a size. Returns the type tags
    /// of skipped items. On error the canvas is untouched.
    pub fn apply_template(
        &mut self,
        template: &TemplateFile,
    ) -> std::result::Result<Vec<String>, DecodeError> {
        let pending = self.size.is_empty();
        let target = if !pending {
            self.size
        } else if TemplateVersion::parse(&template.version)? == TemplateVersion::Legacy {
            self.codec.legacy_canvas()
        } else {
            template.canvas_size
        };
        let decoded = self.codec.decode(template, target)?;

        if let Some(background) = decoded.background_transform {
            self.background = background;
        }
        info!(
            "Applied template '{}' ({} widgets, {} skipped)",
            template.name,
            decoded.widgets.len(),
            decoded.skipped.len()
        );
        self.replace_widgets(decoded.widgets);
        if pending {
            self.rescaler.reset(Size::zero());
            self.template_basis = Some(target);
        } else {
            self.rescaler.reset(self.size);
        }
        Ok(decoded.skipped)
    }

    /// Immutable snapshot of the design, safe to hand to another task.
    pub fn snapshot(&self) -> DesignDocument {
        DesignDocument::capture(
            self.size,
            self.aspect_ratio.tag,
            self.background.clone(),
            self.store.iter(),
        )
    }

    /// Replace the canvas contents with a saved design.
    ///
    /// Widgets are rescaled from the saved canvas size to the current one.
    /// Unknown widget types are skipped and their tags returned; any other
    /// problem fails the whole document and leaves the canvas untouched.
    pub fn restore(
        &mut self,
        document: &DesignDocument,
    ) -> std::result::Result<Vec<String>, DecodeError> {
        let restored = document.restore_widgets(self.preferences.as_deref())?;

        match AspectRatio::from_tag(&document.aspect_ratio_tag) {
            Some(aspect_ratio) => self.aspect_ratio = aspect_ratio,
            None => warn!(
                "Unknown aspect ratio '{}', keeping {}",
                document.aspect_ratio_tag, self.aspect_ratio.tag
            ),
        }
        self.background = document.background_descriptor.clone();
        self.replace_widgets(restored.widgets);

        let target = if self.viewport.is_empty() {
            self.size
        } else {
            self.aspect_ratio.fit_within(self.viewport)
        };
        self.rescaler.reset(document.canvas_size);
        if !target.is_empty() {
            self.apply_size(target, RescaleReason::StateRestored);
        } else if !document.canvas_size.is_empty() {
            self.size = document.canvas_size;
        }

        info!(
            "Restored design with {} widgets on {:.0}x{:.0} canvas",
            self.store.len(),
            self.size.width,
            self.size.height
        );
        Ok(restored.skipped)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.snapshot().save_to_file(path)
    }

    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> std::result::Result<Vec<String>, DecodeError> {
        let document = DesignDocument::load_from_file(path)?;
        self.restore(&document)
    }

    /// Snapshot now and return a future that writes it to `path`.
    pub fn save_in_background(
        &self,
        path: PathBuf,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let document = self.snapshot();
        async move { document.save_async(path).await }
    }
}
