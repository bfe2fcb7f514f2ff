//! Serialization and deserialization for saved designs.
//!
//! A [`DesignDocument`] is an immutable snapshot of a canvas: absolute
//! widget frames in the coordinates of the canvas size recorded alongside
//! them. Group members are stored as ordinary widget records with
//! canvas-global frames; group records list their members by identifier.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use widgetcanvas_core::constants::{DESIGN_FORMAT_VERSION, GROUP_TYPE_TAG};
use widgetcanvas_core::{
    CanvasFrame, Color, DecodeError, Error, FontStyle, PreferenceRepository, Rect, Result, Size,
    WidgetId,
};

use crate::grouping::Group;
use crate::model::{Widget, WidgetKind};

fn default_version() -> String {
    DESIGN_FORMAT_VERSION.to_string()
}

fn default_scale() -> f64 {
    1.0
}

/// One saved widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    pub identifier: String,
    pub type_tag: String,
    /// Absolute frame on the saved canvas.
    pub frame: Rect,
    pub initial_size: Size,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub content_scale_factor: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub font_style: Option<FontStyle>,
    #[serde(default)]
    pub aspect_locked: Option<bool>,
    #[serde(default)]
    pub provenance: Option<String>,
    /// Kind-specific fields.
    #[serde(default)]
    pub content: Value,
    /// Host data.
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub z_index: usize,
}

impl WidgetRecord {
    fn capture(widget: &Widget, z_index: usize) -> Self {
        Self {
            identifier: widget.id.to_string(),
            type_tag: widget.type_tag().to_string(),
            frame: widget.rect(),
            initial_size: widget.initial_size,
            rotation: widget.rotation,
            content_scale_factor: widget.content_scale,
            color: Some(widget.color),
            font_style: Some(widget.font.clone()),
            aspect_locked: Some(widget.aspect_locked),
            provenance: widget.provenance.clone(),
            content: widget.kind.content(),
            payload: widget.payload.clone(),
            z_index,
        }
    }

    fn is_finite(&self) -> bool {
        self.frame.is_finite()
            && self.initial_size.is_finite()
            && self.rotation.is_finite()
            && self.content_scale_factor.is_finite()
    }
}

/// One saved group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub identifier: String,
    pub type_tag: String,
    pub frame: Rect,
    #[serde(default)]
    pub owner_label: Option<String>,
    pub member_identifiers: Vec<String>,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: usize,
}

/// A saved canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub background_descriptor: Value,
    pub canvas_size: Size,
    #[serde(default)]
    pub aspect_ratio_tag: String,
    #[serde(default)]
    pub widgets: Vec<WidgetRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

/// Widgets rebuilt from a document, in draw order.
#[derive(Debug, Clone)]
pub struct RestoredLayout {
    pub widgets: Vec<Widget>,
    /// Type tags of records this build does not know.
    pub skipped: Vec<String>,
}

impl DesignDocument {
    /// Snapshot `widgets` (in draw order) on a canvas of `canvas_size`.
    pub fn capture<'a, I>(
        canvas_size: Size,
        aspect_ratio_tag: impl Into<String>,
        background_descriptor: Value,
        widgets: I,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Widget>,
    {
        let mut records = Vec::new();
        let mut groups = Vec::new();

        for (z_index, widget) in widgets.into_iter().enumerate() {
            match widget.kind.as_group() {
                Some(group) => {
                    let members = group.members_on_canvas(widget.rect().origin());
                    groups.push(GroupRecord {
                        identifier: widget.id.to_string(),
                        type_tag: GROUP_TYPE_TAG.to_string(),
                        frame: widget.rect(),
                        owner_label: group.owner_label.clone(),
                        member_identifiers: members.iter().map(|m| m.id.to_string()).collect(),
                        rotation: widget.rotation,
                        z_index,
                    });
                    records.extend(members.iter().map(|m| WidgetRecord::capture(m, z_index)));
                }
                None => records.push(WidgetRecord::capture(widget, z_index)),
            }
        }

        Self {
            version: default_version(),
            background_descriptor,
            canvas_size,
            aspect_ratio_tag: aspect_ratio_tag.into(),
            widgets: records,
            groups,
            modified_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::other(format!("Failed to serialize design: {}", e)))
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, DecodeError> {
        let document: Self = serde_json::from_str(json)?;
        let major = document.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(DecodeError::UnsupportedVersion {
                version: document.version,
            });
        }
        Ok(document)
    }

    /// Save design to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load design from file
    pub fn load_from_file(path: impl AsRef<Path>) -> std::result::Result<Self, DecodeError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| DecodeError::Io {
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Write this snapshot without blocking the caller's thread.
    pub async fn save_async(self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        tokio::fs::write(path.as_ref(), json).await?;
        debug!("Saved design to {}", path.as_ref().display());
        Ok(())
    }

    /// Rebuild the widgets of this document in its own canvas coordinates.
    ///
    /// Records with unknown type tags are skipped (members of a group
    /// included). Any other inconsistency fails the whole document.
    /// `preferences` fills in color and font for records that lack them.
    pub fn restore_widgets(
        &self,
        preferences: Option<&dyn PreferenceRepository>,
    ) -> std::result::Result<RestoredLayout, DecodeError> {
        if !self.canvas_size.is_finite() {
            return Err(DecodeError::NonFiniteGeometry {
                item: "canvasSize".to_string(),
            });
        }

        let mut skipped = Vec::new();
        let mut skipped_ids = HashSet::new();
        let mut known: HashMap<WidgetId, (usize, Widget)> = HashMap::new();
        let mut record_order = Vec::new();

        for record in &self.widgets {
            let id = parse_id(&record.identifier)?;
            if !record.is_finite() {
                return Err(DecodeError::NonFiniteGeometry {
                    item: format!("widget {}", record.identifier),
                });
            }
            let Some(kind) = WidgetKind::from_tag(&record.type_tag, &record.content) else {
                warn!(
                    "Skipping widget {} with unknown type '{}'",
                    record.identifier, record.type_tag
                );
                skipped.push(record.type_tag.clone());
                skipped_ids.insert(id);
                continue;
            };

            let widget = widget_from_record(record, id, kind, preferences);
            record_order.push(id);
            known.insert(id, (record.z_index, widget));
        }

        let mut restored: Vec<(usize, Widget)> = Vec::new();

        for record in &self.groups {
            let id = parse_id(&record.identifier)?;
            if !record.frame.is_finite() || !record.rotation.is_finite() {
                return Err(DecodeError::NonFiniteGeometry {
                    item: format!("group {}", record.identifier),
                });
            }
            if record.type_tag != GROUP_TYPE_TAG {
                warn!(
                    "Skipping group {} with unknown type '{}'",
                    record.identifier, record.type_tag
                );
                skipped.push(record.type_tag.clone());
                continue;
            }

            let origin = record.frame.origin();
            let mut members = Vec::with_capacity(record.member_identifiers.len());
            for member in &record.member_identifiers {
                let member_id = parse_id(member)?;
                match known.remove(&member_id) {
                    Some((_, widget)) => members.push(widget.into_group_local(origin)),
                    None if skipped_ids.contains(&member_id) => continue,
                    None => {
                        return Err(DecodeError::MissingGroupMember {
                            group: record.identifier.clone(),
                            member: member.clone(),
                        })
                    }
                }
            }
            if members.is_empty() {
                warn!("Dropping group {} with no restorable members", record.identifier);
                continue;
            }

            let group = Group::new(members, record.frame, record.owner_label.clone());
            let mut widget = Widget::new(WidgetKind::Group(group), CanvasFrame::new(record.frame))
                .with_id(id)
                .with_rotation(record.rotation);
            widget.provenance = record.owner_label.clone();
            restored.push((record.z_index, widget));
        }

        for id in record_order {
            if let Some(entry) = known.remove(&id) {
                restored.push(entry);
            }
        }
        restored.sort_by_key(|(z_index, _)| *z_index);

        Ok(RestoredLayout {
            widgets: restored.into_iter().map(|(_, widget)| widget).collect(),
            skipped,
        })
    }
}

fn parse_id(value: &str) -> std::result::Result<WidgetId, DecodeError> {
    WidgetId::parse_str(value).map_err(|_| DecodeError::InvalidIdentifier {
        value: value.to_string(),
    })
}

fn widget_from_record(
    record: &WidgetRecord,
    id: WidgetId,
    kind: WidgetKind,
    preferences: Option<&dyn PreferenceRepository>,
) -> Widget {
    let mut widget = Widget::new(kind, CanvasFrame::new(record.frame))
        .with_id(id)
        .with_rotation(record.rotation)
        .with_payload(record.payload.clone());

    widget.initial_size = record.initial_size;
    widget.content_scale = record.content_scale_factor;
    widget.provenance = record.provenance.clone();
    if let Some(locked) = record.aspect_locked {
        widget.aspect_locked = locked;
    }

    widget.color = record
        .color
        .or_else(|| preferences.and_then(|p| p.load_color(&id)))
        .unwrap_or_default();
    widget.font = record
        .font_style
        .clone()
        .or_else(|| preferences.and_then(|p| p.load_font(&id)))
        .unwrap_or_default();
    widget
}
