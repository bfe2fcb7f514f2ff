//! # Template Codec
//!
//! Templates store widget geometry as fractions of the canvas they were
//! authored on, so a layout renders proportionally on any canvas size.
//!
//! Format versions:
//! - `"1.0"`: items carry absolute `position` / `size`. They are read as if
//!   authored on a fixed legacy canvas (375x667 by default), which is an
//!   approximation for templates authored at any other size.
//! - `"2.0"` and later: items carry `ratioPosition` / `ratioSize`.
//!
//! The encoder always writes the current version. Groups are flattened:
//! their members are exported as individual canvas-space items.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use widgetcanvas_core::constants::{
    LEGACY_TEMPLATE_CANVAS_SIZE, LEGACY_TEMPLATE_FORMAT_VERSION, TEMPLATE_FORMAT_VERSION,
};
use widgetcanvas_core::{
    CanvasFrame, Color, DecodeError, Error, FontStyle, Point, Rect, Result, Size,
};
use widgetcanvas_settings::LayoutConfig;

use crate::model::{Widget, WidgetKind};

const HOST_PAYLOAD_KEY: &str = "host";

/// A frame expressed as fractions of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RatioFrame {
    /// `(x/W, y/H, w/W, h/H)`. `None` for an empty canvas.
    pub fn encode(frame: &Rect, canvas: Size) -> Option<Self> {
        if canvas.is_empty() {
            return None;
        }
        Some(Self {
            x: frame.x / canvas.width,
            y: frame.y / canvas.height,
            width: frame.width / canvas.width,
            height: frame.height / canvas.height,
        })
    }

    /// Absolute frame on a canvas of size `target`.
    pub fn decode(&self, target: Size) -> Rect {
        Rect::new(
            self.x * target.width,
            self.y * target.height,
            self.width * target.width,
            self.height * target.height,
        )
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn from_parts(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }
}

/// Template format family, derived from the version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVersion {
    /// 1.x: absolute coordinates.
    Legacy,
    /// 2.x and later: ratio coordinates.
    Ratio,
}

impl TemplateVersion {
    /// Version string this family is written with.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateVersion::Legacy => LEGACY_TEMPLATE_FORMAT_VERSION,
            TemplateVersion::Ratio => TEMPLATE_FORMAT_VERSION,
        }
    }

    pub fn parse(version: &str) -> std::result::Result<Self, DecodeError> {
        let major = version
            .trim()
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok());
        match major {
            Some(1) => Ok(TemplateVersion::Legacy),
            Some(major) if major >= 2 => Ok(TemplateVersion::Ratio),
            _ => Err(DecodeError::UnsupportedVersion {
                version: version.to_string(),
            }),
        }
    }
}

/// One widget in a template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_size: Option<Size>,
    /// Absolute position, version 1.0 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// Absolute size, version 1.0 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// A shareable layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    /// Canvas size at encode time.
    pub canvas_size: Size,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_transform: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

impl TemplateFile {
    /// Empty template in the current format, timestamped now.
    pub fn new(id: impl Into<String>, name: impl Into<String>, canvas_size: Size) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: TemplateVersion::Ratio.as_str().to_string(),
            canvas_size,
            items: Vec::new(),
            background_transform: None,
            minimum_app_version: None,
            tags: Vec::new(),
            created_at: Some(now.clone()),
            modified_at: Some(now),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::other(format!("Failed to serialize template: {}", e)))
    }

    /// Mark as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now().to_rfc3339());
    }

    /// Case-insensitive match on name, description and tags.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&q))
    }
}

/// Widgets rebuilt from a template.
#[derive(Debug, Clone)]
pub struct DecodedTemplate {
    pub widgets: Vec<Widget>,
    /// Type tags of items this build does not know, in file order.
    pub skipped: Vec<String>,
    pub background_transform: Option<Value>,
}

/// Encodes canvases into templates and decodes templates onto canvases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateCodec {
    legacy_canvas: Size,
}

impl Default for TemplateCodec {
    fn default() -> Self {
        Self::new(LEGACY_TEMPLATE_CANVAS_SIZE)
    }
}

impl TemplateCodec {
    pub fn new(legacy_canvas: Size) -> Self {
        Self { legacy_canvas }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.legacy_canvas_size())
    }

    pub fn legacy_canvas(&self) -> Size {
        self.legacy_canvas
    }

    /// Encode `widgets` laid out on `canvas` as a template.
    ///
    /// Group widgets are flattened into their members.
    pub fn encode<'a, I>(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        canvas: Size,
        widgets: I,
    ) -> Result<TemplateFile>
    where
        I: IntoIterator<Item = &'a Widget>,
    {
        if canvas.is_empty() {
            return Err(Error::other(format!(
                "Cannot encode a template for an empty canvas {}x{}",
                canvas.width, canvas.height
            )));
        }

        let mut template = TemplateFile::new(id, name, canvas);
        for widget in widgets {
            match widget.kind.as_group() {
                Some(group) => {
                    for member in group.members_on_canvas(widget.rect().origin()) {
                        template.items.push(encode_item(&member, canvas));
                    }
                }
                None => template.items.push(encode_item(widget, canvas)),
            }
        }
        Ok(template)
    }

    /// Rebuild widgets from `template` for a canvas of size `target`.
    ///
    /// Items of unknown type are skipped. Any other problem fails the whole
    /// template. When `target` is empty the stored frames are used as-is,
    /// which for ratio items means the template's own canvas size.
    pub fn decode(
        &self,
        template: &TemplateFile,
        target: Size,
    ) -> std::result::Result<DecodedTemplate, DecodeError> {
        let version = TemplateVersion::parse(&template.version)?;
        if version == TemplateVersion::Legacy {
            info!(
                "Migrating legacy template '{}' (v{}) from assumed {}x{} canvas",
                template.id, template.version, self.legacy_canvas.width, self.legacy_canvas.height
            );
        }

        let mut widgets = Vec::with_capacity(template.items.len());
        let mut skipped = Vec::new();

        for (index, item) in template.items.iter().enumerate() {
            let payload = item.payload.clone().unwrap_or(Value::Null);
            let Some(kind) = WidgetKind::from_tag(&item.item_type, &payload) else {
                warn!(
                    "Skipping template item {} of unknown type '{}'",
                    index, item.item_type
                );
                skipped.push(item.item_type.clone());
                continue;
            };

            let frame = match version {
                TemplateVersion::Ratio => self.ratio_item_frame(template, item, index, target)?,
                TemplateVersion::Legacy => self.legacy_item_frame(item, index, target)?,
            };
            let rotation = item.rotation.unwrap_or(0.0);
            if !frame.is_finite() || !rotation.is_finite() {
                return Err(DecodeError::NonFiniteGeometry {
                    item: format!("template item {}", index),
                });
            }

            let mut widget = Widget::new(kind, CanvasFrame::new(frame)).with_rotation(rotation);
            if let Some(color) = item.color {
                widget.color = color;
            }
            if let Some(font) = &item.font {
                widget.font = font.clone();
            }
            widget.payload = payload.get(HOST_PAYLOAD_KEY).cloned().unwrap_or(Value::Null);
            widgets.push(widget);
        }

        Ok(DecodedTemplate {
            widgets,
            skipped,
            background_transform: template.background_transform.clone(),
        })
    }

    fn ratio_item_frame(
        &self,
        template: &TemplateFile,
        item: &TemplateItem,
        index: usize,
        target: Size,
    ) -> std::result::Result<Rect, DecodeError> {
        let position = item.ratio_position.ok_or_else(|| missing(index, "ratioPosition"))?;
        let size = item.ratio_size.ok_or_else(|| missing(index, "ratioSize"))?;
        let ratio = RatioFrame::from_parts(position, size);

        if !target.is_empty() {
            return Ok(ratio.decode(target));
        }
        if !template.canvas_size.is_empty() {
            return Ok(ratio.decode(template.canvas_size));
        }
        Err(missing(index, "canvasSize"))
    }

    fn legacy_item_frame(
        &self,
        item: &TemplateItem,
        index: usize,
        target: Size,
    ) -> std::result::Result<Rect, DecodeError> {
        let position = item.position.ok_or_else(|| missing(index, "position"))?;
        let size = item.size.ok_or_else(|| missing(index, "size"))?;
        let absolute = Rect::from_origin_size(position, size);

        if target.is_empty() {
            return Ok(absolute);
        }
        match RatioFrame::encode(&absolute, self.legacy_canvas) {
            Some(ratio) => Ok(ratio.decode(target)),
            None => Ok(absolute),
        }
    }
}

fn missing(index: usize, field: &str) -> DecodeError {
    DecodeError::MissingGeometry {
        index,
        field: field.to_string(),
    }
}

fn encode_item(widget: &Widget, canvas: Size) -> TemplateItem {
    let ratio = RatioFrame::encode(&widget.rect(), canvas).unwrap_or(RatioFrame {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    });

    let mut payload = match widget.kind.content() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if !widget.payload.is_null() {
        payload.insert(HOST_PAYLOAD_KEY.to_string(), widget.payload.clone());
    }

    TemplateItem {
        item_type: widget.type_tag().to_string(),
        ratio_position: Some(ratio.position()),
        ratio_size: Some(ratio.size()),
        position: None,
        size: None,
        rotation: (widget.rotation != 0.0).then_some(widget.rotation),
        color: Some(widget.color),
        font: widget.has_content_scale().then(|| widget.font.clone()),
        payload: (!payload.is_empty()).then_some(Value::Object(payload)),
    }
}
