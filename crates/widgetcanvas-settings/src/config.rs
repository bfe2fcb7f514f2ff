//! Layout configuration
//!
//! Tunables for the layout engine. Every field falls back to its built-in
//! default when absent from the file, so partial configs are valid.
//!
//! Supports JSON and TOML, dispatched on the file extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use widgetcanvas_core::constants::{
    DEFAULT_GRID_SIZE, DEFAULT_GROUP_PADDING, DEFAULT_GUIDE_HIDE_DELAY_MS, DEFAULT_SNAP_THRESHOLD,
    LEGACY_TEMPLATE_CANVAS_SIZE, MIN_WIDGET_DIMENSION,
};
use widgetcanvas_core::Size;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Layout engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Grid step resize edges snap to
    pub grid_size: f64,
    /// Smallest committed width or height
    pub min_dimension: f64,
    /// Padding around member bounds for new groups
    pub group_padding: f64,
    /// Center-snap distance during drags
    pub snap_threshold: f64,
    /// Delay before snap guides hide after a drag
    pub guide_hide_delay_ms: u64,
    /// Inset kept between rescaled widgets and the canvas edge
    pub clamp_margin: f64,
    /// Width of the canvas legacy templates were authored on
    pub legacy_canvas_width: f64,
    /// Height of the canvas legacy templates were authored on
    pub legacy_canvas_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_dimension: MIN_WIDGET_DIMENSION,
            group_padding: DEFAULT_GROUP_PADDING,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            guide_hide_delay_ms: DEFAULT_GUIDE_HIDE_DELAY_MS,
            clamp_margin: 0.0,
            legacy_canvas_width: LEGACY_TEMPLATE_CANVAS_SIZE.width,
            legacy_canvas_height: LEGACY_TEMPLATE_CANVAS_SIZE.height,
        }
    }
}

enum ConfigFormat {
    Json,
    Toml,
}

fn format_for(path: &Path) -> ConfigResult<ConfigFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl LayoutConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guide_hide_delay(&self) -> Duration {
        Duration::from_millis(self.guide_hide_delay_ms)
    }

    pub fn legacy_canvas_size(&self) -> Size {
        Size::new(self.legacy_canvas_width, self.legacy_canvas_height)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded layout config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path`, or return defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(
                "No layout config at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Platform config location: `<config dir>/widgetcanvas/layout.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("widgetcanvas").join("layout.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("grid_size", self.grid_size),
            ("min_dimension", self.min_dimension),
            ("snap_threshold", self.snap_threshold),
            ("legacy_canvas_width", self.legacy_canvas_width),
            ("legacy_canvas_height", self.legacy_canvas_height),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(out_of_range(key, value));
            }
        }

        let non_negative = [
            ("group_padding", self.group_padding),
            ("clamp_margin", self.clamp_margin),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(out_of_range(key, value));
            }
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
