//! WidgetCanvas Settings Crate
//!
//! Layout tunables (grid, minimum size, padding, snap threshold) and their
//! JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::LayoutConfig;
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
