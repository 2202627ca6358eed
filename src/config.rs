// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor configuration loaded from TOML.
//!
//! Every field is optional in the file; missing values fall back to the
//! constants in `settings`. A deployment typically only overrides the
//! canvas size or the bottle label footprint for a different product.

use crate::error::Result;
use crate::settings;
use kurbo::{Rect, Size};
use serde::Deserialize;
use std::path::Path;

/// Top-level editor configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub zoom: ZoomConfig,
    pub images: ImageConfig,
    pub bottle: BottleConfig,
    pub export: ExportConfig,
}

/// Logical canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: settings::canvas::WIDTH,
            height: settings::canvas::HEIGHT,
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Zoom limits and step sizes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub factor: f64,
    pub toggle_level: f64,
    pub wheel_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: settings::zoom::MIN,
            max: settings::zoom::MAX,
            factor: settings::zoom::FACTOR,
            toggle_level: settings::zoom::TOGGLE_LEVEL,
            wheel_step: settings::zoom::WHEEL_STEP,
        }
    }
}

/// Image layer sizing
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub min_size: f64,
    pub max_initial_size: f64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_size: settings::image::MIN_SIZE,
            max_initial_size: settings::image::MAX_INITIAL_SIZE,
        }
    }
}

/// A width/height pair as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Bottle view scaling inputs
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BottleConfig {
    /// Fixed base the label scale is computed against. Defaults to the
    /// canvas size when absent.
    pub base: Option<Dimensions>,
    pub desktop_label: Dimensions,
    pub compact_label: Dimensions,
    pub compact_breakpoint: f64,
    pub compact_step: u32,
}

impl Default for BottleConfig {
    fn default() -> Self {
        Self {
            base: None,
            desktop_label: Dimensions::new(
                settings::bottle::DESKTOP_LABEL_WIDTH,
                settings::bottle::DESKTOP_LABEL_HEIGHT,
            ),
            compact_label: Dimensions::new(
                settings::bottle::COMPACT_LABEL_WIDTH,
                settings::bottle::COMPACT_LABEL_HEIGHT,
            ),
            compact_breakpoint: settings::bottle::COMPACT_BREAKPOINT,
            compact_step: settings::bottle::COMPACT_STEP,
        }
    }
}

/// Overlay rectangle on the bottle mockup
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }
}

/// Export resolution and bottle preview composite geometry
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub design_quality: f64,
    pub preview_quality: f64,
    pub preview_design_quality: f64,
    pub mockup: Dimensions,
    pub overlay: OverlayRect,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            design_quality: settings::export::DESIGN_QUALITY,
            preview_quality: settings::export::PREVIEW_QUALITY,
            preview_design_quality: settings::export::PREVIEW_DESIGN_QUALITY,
            mockup: Dimensions::new(
                settings::export::MOCKUP_WIDTH,
                settings::export::MOCKUP_HEIGHT,
            ),
            overlay: OverlayRect {
                x: settings::export::OVERLAY_X,
                y: settings::export::OVERLAY_Y,
                width: settings::export::OVERLAY_WIDTH,
                height: settings::export::OVERLAY_HEIGHT,
            },
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            crate::error::EditorError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!("Loaded editor config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Base dimensions the bottle scale is measured against
    pub fn bottle_base(&self) -> Size {
        self.bottle
            .base
            .map(|b| b.size())
            .unwrap_or_else(|| self.canvas.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.canvas.size(), Size::new(400.0, 600.0));
        assert_eq!(config.zoom.max, 3.0);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = EditorConfig::from_toml_str(
            "[canvas]\nwidth = 500.0\n\n[zoom]\nmax = 4.0\n",
        )
        .unwrap();
        assert_eq!(config.canvas.width, 500.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.zoom.max, 4.0);
        assert_eq!(config.zoom.min, 0.5);
    }

    #[test]
    fn bottle_base_defaults_to_canvas() {
        let config = EditorConfig::default();
        assert_eq!(config.bottle_base(), config.canvas.size());

        let config = EditorConfig::from_toml_str(
            "[bottle.base]\nwidth = 225.0\nheight = 449.0\n",
        )
        .unwrap();
        assert_eq!(config.bottle_base(), Size::new(225.0, 449.0));
    }

    #[test]
    fn overlay_rect_from_defaults() {
        let overlay = ExportConfig::default().overlay.rect();
        assert_eq!(overlay.x0, 2.0);
        assert!((overlay.y0 - 178.4).abs() < 1e-9);
        assert_eq!(overlay.width(), 92.0);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let err = EditorConfig::from_toml_str("[canvas\nwidth = 1").unwrap_err();
        assert!(matches!(err, crate::error::EditorError::Config(_)));
    }
}
