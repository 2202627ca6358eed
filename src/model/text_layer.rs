// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Text layers: content, typography, effects and curve parameters.
//!
//! The anchor (`x`, `y`) is the center of the rendered text, horizontally
//! and vertically. `width` and `height` are a cache of the derived bounds;
//! the store refreshes them after every edit and re-derives bounds before
//! hit testing, so nothing reads them for correctness.

use super::LayerId;
use crate::settings;
use crate::text::FontSpec;
use crate::theme;
use peniko::Color;
use serde::Deserialize;

/// Independent effect toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextEffects {
    pub shadow: bool,
    pub outline: bool,
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
    pub curve: bool,
}

impl TextEffects {
    /// Number of effects that grow the bounds (shadow, outline)
    pub fn padding_effects(&self) -> u32 {
        u32::from(self.shadow) + u32::from(self.outline)
    }
}

/// Which way a curved line bends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveDirection {
    /// Arc bulges upward, text on top of the circle
    #[default]
    Up,
    /// Arc bulges downward
    Down,
}

impl CurveDirection {
    /// +1 for up, -1 for down
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Arc layout parameters, used only while the curve effect is on
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Arc span in degrees
    pub angle: f64,
    /// Radius as a multiple of the font size
    pub radius: f64,
    pub direction: CurveDirection,
    /// Rotation of the arc's midpoint away from vertical, in degrees
    pub offset: f64,
    /// Multiplier on the arc span consumed by the glyphs
    pub spacing: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            angle: settings::text::curve::ANGLE,
            radius: settings::text::curve::RADIUS,
            direction: CurveDirection::Up,
            offset: 0.0,
            spacing: settings::text::curve::SPACING,
        }
    }
}

/// One editable text string on the canvas
#[derive(Debug, Clone)]
pub struct TextLayer {
    pub id: LayerId,
    pub text: String,
    /// Center anchor
    pub x: f64,
    pub y: f64,
    pub font_family: String,
    pub font_size: f64,
    pub color: Color,
    /// Degrees, normalized to [0, 360)
    pub rotation: f64,
    pub letter_spacing: f64,
    pub line_height: f64,
    pub effects: TextEffects,
    pub curve: CurveParams,
    /// Cached bounding width
    pub width: f64,
    /// Cached bounding height
    pub height: f64,
}

impl TextLayer {
    /// Create a text layer with default content and styling at `anchor`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: LayerId::next(),
            text: settings::text::DEFAULT_TEXT.to_string(),
            x,
            y,
            font_family: settings::text::DEFAULT_FONT_FAMILY.to_string(),
            font_size: settings::text::DEFAULT_FONT_SIZE,
            color: theme::text::DEFAULT_FILL,
            rotation: 0.0,
            letter_spacing: 0.0,
            line_height: settings::text::DEFAULT_LINE_HEIGHT,
            effects: TextEffects::default(),
            curve: CurveParams::default(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// The string as drawn. Uppercasing never touches stored content.
    pub fn display_text(&self) -> String {
        if self.effects.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }

    /// Font the layer is measured and drawn with.
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
            bold: self.effects.bold,
            italic: self.effects.italic,
        }
    }

    /// Anchor as a point
    pub fn anchor(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// True when glyphs are laid out one by one with explicit spacing.
    pub fn is_spaced(&self) -> bool {
        self.letter_spacing != 0.0
    }

    /// True when glyphs follow an arc. Letter spacing takes precedence.
    pub fn is_curved(&self) -> bool {
        self.effects.curve && !self.is_spaced()
    }

    /// Scale the geometry-bearing properties uniformly.
    pub fn scale_geometry(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
        self.font_size *= factor;
        self.letter_spacing *= factor;
        self.width *= factor;
        self.height *= factor;
    }

    /// Apply a partial update. Cached bounds are left for the store to
    /// refresh.
    pub fn apply(&mut self, patch: &TextPatch) {
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(family) = &patch.font_family {
            self.font_family.clone_from(family);
        }
        if let Some(size) = patch.font_size {
            self.font_size = size.max(1.0);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation.rem_euclid(360.0);
        }
        if let Some(spacing) = patch.letter_spacing {
            self.letter_spacing = spacing;
        }
        if let Some(line_height) = patch.line_height {
            self.line_height = line_height;
        }
        if let Some(effects) = patch.effects {
            self.effects = effects;
        }
        if let Some(curve) = patch.curve {
            self.curve = curve;
        }
    }
}

/// Partial property update for a text layer
#[derive(Debug, Clone, Default)]
pub struct TextPatch {
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub rotation: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub effects: Option<TextEffects>,
    pub curve: Option<CurveParams>,
}

impl TextPatch {
    /// True if the patch carries any flat-space geometry (position, font
    /// size or letter spacing).
    pub fn has_geometry(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.font_size.is_some()
            || self.letter_spacing.is_some()
    }
}

/// Parse a CSS color string such as `#1a2b3c` or `rgb(0 0 0)`.
pub fn parse_color(text: &str) -> Option<Color> {
    peniko::color::parse_color(text)
        .ok()
        .map(|c| c.to_alpha_color::<peniko::color::Srgb>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_text_button() {
        let layer = TextLayer::new(200.0, 300.0);
        assert_eq!(layer.text, "ENTER TEXT HERE");
        assert_eq!(layer.font_family, "Arial");
        assert_eq!(layer.font_size, 24.0);
        assert_eq!(layer.rotation, 0.0);
        assert_eq!(layer.curve.angle, 90.0);
        assert_eq!(layer.curve.radius, 2.0);
        assert_eq!(layer.curve.direction, CurveDirection::Up);
        assert_eq!(layer.effects, TextEffects::default());
    }

    #[test]
    fn uppercase_is_display_only() {
        let mut layer = TextLayer::new(0.0, 0.0);
        layer.text = "hello".into();
        layer.effects.uppercase = true;
        assert_eq!(layer.display_text(), "HELLO");
        assert_eq!(layer.text, "hello");
    }

    #[test]
    fn letter_spacing_overrides_curve() {
        let mut layer = TextLayer::new(0.0, 0.0);
        layer.effects.curve = true;
        assert!(layer.is_curved());
        layer.letter_spacing = 2.0;
        assert!(!layer.is_curved());
        assert!(layer.is_spaced());
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let mut layer = TextLayer::new(0.0, 0.0);
        layer.apply(&TextPatch {
            x: Some(50.0),
            rotation: Some(-90.0),
            font_size: Some(0.0),
            ..Default::default()
        });
        assert_eq!(layer.x, 50.0);
        assert_eq!(layer.y, 0.0);
        assert_eq!(layer.rotation, 270.0);
        assert_eq!(layer.font_size, 1.0);
        assert_eq!(layer.text, settings::text::DEFAULT_TEXT);
    }

    #[test]
    fn scale_geometry_leaves_style_alone() {
        let mut layer = TextLayer::new(100.0, 200.0);
        layer.letter_spacing = 4.0;
        layer.rotation = 30.0;
        layer.scale_geometry(0.5);
        assert_eq!((layer.x, layer.y), (50.0, 100.0));
        assert_eq!(layer.font_size, 12.0);
        assert_eq!(layer.letter_spacing, 2.0);
        assert_eq!(layer.rotation, 30.0);
    }

    #[test]
    fn parses_hex_colors() {
        let c = parse_color("#ff0000").unwrap();
        assert_eq!(c.to_rgba8().r, 255);
        assert_eq!(c.to_rgba8().g, 0);
        assert!(parse_color("not a color").is_none());
    }
}
