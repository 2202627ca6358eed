// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph placement for text layers.
//!
//! Three shapes exist and they are mutually exclusive: a plain line drawn
//! in one call, letter-spaced glyphs placed one by one, and glyphs placed
//! along an arc. Letter spacing wins over the curve effect.
//!
//! Offsets are relative to the layer anchor and expressed before the
//! layer's own rotation is applied.

use super::TextMeasurer;
use crate::model::TextLayer;
use kurbo::Vec2;

/// One glyph positioned relative to the layer anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Offset of the glyph's center from the anchor
    pub offset: Vec2,
    /// Glyph rotation in radians, clockwise
    pub rotation: f64,
    /// Measured advance of the glyph alone
    pub advance: f64,
}

/// How a text layer's glyphs are laid out
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphRun {
    /// The whole string, centered on the anchor
    Line { text: String, advance: f64 },
    /// Glyphs with explicit letter spacing
    Spaced(Vec<PlacedGlyph>),
    /// Glyphs along an arc
    Curved(Vec<PlacedGlyph>),
}

impl GlyphRun {
    /// Lay out `layer`'s display text with `measurer`.
    pub fn layout(layer: &TextLayer, measurer: &dyn TextMeasurer) -> Self {
        let text = layer.display_text();
        let font = layer.font_spec();

        if layer.is_spaced() {
            return Self::Spaced(spaced_glyphs(&text, layer.letter_spacing, |ch| {
                measurer.measure(ch.encode_utf8(&mut [0; 4]), &font)
            }));
        }
        if layer.is_curved() {
            return Self::Curved(curved_glyphs(&text, layer, |ch| {
                measurer.measure(ch.encode_utf8(&mut [0; 4]), &font)
            }));
        }

        let advance = measurer.measure(&text, &font);
        Self::Line { text, advance }
    }

    /// Individually placed glyphs, empty for a plain line
    pub fn glyphs(&self) -> &[PlacedGlyph] {
        match self {
            Self::Line { .. } => &[],
            Self::Spaced(glyphs) | Self::Curved(glyphs) => glyphs,
        }
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Line { text, .. } => text.is_empty(),
            Self::Spaced(glyphs) | Self::Curved(glyphs) => glyphs.is_empty(),
        }
    }

    /// Total horizontal extent along the baseline, before any curve.
    pub fn advance(&self, letter_spacing: f64) -> f64 {
        match self {
            Self::Line { advance, .. } => *advance,
            Self::Spaced(glyphs) => {
                let sum: f64 = glyphs.iter().map(|g| g.advance).sum();
                sum + letter_spacing * glyphs.len().saturating_sub(1) as f64
            }
            Self::Curved(glyphs) => glyphs.iter().map(|g| g.advance).sum(),
        }
    }
}

fn spaced_glyphs(text: &str, spacing: f64, mut advance: impl FnMut(char) -> f64) -> Vec<PlacedGlyph> {
    let measured: Vec<(char, f64)> = text.chars().map(|ch| (ch, advance(ch))).collect();
    let total: f64 = measured.iter().map(|(_, w)| w).sum::<f64>()
        + spacing * measured.len().saturating_sub(1) as f64;

    let mut x = -total / 2.0;
    measured
        .into_iter()
        .map(|(ch, w)| {
            let glyph = PlacedGlyph {
                ch,
                offset: Vec2::new(x + w / 2.0, 0.0),
                rotation: 0.0,
                advance: w,
            };
            x += w + spacing;
            glyph
        })
        .collect()
}

/// Place glyphs on a circle of radius `font_size * curve.radius`.
///
/// Angles are measured from vertical. The arc consumed by the glyphs spans
/// `angle * spacing` and is centered on `offset`; each glyph takes a share
/// proportional to its advance and sits at the middle of its share. The
/// arc's apex lies on the anchor when `offset` is zero.
fn curved_glyphs(text: &str, layer: &TextLayer, mut advance: impl FnMut(char) -> f64) -> Vec<PlacedGlyph> {
    let measured: Vec<(char, f64)> = text.chars().map(|ch| (ch, advance(ch))).collect();
    let total: f64 = measured.iter().map(|(_, w)| w).sum();
    if measured.is_empty() {
        return Vec::new();
    }

    let radius = layer.font_size * layer.curve.radius;
    let span = layer.curve.angle.to_radians() * layer.curve.spacing;
    let start = layer.curve.offset.to_radians() - span / 2.0;
    let d = layer.curve.direction.sign();
    let count = measured.len() as f64;

    let mut consumed = 0.0;
    measured
        .into_iter()
        .enumerate()
        .map(|(i, (ch, w))| {
            // Zero-width strings fall back to equal shares
            let t = if total > 0.0 {
                (consumed + w / 2.0) / total
            } else {
                (i as f64 + 0.5) / count
            };
            consumed += w;
            let phi = start + span * t;
            PlacedGlyph {
                ch,
                offset: Vec2::new(radius * phi.sin(), d * radius * (1.0 - phi.cos())),
                rotation: d * phi,
                advance: w,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontBook;
    use std::f64::consts::FRAC_PI_6;

    fn layer(text: &str) -> TextLayer {
        let mut layer = TextLayer::new(200.0, 300.0);
        layer.text = text.into();
        layer
    }

    #[test]
    fn plain_line_measures_whole_string() {
        let run = GlyphRun::layout(&layer("HELLO"), &FontBook::new());
        assert_eq!(
            run,
            GlyphRun::Line {
                text: "HELLO".into(),
                advance: 72.0
            }
        );
        assert!(run.glyphs().is_empty());
    }

    #[test]
    fn spaced_glyphs_are_centered_on_anchor() {
        let mut l = layer("AB");
        l.letter_spacing = 10.0;
        let run = GlyphRun::layout(&l, &FontBook::new());
        let glyphs = run.glyphs();
        // Each glyph is 14.4 wide; total = 14.4 * 2 + 10 = 38.8
        assert!((glyphs[0].offset.x - (-19.4 + 7.2)).abs() < 1e-9);
        assert!((glyphs[1].offset.x - (19.4 - 7.2)).abs() < 1e-9);
        assert!((run.advance(10.0) - 38.8).abs() < 1e-9);
    }

    #[test]
    fn curved_glyphs_follow_arc() {
        let mut l = layer("ARC");
        l.effects.curve = true;
        let run = GlyphRun::layout(&l, &FontBook::new());
        let glyphs = run.glyphs();
        assert_eq!(glyphs.len(), 3);
        assert!((glyphs[0].rotation + FRAC_PI_6).abs() < 1e-9);
        assert!(glyphs[1].offset.hypot() < 1e-9);
        assert!((glyphs[2].rotation - FRAC_PI_6).abs() < 1e-9);
        // Radius 48: outer glyphs drop by 48 * (1 - cos 30deg)
        let drop = 48.0 * (1.0 - FRAC_PI_6.cos());
        assert!((glyphs[2].offset.y - drop).abs() < 1e-9);
        assert!((glyphs[2].offset.x - 24.0).abs() < 1e-9);
    }

    #[test]
    fn downward_curve_mirrors_vertically() {
        let mut l = layer("ARC");
        l.effects.curve = true;
        l.curve.direction = crate::model::CurveDirection::Down;
        let run = GlyphRun::layout(&l, &FontBook::new());
        assert!(run.glyphs()[0].offset.y < 0.0);
        assert!(run.glyphs()[2].rotation < 0.0);
    }

    #[test]
    fn letter_spacing_takes_precedence_over_curve() {
        let mut l = layer("ARC");
        l.effects.curve = true;
        l.letter_spacing = 2.0;
        assert!(matches!(GlyphRun::layout(&l, &FontBook::new()), GlyphRun::Spaced(_)));
    }

    #[test]
    fn empty_text_has_no_glyphs() {
        let mut l = layer("");
        l.effects.curve = true;
        let run = GlyphRun::layout(&l, &FontBook::new());
        assert!(run.glyphs().is_empty());
        assert_eq!(run.advance(0.0), 0.0);
    }
}
