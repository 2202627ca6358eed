// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Bounding regions of text layers, for hit testing and selection chrome.
//!
//! Plain and letter-spaced text produce a rectangle centered on the anchor
//! that rotates with the layer. Curved text produces the axis-aligned box
//! around every glyph's four rotated corners; containment against it is a
//! plain rectangle test, not an arc-shaped one.

use super::{GlyphRun, TextMeasurer};
use crate::model::TextLayer;
use crate::settings;
use kurbo::{Affine, Point, Rect, Vec2};

/// Derived bounds of a text layer, in canvas space
#[derive(Debug, Clone, PartialEq)]
pub enum TextBounds {
    Rect {
        center: Point,
        width: f64,
        height: f64,
        /// Layer rotation in radians
        rotation: f64,
    },
    Curve {
        /// Sampled glyph corners
        points: Vec<Point>,
        center: Point,
        width: f64,
        height: f64,
    },
}

impl TextBounds {
    /// Derive bounds from the layer's current properties.
    pub fn compute(layer: &TextLayer, measurer: &dyn TextMeasurer) -> Self {
        let run = GlyphRun::layout(layer, measurer);
        Self::from_run(layer, &run)
    }

    /// Derive bounds from an existing layout of `layer`.
    pub fn from_run(layer: &TextLayer, run: &GlyphRun) -> Self {
        let pad = settings::text::EFFECT_PADDING * f64::from(layer.effects.padding_effects());
        let rotation = layer.rotation.to_radians();

        match run {
            GlyphRun::Curved(glyphs) if !glyphs.is_empty() => {
                let to_canvas = Affine::translate(layer.anchor().to_vec2()) * Affine::rotate(rotation);
                let half_h = layer.font_size / 2.0;
                let points: Vec<Point> = glyphs
                    .iter()
                    .flat_map(|g| {
                        let glyph = to_canvas
                            * Affine::translate(g.offset)
                            * Affine::rotate(g.rotation);
                        let half_w = g.advance / 2.0;
                        [
                            glyph * Point::new(-half_w, -half_h),
                            glyph * Point::new(half_w, -half_h),
                            glyph * Point::new(-half_w, half_h),
                            glyph * Point::new(half_w, half_h),
                        ]
                    })
                    .collect();

                let aabb = points
                    .iter()
                    .skip(1)
                    .fold(Rect::from_points(points[0], points[0]), |r, p| {
                        r.union_pt(*p)
                    });
                Self::Curve {
                    center: aabb.center(),
                    width: aabb.width() + pad,
                    height: aabb.height() + pad,
                    points,
                }
            }
            _ if run.is_empty() => Self::Rect {
                center: layer.anchor(),
                width: pad,
                height: pad,
                rotation,
            },
            _ => Self::Rect {
                center: layer.anchor(),
                width: run.advance(layer.letter_spacing) + pad,
                height: layer.font_size + pad,
                rotation,
            },
        }
    }

    pub fn center(&self) -> Point {
        match self {
            Self::Rect { center, .. } | Self::Curve { center, .. } => *center,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            Self::Rect { width, .. } | Self::Curve { width, .. } => *width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Self::Rect { height, .. } | Self::Curve { height, .. } => *height,
        }
    }

    /// Rotation of the box in radians (curve bounds are axis-aligned)
    pub fn rotation(&self) -> f64 {
        match self {
            Self::Rect { rotation, .. } => *rotation,
            Self::Curve { .. } => 0.0,
        }
    }

    /// Unrotated box around the center, grown by `padding` on every side.
    pub fn local_rect(&self, padding: f64) -> Rect {
        let half = Vec2::new(self.width() / 2.0 + padding, self.height() / 2.0 + padding);
        let c = self.center();
        Rect::from_points(c - half, c + half)
    }

    /// The four corners of the padded box in canvas space
    /// (order: TL, TR, BR, BL).
    pub fn corners(&self, padding: f64) -> [Point; 4] {
        let r = self.local_rect(padding);
        let c = self.center();
        let rot = Affine::rotate_about(self.rotation(), c);
        [
            rot * Point::new(r.x0, r.y0),
            rot * Point::new(r.x1, r.y0),
            rot * Point::new(r.x1, r.y1),
            rot * Point::new(r.x0, r.y1),
        ]
    }

    /// Whether `point` lies inside the bounds grown by `padding`.
    pub fn contains(&self, point: Point, padding: f64) -> bool {
        let local = match self {
            Self::Rect { center, rotation, .. } => {
                Affine::rotate_about(-rotation, *center) * point
            }
            Self::Curve { .. } => point,
        };
        let r = self.local_rect(padding);
        local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontBook;

    fn layer(text: &str) -> TextLayer {
        let mut layer = TextLayer::new(200.0, 300.0);
        layer.text = text.into();
        layer
    }

    #[test]
    fn plain_bounds_from_measured_width() {
        let b = TextBounds::compute(&layer("HELLO"), &FontBook::new());
        assert_eq!(b.center(), Point::new(200.0, 300.0));
        assert!((b.width() - 72.0).abs() < 1e-9);
        assert_eq!(b.height(), 24.0);
    }

    #[test]
    fn each_effect_adds_padding() {
        let mut l = layer("HELLO");
        l.effects.shadow = true;
        let b = TextBounds::compute(&l, &FontBook::new());
        assert!((b.width() - 76.0).abs() < 1e-9);
        l.effects.outline = true;
        let b = TextBounds::compute(&l, &FontBook::new());
        assert!((b.width() - 80.0).abs() < 1e-9);
        assert_eq!(b.height(), 32.0);
    }

    #[test]
    fn spaced_bounds_include_spacing() {
        let mut l = layer("ABC");
        l.letter_spacing = 5.0;
        let b = TextBounds::compute(&l, &FontBook::new());
        assert!((b.width() - (3.0 * 14.4 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn curved_text_is_taller_than_font_size() {
        let mut l = layer("ARC");
        l.effects.curve = true;
        l.curve.angle = 90.0;
        l.curve.radius = 2.0;
        l.font_size = 24.0;
        let b = TextBounds::compute(&l, &FontBook::new());
        assert!(matches!(b, TextBounds::Curve { .. }));
        assert!(b.height() > 24.0, "height {}", b.height());
        if let TextBounds::Curve { points, .. } = &b {
            assert_eq!(points.len(), 12);
        }
    }

    #[test]
    fn rotated_containment_uses_local_frame() {
        let mut l = layer("HELLO");
        l.rotation = 90.0;
        let b = TextBounds::compute(&l, &FontBook::new());
        // Rotated a quarter turn the 72x24 box stands upright
        assert!(b.contains(Point::new(200.0, 300.0 + 30.0), 0.0));
        assert!(!b.contains(Point::new(200.0 + 30.0, 300.0), 0.0));
        assert!(b.contains(Point::new(200.0 + 15.0, 300.0), 8.0));
    }

    #[test]
    fn empty_text_has_zero_size_bounds() {
        let b = TextBounds::compute(&layer(""), &FontBook::new());
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
        let mut l = layer("");
        l.effects.curve = true;
        let b = TextBounds::compute(&l, &FontBook::new());
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
        assert!(b.contains(Point::new(200.0, 300.0), 0.0));
    }

    #[test]
    fn corners_rotate_about_center() {
        let mut l = layer("HELLO");
        l.rotation = 180.0;
        let b = TextBounds::compute(&l, &FontBook::new());
        let c = b.corners(0.0);
        assert!((c[0] - Point::new(236.0, 312.0)).hypot() < 1e-9);
    }
}
