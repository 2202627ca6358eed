// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Mapping between pointer positions and logical design coordinates.
//!
//! A pointer position goes through four stages on its way into the scene:
//!
//! 1. subtract the canvas element's origin (viewport px → element px)
//! 2. correct for any mismatch between the backing store and the element's
//!    displayed size at the current DPR
//! 3. undo zoom and pan (zoom is about the display center)
//! 4. undo the bottle scale, when the bottle view is active
//!
//! The composite is kept as a single `Affine` so the inverse is exact, and
//! the forward result is clamped to the logical canvas.

use super::ViewState;
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Where and how large the host's drawing surface is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    /// The canvas element's bounding rectangle in viewport pixels
    pub element_rect: Rect,
    /// Pixel size of the backing store
    pub backing_size: Size,
    /// Device pixel ratio
    pub dpr: f64,
}

impl SurfaceLayout {
    /// Layout for a surface shown at exactly `display` units with the
    /// given DPR, placed at `origin` in the viewport.
    pub fn for_display(origin: Point, display: Size, dpr: f64) -> Self {
        Self {
            element_rect: Rect::from_origin_size(origin, display),
            backing_size: Size::new(display.width * dpr, display.height * dpr),
            dpr,
        }
    }

    /// Displayed size in CSS units implied by the backing store
    pub fn display_size(&self) -> Size {
        let dpr = self.dpr.max(f64::EPSILON);
        Size::new(self.backing_size.width / dpr, self.backing_size.height / dpr)
    }

    /// Per-axis factor from element pixels to display units.
    fn resolution_ratio(&self) -> Vec2 {
        let display = self.display_size();
        let ratio = |display: f64, element: f64| {
            if element > 0.0 { display / element } else { 1.0 }
        };
        Vec2::new(
            ratio(display.width, self.element_rect.width()),
            ratio(display.height, self.element_rect.height()),
        )
    }
}

/// Pure pointer ↔ logical coordinate conversion for one frame of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryTransform {
    layout: SurfaceLayout,
    zoom: f64,
    pan: Vec2,
    bottle_scale: Option<f64>,
    logical_size: Size,
}

impl GeometryTransform {
    pub fn new(layout: SurfaceLayout, view: &ViewState, logical_size: Size) -> Self {
        Self {
            layout,
            zoom: view.zoom,
            pan: view.pan,
            bottle_scale: view.bottle_scale,
            logical_size,
        }
    }

    /// Logical canvas bounds the forward mapping clamps to
    pub fn logical_bounds(&self) -> Rect {
        self.logical_size.to_rect()
    }

    /// The transform from logical coordinates to viewport pixels.
    pub fn logical_to_client(&self) -> Affine {
        let ratio = self.layout.resolution_ratio();
        let display = self.layout.display_size();
        let center = Vec2::new(display.width / 2.0, display.height / 2.0);

        Affine::translate(self.layout.element_rect.origin().to_vec2())
            * Affine::scale_non_uniform(1.0 / ratio.x, 1.0 / ratio.y)
            * Affine::translate(center + self.pan)
            * Affine::scale(self.zoom)
            * Affine::translate(-center)
            * Affine::scale(self.bottle_scale.unwrap_or(1.0))
    }

    /// Map a viewport pointer position into logical coordinates, clamped to
    /// the canvas.
    pub fn to_logical(&self, client: Point) -> Point {
        let p = self.to_logical_unclamped(client);
        let b = self.logical_bounds();
        Point::new(p.x.clamp(b.x0, b.x1), p.y.clamp(b.y0, b.y1))
    }

    /// Map a viewport pointer position without clamping.
    pub fn to_logical_unclamped(&self, client: Point) -> Point {
        self.logical_to_client().inverse() * client
    }

    /// Map a logical coordinate back to a viewport position.
    pub fn to_client(&self, logical: Point) -> Point {
        self.logical_to_client() * logical
    }

    /// Map a viewport pointer position into the space layer geometry is
    /// stored in. In the bottle view, live geometry is scaled, so the
    /// logical point is scaled back up to match.
    pub fn to_layer_space(&self, client: Point) -> Point {
        let p = self.to_logical(client);
        let s = self.bottle_scale.unwrap_or(1.0);
        Point::new(p.x * s, p.y * s)
    }

    /// Convert a pointer delta in viewport pixels to display units, for
    /// panning.
    pub fn client_delta_to_display(&self, delta: Vec2) -> Vec2 {
        let ratio = self.layout.resolution_ratio();
        Vec2::new(delta.x * ratio.x, delta.y * ratio.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(400.0, 600.0);

    fn view(zoom: f64, pan: Vec2, bottle_scale: Option<f64>) -> ViewState {
        ViewState {
            zoom,
            pan,
            bottle_scale,
        }
    }

    #[test]
    fn identity_at_one_to_one() {
        let layout = SurfaceLayout::for_display(Point::new(30.0, 50.0), CANVAS, 2.0);
        let t = GeometryTransform::new(layout, &ViewState::default(), CANVAS);
        let p = t.to_logical(Point::new(130.0, 250.0));
        assert!((p - Point::new(100.0, 200.0)).hypot() < 1e-9);
    }

    #[test]
    fn stretched_element_uses_backing_ratio() {
        // Element shown at half its backing size in both axes.
        let layout = SurfaceLayout {
            element_rect: Rect::new(0.0, 0.0, 200.0, 300.0),
            backing_size: Size::new(400.0, 600.0),
            dpr: 1.0,
        };
        let t = GeometryTransform::new(layout, &ViewState::default(), CANVAS);
        let p = t.to_logical(Point::new(100.0, 150.0));
        assert!((p - Point::new(200.0, 300.0)).hypot() < 1e-9);
    }

    #[test]
    fn forward_inverse_round_trip() {
        let layout = SurfaceLayout::for_display(Point::new(12.0, 80.0), CANVAS, 1.5);
        for zoom in [0.5, 0.75, 1.0, 1.5, 2.25, 3.0] {
            let mut v = view(zoom, Vec2::ZERO, None);
            for pan in [Vec2::new(-1e4, 1e4), Vec2::new(35.0, -12.0), Vec2::ZERO] {
                v.pan = pan;
                v.clamp_pan(CANVAS);
                let t = GeometryTransform::new(layout, &v, CANVAS);
                for p in [
                    Point::new(0.0, 0.0),
                    Point::new(123.4, 456.7),
                    Point::new(400.0, 600.0),
                ] {
                    let back = t.to_logical(t.to_client(p));
                    assert!((back - p).hypot() < 1e-9, "zoom={zoom} pan={pan:?} p={p:?}");
                }
            }
        }
    }

    #[test]
    fn bottle_view_divides_by_scale() {
        let scale = 0.25;
        let display = Size::new(CANVAS.width * scale, CANVAS.height * scale);
        let layout = SurfaceLayout::for_display(Point::ZERO, display, 1.0);
        let t = GeometryTransform::new(layout, &view(1.0, Vec2::ZERO, Some(scale)), CANVAS);

        let p = t.to_logical(Point::new(50.0, 75.0));
        assert!((p - Point::new(200.0, 300.0)).hypot() < 1e-9);
        // Bounds are the unscaled logical size, not the displayed size
        assert_eq!(t.logical_bounds(), CANVAS.to_rect());
        let layer = t.to_layer_space(Point::new(50.0, 75.0));
        assert!((layer - Point::new(50.0, 75.0)).hypot() < 1e-9);
    }

    #[test]
    fn zoomed_pointer_maps_about_center() {
        let layout = SurfaceLayout::for_display(Point::ZERO, CANVAS, 1.0);
        let t = GeometryTransform::new(layout, &view(2.0, Vec2::ZERO, None), CANVAS);
        // The display center is a fixed point of a centered zoom
        let c = t.to_logical(Point::new(200.0, 300.0));
        assert!((c - Point::new(200.0, 300.0)).hypot() < 1e-9);
        let p = t.to_logical(Point::new(300.0, 300.0));
        assert!((p - Point::new(250.0, 300.0)).hypot() < 1e-9);
    }

    #[test]
    fn forward_result_is_clamped() {
        let layout = SurfaceLayout::for_display(Point::new(10.0, 10.0), CANVAS, 1.0);
        let t = GeometryTransform::new(layout, &ViewState::default(), CANVAS);
        assert_eq!(t.to_logical(Point::new(-50.0, 900.0)), Point::new(0.0, 600.0));
    }
}
