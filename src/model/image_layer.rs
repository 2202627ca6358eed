// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Image layers placed on the design canvas.
//!
//! Image layers are axis-aligned rectangles in canvas space (y grows
//! downward). The decoded pixels are shared and never touched here; only
//! the placement rectangle changes under drag and resize.

use super::{ImageAsset, LayerId, SourceId};
use crate::settings;
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

// ============================================================================
// RESIZE HANDLE
// ============================================================================

/// Which corner handle the user is dragging for resize.
///
/// Each corner moves the two edges that meet at it; the opposite corner
/// stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// All handles in hit-test priority order
    pub const ALL: [ResizeHandle; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// True if dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// True if dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// Bounds applied to every resize step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    /// Width and height floor
    pub min_size: f64,
    /// Canvas extent the rect must stay inside
    pub bounds: Size,
}

// ============================================================================
// IMAGE LAYER
// ============================================================================

/// A user-placed raster image.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub id: LayerId,
    /// Shared decoded pixels
    pub asset: Arc<ImageAsset>,
    /// Uploaded image this layer was placed from, if any
    pub source: Option<SourceId>,
    /// Top-left corner
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageLayer {
    pub fn new(asset: Arc<ImageAsset>, source: Option<SourceId>, rect: Rect) -> Self {
        Self {
            id: LayerId::next(),
            asset,
            source,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Return the layer rectangle in canvas space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }

    /// Replace the layer rectangle.
    pub fn set_bounds(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Hit-test a canvas point against the layer rectangle.
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    // ====================================================================
    // HANDLE POSITIONS
    // ====================================================================

    /// Return the four corner positions (order: TL, TR, BL, BR).
    pub fn corner_positions(&self) -> [Point; 4] {
        let b = self.bounds();
        [
            Point::new(b.x0, b.y0),
            Point::new(b.x1, b.y0),
            Point::new(b.x0, b.y1),
            Point::new(b.x1, b.y1),
        ]
    }

    /// Square drawn for a handle, centered on its corner.
    pub fn handle_rect(&self, handle: ResizeHandle) -> Rect {
        let corners = self.corner_positions();
        let center = match handle {
            ResizeHandle::TopLeft => corners[0],
            ResizeHandle::TopRight => corners[1],
            ResizeHandle::BottomLeft => corners[2],
            ResizeHandle::BottomRight => corners[3],
        };
        let half = settings::image::HANDLE_SIZE / 2.0;
        Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
    }

    /// Delete affordance square, inset from the top-right corner.
    pub fn delete_icon_rect(&self) -> Rect {
        use settings::image::delete_icon::{PADDING, SIZE};
        let b = self.bounds();
        Rect::from_origin_size((b.x1 - SIZE - PADDING, b.y0 + PADDING), (SIZE, SIZE))
    }

    // ====================================================================
    // HIT TESTING
    // ====================================================================

    /// Hit-test against the corner handles, grown by `tolerance` on each
    /// side. Earlier handles win where regions overlap on small images.
    pub fn hit_test_handle(&self, point: Point, tolerance: f64) -> Option<ResizeHandle> {
        ResizeHandle::ALL.into_iter().find(|&handle| {
            let r = self.handle_rect(handle).inflate(tolerance, tolerance);
            point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
        })
    }

    /// Hit-test the delete affordance, including its slop area.
    pub fn hit_test_delete_icon(&self, point: Point) -> bool {
        let slop = settings::image::delete_icon::HIT_SLOP;
        let r = self.delete_icon_rect().inflate(slop, slop);
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }

    /// Return the corner that stays fixed when dragging a given handle.
    pub fn anchor_for(&self, handle: ResizeHandle) -> Point {
        let b = self.bounds();
        match handle {
            ResizeHandle::TopLeft => Point::new(b.x1, b.y1),
            ResizeHandle::TopRight => Point::new(b.x0, b.y1),
            ResizeHandle::BottomLeft => Point::new(b.x1, b.y0),
            ResizeHandle::BottomRight => Point::new(b.x0, b.y0),
        }
    }

    /// Scale position and size uniformly about the canvas origin.
    pub fn scale_geometry(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
        self.width *= factor;
        self.height *= factor;
    }
}

// ============================================================================
// RESIZE
// ============================================================================

/// Compute the rectangle produced by dragging `handle` by `delta` from the
/// rectangle the gesture started with.
///
/// Steps run in a fixed order: move the two edges owned by the handle,
/// restore the starting aspect ratio (when `keep_aspect`), apply the size
/// floor, clamp to the canvas, then apply the floor once more. The far
/// edges never move, so the rect cannot flip through zero size.
pub fn resize_rect(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    keep_aspect: bool,
    limits: ResizeLimits,
) -> Rect {
    let min = limits.min_size;
    let mut x = start.x0;
    let mut y = start.y0;
    let mut w = start.width();
    let mut h = start.height();

    if handle.moves_left() {
        x += delta.x;
        w -= delta.x;
    } else {
        w += delta.x;
    }
    if handle.moves_top() {
        y += delta.y;
        h -= delta.y;
    } else {
        h += delta.y;
    }

    if keep_aspect && start.height() > 0.0 && start.width() > 0.0 {
        let aspect = start.width() / start.height();
        let width_change = (w - start.width()).abs();
        let height_change = (h - start.height()).abs();
        if width_change > height_change {
            h = w / aspect;
        } else {
            w = h * aspect;
        }
        if handle.moves_left() {
            x = start.x1 - w;
        }
        if handle.moves_top() {
            y = start.y1 - h;
        }
    }

    let pin_floor = |x: &mut f64, y: &mut f64, w: &mut f64, h: &mut f64| {
        if *w < min {
            *w = min;
            if handle.moves_left() {
                *x = start.x1 - min;
            }
        }
        if *h < min {
            *h = min;
            if handle.moves_top() {
                *y = start.y1 - min;
            }
        }
    };

    pin_floor(&mut x, &mut y, &mut w, &mut h);

    if x < 0.0 {
        w += x;
        x = 0.0;
    }
    if y < 0.0 {
        h += y;
        y = 0.0;
    }
    if x + w > limits.bounds.width {
        w = limits.bounds.width - x;
    }
    if y + h > limits.bounds.height {
        h = limits.bounds.height - y;
    }

    pin_floor(&mut x, &mut y, &mut w, &mut h);

    Rect::from_origin_size((x, y), (w, h))
}
