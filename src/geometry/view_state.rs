// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Zoom, pan and bottle-view scale for one open editor.
//!
//! Zoom is applied about the center of the displayed canvas, and `pan` is
//! an offset in display units on top of that. Panning is only meaningful
//! when zoomed in: the reachable range on each axis is half of the overflow,
//! `display * (zoom - 1) / 2`, and collapses to zero at or below 1:1.

use crate::config::ZoomConfig;
use kurbo::{Point, Size, Vec2};

/// Ephemeral per-editor view state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Current zoom level
    pub zoom: f64,
    /// Pan offset in display units
    pub pan: Vec2,
    /// Scale applied to layer geometry while the bottle view is active
    pub bottle_scale: Option<f64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            bottle_scale: None,
        }
    }
}

impl ViewState {
    /// True while the bottle preview is active
    pub fn is_bottle(&self) -> bool {
        self.bottle_scale.is_some()
    }

    /// Factor between flat design space and live layer geometry
    pub fn layer_scale(&self) -> f64 {
        self.bottle_scale.unwrap_or(1.0)
    }

    /// True when zoomed in past 1:1
    pub fn is_zoomed_in(&self) -> bool {
        self.zoom > 1.0
    }

    // ========================================================================
    // PAN
    // ========================================================================

    /// Largest pan offset reachable on each axis at the current zoom.
    pub fn max_pan(&self, display: Size) -> Vec2 {
        let overflow = (self.zoom - 1.0).max(0.0) * 0.5;
        Vec2::new(display.width * overflow, display.height * overflow)
    }

    /// Clamp the pan offset to the reachable range.
    pub fn clamp_pan(&mut self, display: Size) {
        let max = self.max_pan(display);
        self.pan = Vec2::new(
            self.pan.x.clamp(-max.x, max.x),
            self.pan.y.clamp(-max.y, max.y),
        );
    }

    /// Move the pan offset by `delta` display units, clamped.
    pub fn pan_by(&mut self, delta: Vec2, display: Size) {
        self.pan += delta;
        self.clamp_pan(display);
    }

    // ========================================================================
    // ZOOM
    // ========================================================================

    /// Zoom to `level`, keeping `focus` (display units, relative to the
    /// canvas origin) stationary on screen. Without a focus the canvas
    /// center stays put. Returns true if the zoom changed.
    pub fn zoom_to_level(
        &mut self,
        level: f64,
        focus: Option<Point>,
        display: Size,
        limits: &ZoomConfig,
    ) -> bool {
        let level = level.clamp(limits.min, limits.max);
        let previous = self.zoom;
        let ratio = level / previous;
        let center = Point::new(display.width / 2.0, display.height / 2.0);
        let rel = focus.map(|f| f - center).unwrap_or(Vec2::ZERO);

        self.pan = self.pan * ratio - rel * (ratio - 1.0);
        self.zoom = level;
        self.clamp_pan(display);

        tracing::debug!(
            "[zoom_to_level] {:.2} -> {:.2}, pan=({:.1}, {:.1})",
            previous,
            level,
            self.pan.x,
            self.pan.y
        );
        (level - previous).abs() > f64::EPSILON
    }

    /// Step zoom in by the configured factor.
    pub fn zoom_in(&mut self, display: Size, limits: &ZoomConfig) -> bool {
        let next = (self.zoom * limits.factor).min(limits.max);
        if (next - self.zoom).abs() <= f64::EPSILON {
            return false;
        }
        self.zoom_to_level(next, None, display, limits)
    }

    /// Step zoom out by the configured factor. At the floor while still
    /// magnified, fall back to fit.
    pub fn zoom_out(&mut self, display: Size, limits: &ZoomConfig) -> bool {
        let next = (self.zoom / limits.factor).max(limits.min);
        if (next - self.zoom).abs() > f64::EPSILON {
            self.zoom_to_level(next, None, display, limits)
        } else if self.zoom > 1.0 {
            self.zoom_to_fit()
        } else {
            false
        }
    }

    /// Reset to 1:1 with no pan.
    pub fn zoom_to_fit(&mut self) -> bool {
        let changed = self.zoom != 1.0 || self.pan != Vec2::ZERO;
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
        changed
    }

    /// Flip between 1:1 and the toggle level.
    pub fn toggle_zoom(&mut self, display: Size, limits: &ZoomConfig) -> bool {
        if (self.zoom - 1.0).abs() <= f64::EPSILON {
            self.zoom_to_level(limits.toggle_level, None, display, limits)
        } else {
            self.zoom_to_fit()
        }
    }

    /// Apply one wheel notch about the pointer. Negative `delta_y` (wheel
    /// away from the user) zooms in.
    pub fn wheel_zoom(
        &mut self,
        delta_y: f64,
        focus: Point,
        display: Size,
        limits: &ZoomConfig,
    ) -> bool {
        let step = if delta_y < 0.0 {
            limits.wheel_step
        } else {
            -limits.wheel_step
        };
        self.zoom_to_level(self.zoom + step, Some(focus), display, limits)
    }
}
