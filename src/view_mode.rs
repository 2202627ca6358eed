// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Flat design view and bottle preview view.
//!
//! Entering the bottle view captures every layer's flat-space geometry in
//! a snapshot and then shows the layers scaled down to the label footprint.
//! The snapshot stays the source of truth while the bottle view is active:
//!
//! - finishing a drag or resize writes the edited layer back into it,
//!   divided by the current scale
//! - a layout change rescales the live geometry only
//! - leaving restores live geometry from it verbatim, so repeated view
//!   switches never accumulate rounding error

use crate::config::{BottleConfig, EditorConfig};
use crate::model::{LayerId, LayerRef, Scene, TextPatch};
use crate::text::TextMeasurer;
use kurbo::{Rect, Size};
use std::collections::HashMap;

// ===== Layout =====

/// Host layout inputs that decide the label footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProfile {
    /// Viewport width in CSS pixels
    pub viewport_width: f64,
    /// Active customization step
    pub step: u32,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            viewport_width: f64::INFINITY,
            step: 1,
        }
    }
}

/// The two view modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Flat,
    Bottle,
}

// ===== Snapshot =====

/// Flat-space geometry of a text layer
#[derive(Debug, Clone, Copy, PartialEq)]
struct TextGeometry {
    x: f64,
    y: f64,
    font_size: f64,
    letter_spacing: f64,
}

/// Flat-space geometry of every layer, captured on entering the bottle view
#[derive(Debug, Clone, Default)]
struct GeometrySnapshot {
    images: HashMap<LayerId, Rect>,
    texts: HashMap<LayerId, TextGeometry>,
}

impl GeometrySnapshot {
    fn capture(scene: &Scene) -> Self {
        let mut snapshot = Self::default();
        for layer in scene.images.iter() {
            snapshot.images.insert(layer.id, layer.bounds());
        }
        for layer in scene.texts.iter() {
            snapshot.texts.insert(
                layer.id,
                TextGeometry {
                    x: layer.x,
                    y: layer.y,
                    font_size: layer.font_size,
                    letter_spacing: layer.letter_spacing,
                },
            );
        }
        snapshot
    }

    /// Write `layer`'s live geometry, divided by `scale`, into the snapshot.
    fn record(&mut self, scene: &Scene, layer: LayerRef, scale: f64) {
        match layer {
            LayerRef::Image(id) => {
                if let Some(image) = scene.images.get(id) {
                    self.images.insert(id, scale_rect(image.bounds(), 1.0 / scale));
                }
            }
            LayerRef::Text(id) => {
                if let Some(text) = scene.texts.get(id) {
                    self.texts.insert(
                        id,
                        TextGeometry {
                            x: text.x / scale,
                            y: text.y / scale,
                            font_size: text.font_size / scale,
                            letter_spacing: text.letter_spacing / scale,
                        },
                    );
                }
            }
        }
    }

    /// Set every live layer to its snapshot geometry times `scale`.
    fn apply(&self, scene: &mut Scene, scale: f64) {
        for layer in scene.images.iter_mut() {
            if let Some(rect) = self.images.get(&layer.id) {
                layer.set_bounds(scale_rect(*rect, scale));
            }
        }
        for layer in scene.texts.iter_mut() {
            if let Some(g) = self.texts.get(&layer.id) {
                layer.x = g.x * scale;
                layer.y = g.y * scale;
                layer.font_size = g.font_size * scale;
                layer.letter_spacing = g.letter_spacing * scale;
            }
        }
    }
}

// ===== Controller =====

/// Switches between the flat and bottle views and keeps the snapshot
#[derive(Debug, Clone)]
pub struct ViewModeController {
    config: BottleConfig,
    base: Size,
    layout: LayoutProfile,
    /// Present exactly while the bottle view is active
    snapshot: Option<GeometrySnapshot>,
}

impl ViewModeController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            config: config.bottle,
            base: config.bottle_base(),
            layout: LayoutProfile::default(),
            snapshot: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        if self.snapshot.is_some() {
            ViewMode::Bottle
        } else {
            ViewMode::Flat
        }
    }

    pub fn is_bottle(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn layout(&self) -> LayoutProfile {
        self.layout
    }

    /// On-screen size of the label for the current layout
    pub fn label_footprint(&self) -> Size {
        let compact = self.layout.viewport_width <= self.config.compact_breakpoint
            && self.layout.step == self.config.compact_step;
        if compact {
            self.config.compact_label.size()
        } else {
            self.config.desktop_label.size()
        }
    }

    /// Uniform scale from the base canvas to the label footprint
    pub fn bottle_scale(&self) -> f64 {
        let label = self.label_footprint();
        (label.width / self.base.width).min(label.height / self.base.height)
    }

    /// Switch to the bottle view. Returns false if it was already active;
    /// the snapshot is never recaptured while in the bottle view.
    pub fn enter_bottle(&mut self, scene: &mut Scene) -> bool {
        if self.is_bottle() {
            tracing::warn!("[ViewModeController::enter_bottle] already in bottle view");
            return false;
        }
        let snapshot = GeometrySnapshot::capture(scene);
        let scale = self.bottle_scale();
        scene.view.zoom_to_fit();
        scene.view.bottle_scale = Some(scale);
        snapshot.apply(scene, scale);
        tracing::info!(
            "Entered bottle view at scale {:.4} ({} images, {} texts)",
            scale,
            snapshot.images.len(),
            snapshot.texts.len()
        );
        self.snapshot = Some(snapshot);
        true
    }

    /// Return to the flat view, restoring every layer from the snapshot.
    /// Returns false if the flat view was already active.
    pub fn exit_bottle(&mut self, scene: &mut Scene, measurer: &dyn TextMeasurer) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        snapshot.apply(scene, 1.0);
        scene.view.bottle_scale = None;
        let ids: Vec<LayerId> = scene.texts.iter().map(|t| t.id).collect();
        for id in ids {
            scene.texts.refresh_bounds(id, measurer);
        }
        tracing::info!("Returned to flat view");
        true
    }

    /// Write a finished edit back into the snapshot. No-op in the flat view.
    pub fn commit_layer(&mut self, scene: &Scene, layer: LayerRef) {
        let scale = scene.view.layer_scale();
        if let Some(snapshot) = &mut self.snapshot {
            snapshot.record(scene, layer, scale);
            tracing::debug!("[ViewModeController::commit_layer] {:?} at scale {:.4}", layer, scale);
        }
    }

    /// Track a layer created with flat-space geometry. In the bottle view
    /// the geometry goes into the snapshot as is and the live layer is
    /// scaled for display.
    pub fn record_added_layer(&mut self, scene: &mut Scene, layer: LayerRef) {
        let Some(snapshot) = &mut self.snapshot else {
            return;
        };
        snapshot.record(scene, layer, 1.0);
        let scale = scene.view.layer_scale();
        match layer {
            LayerRef::Image(id) => {
                if let Some(image) = scene.images.get_mut(id) {
                    image.scale_geometry(scale);
                }
            }
            LayerRef::Text(id) => {
                if let Some(text) = scene.texts.get_mut(id) {
                    text.scale_geometry(scale);
                }
            }
        }
    }

    /// Drop a removed layer from the snapshot.
    pub fn forget_layer(&mut self, id: LayerId) {
        if let Some(snapshot) = &mut self.snapshot {
            snapshot.images.remove(&id);
            snapshot.texts.remove(&id);
        }
    }

    /// Translate a host patch, whose geometry is always in flat space, for
    /// the live layer. In the bottle view the flat values are written to
    /// the snapshot and the returned patch carries them scaled.
    pub fn live_text_patch(&mut self, id: LayerId, patch: &TextPatch) -> TextPatch {
        let scale = self.bottle_scale();
        let Some(snapshot) = &mut self.snapshot else {
            return patch.clone();
        };
        if !patch.has_geometry() {
            return patch.clone();
        }
        if let Some(g) = snapshot.texts.get_mut(&id) {
            if let Some(x) = patch.x {
                g.x = x;
            }
            if let Some(y) = patch.y {
                g.y = y;
            }
            if let Some(size) = patch.font_size {
                g.font_size = size;
            }
            if let Some(spacing) = patch.letter_spacing {
                g.letter_spacing = spacing;
            }
        }
        TextPatch {
            x: patch.x.map(|v| v * scale),
            y: patch.y.map(|v| v * scale),
            font_size: patch.font_size.map(|v| v * scale),
            letter_spacing: patch.letter_spacing.map(|v| v * scale),
            ..patch.clone()
        }
    }

    /// Record a new layout. In the bottle view a changed scale rescales the
    /// live geometry by new/old; the snapshot is left alone. Returns true
    /// if the live geometry changed.
    pub fn set_layout(&mut self, layout: LayoutProfile, scene: &mut Scene) -> bool {
        self.layout = layout;
        if !self.is_bottle() {
            return false;
        }
        let old = scene.view.layer_scale();
        let new = self.bottle_scale();
        if (new - old).abs() <= f64::EPSILON {
            return false;
        }
        scene.scale_layers(new / old);
        scene.view.bottle_scale = Some(new);
        tracing::info!("Bottle label resized, scale {:.4} -> {:.4}", old, new);
        true
    }
}

fn scale_rect(rect: Rect, scale: f64) -> Rect {
    Rect::new(rect.x0 * scale, rect.y0 * scale, rect.x1 * scale, rect.y1 * scale)
}
