// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Text layers in z-order, with bounds refresh and hit testing.

use crate::error::{EditorError, Result};
use crate::model::{LayerId, TextLayer, TextPatch};
use crate::settings;
use crate::text::{TextBounds, TextMeasurer};
use kurbo::{Point, Size};

/// Owns the text layers of a scene
#[derive(Debug, Clone, Default)]
pub struct TextLayerStore {
    layers: Vec<TextLayer>,
}

impl TextLayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &TextLayer> {
        self.layers.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TextLayer> {
        self.layers.iter_mut()
    }

    pub fn get(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut TextLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Append a layer on top, refreshing its cached size and keeping its
    /// anchor within reach of the canvas.
    pub fn add(&mut self, mut layer: TextLayer, canvas: Size, measurer: &dyn TextMeasurer) -> LayerId {
        refresh(&mut layer, measurer);
        let anchor = clamp_anchor(&layer, layer.anchor(), canvas, settings::text::EDGE_MARGIN);
        layer.x = anchor.x;
        layer.y = anchor.y;
        let id = layer.id;
        tracing::debug!("[TextLayerStore::add] {:?} '{}' at ({:.1}, {:.1})", id, layer.text, layer.x, layer.y);
        self.layers.push(layer);
        id
    }

    /// Apply a partial update to a layer.
    pub fn update(&mut self, id: LayerId, patch: &TextPatch, measurer: &dyn TextMeasurer) -> Result<&TextLayer> {
        let layer = self.get_mut(id).ok_or(EditorError::LayerNotFound(id))?;
        layer.apply(patch);
        refresh(layer, measurer);
        Ok(layer)
    }

    /// Remove a layer, returning it.
    pub fn remove(&mut self, id: LayerId) -> Option<TextLayer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Re-derive a layer's bounds and store its size.
    pub fn refresh_bounds(&mut self, id: LayerId, measurer: &dyn TextMeasurer) -> Option<TextBounds> {
        self.get_mut(id).map(|layer| refresh(layer, measurer))
    }

    /// Freshly derived bounds of a layer.
    pub fn bounds(&self, id: LayerId, measurer: &dyn TextMeasurer) -> Option<TextBounds> {
        self.get(id).map(|layer| TextBounds::compute(layer, measurer))
    }

    /// Topmost layer whose padded bounds contain `point`.
    pub fn layer_at_point(&self, point: Point, measurer: &dyn TextMeasurer) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|layer| {
                TextBounds::compute(layer, measurer).contains(point, settings::text::HIT_PADDING)
            })
            .map(|layer| layer.id)
    }

    /// Move a layer's anchor, keeping at least `margin` of its box on the
    /// canvas. `canvas` and `margin` are in the same space as the layer.
    pub fn move_to(
        &mut self,
        id: LayerId,
        anchor: Point,
        canvas: Size,
        margin: f64,
        measurer: &dyn TextMeasurer,
    ) -> Result<Point> {
        let layer = self.get_mut(id).ok_or(EditorError::LayerNotFound(id))?;
        refresh(layer, measurer);
        let clamped = clamp_anchor(layer, anchor, canvas, margin);
        layer.x = clamped.x;
        layer.y = clamped.y;
        Ok(clamped)
    }
}

fn refresh(layer: &mut TextLayer, measurer: &dyn TextMeasurer) -> TextBounds {
    let bounds = TextBounds::compute(layer, measurer);
    layer.width = bounds.width();
    layer.height = bounds.height();
    bounds
}

/// Clamp a center anchor so at least `margin` of the layer's box stays on
/// the canvas.
fn clamp_anchor(layer: &TextLayer, anchor: Point, canvas: Size, margin: f64) -> Point {
    let half_w = layer.width / 2.0;
    let half_h = layer.height / 2.0;
    let clamp = |v: f64, extent: f64, half: f64| {
        let lo = margin - half;
        let hi = extent - margin + half;
        if lo <= hi { v.clamp(lo, hi) } else { extent / 2.0 }
    };
    Point::new(
        clamp(anchor.x, canvas.width, half_w),
        clamp(anchor.y, canvas.height, half_h),
    )
}
