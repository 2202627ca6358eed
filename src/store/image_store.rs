// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Placed image layers in z-order.

use crate::config::ImageConfig;
use crate::error::{EditorError, Result};
use crate::model::{
    ImageAsset, ImageLayer, LayerId, ResizeHandle, ResizeLimits, SourceId, resize_rect,
};
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

/// Owns the image layers of a scene
#[derive(Debug, Clone, Default)]
pub struct ImageLayerStore {
    layers: Vec<ImageLayer>,
}

impl ImageLayerStore {
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
    pub fn iter(&self) -> impl Iterator<Item = &ImageLayer> {
        self.layers.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ImageLayer> {
        self.layers.iter_mut()
    }

    pub fn get(&self, id: LayerId) -> Option<&ImageLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut ImageLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Position of a layer in z-order
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Default placement for a freshly added image: the natural size
    /// scaled down so the longer side fits `max_initial_size`, centered
    /// on the canvas.
    pub fn default_placement(asset: &ImageAsset, canvas: Size, config: &ImageConfig) -> Rect {
        let natural = asset.natural_size();
        let longest = natural.width.max(natural.height);
        let scale = if longest > config.max_initial_size {
            config.max_initial_size / longest
        } else {
            1.0
        };
        let w = (natural.width * scale).max(config.min_size);
        let h = (natural.height * scale).max(config.min_size);
        Rect::from_origin_size(
            ((canvas.width - w) / 2.0, (canvas.height - h) / 2.0),
            (w, h),
        )
    }

    /// Append a layer on top.
    pub fn add(&mut self, asset: Arc<ImageAsset>, source: Option<SourceId>, rect: Rect) -> LayerId {
        let layer = ImageLayer::new(asset, source, rect);
        let id = layer.id;
        tracing::debug!(
            "[ImageLayerStore::add] {:?} at ({:.1}, {:.1}) {:.1}x{:.1}",
            id,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        );
        self.layers.push(layer);
        id
    }

    /// Remove a layer, returning its former index and the layer.
    pub fn remove(&mut self, id: LayerId) -> Option<(usize, ImageLayer)> {
        let index = self.index_of(id)?;
        Some((index, self.layers.remove(index)))
    }

    /// Remove every layer placed from `source`, returning their ids.
    pub fn remove_by_source(&mut self, source: SourceId) -> Vec<LayerId> {
        let mut removed = Vec::new();
        self.layers.retain(|layer| {
            if layer.source == Some(source) {
                removed.push(layer.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// The layer that inherits selection after a removal at `index`: the
    /// one now at the same index, or the last.
    pub fn neighbor_of_removed(&self, index: usize) -> Option<LayerId> {
        let last = self.layers.len().checked_sub(1)?;
        self.layers.get(index.min(last)).map(|l| l.id)
    }

    /// Topmost layer containing `point`.
    pub fn layer_at_point(&self, point: Point) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.contains(point))
            .map(|layer| layer.id)
    }

    /// Move a layer's top-left corner, keeping the whole rect on the canvas.
    pub fn move_to(&mut self, id: LayerId, origin: Point, canvas: Size) -> Result<Point> {
        let layer = self.get_mut(id).ok_or(EditorError::LayerNotFound(id))?;
        let x = origin.x.clamp(0.0, (canvas.width - layer.width).max(0.0));
        let y = origin.y.clamp(0.0, (canvas.height - layer.height).max(0.0));
        layer.x = x;
        layer.y = y;
        Ok(Point::new(x, y))
    }

    /// Resize a layer from the rect the gesture started with.
    pub fn resize(
        &mut self,
        id: LayerId,
        start: Rect,
        handle: ResizeHandle,
        delta: Vec2,
        keep_aspect: bool,
        limits: ResizeLimits,
    ) -> Result<Rect> {
        let layer = self.get_mut(id).ok_or(EditorError::LayerNotFound(id))?;
        let rect = resize_rect(start, handle, delta, keep_aspect, limits);
        layer.set_bounds(rect);
        Ok(rect)
    }
}
