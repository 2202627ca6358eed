// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! The scene: background, layer stores, selection and view state.
//!
//! The canvas size is fixed at construction. Everything that touches both
//! stores at once (selection across layer kinds, removal that hands the
//! selection on) lives here so the stores stay independent of each other.

use super::{ImageAsset, LayerId, LayerRef, Selection, SourceId};
use crate::error::{EditorError, Result};
use crate::geometry::ViewState;
use crate::store::{ImageLayerStore, TextLayerStore};
use kurbo::Size;
use std::sync::Arc;

/// Root aggregate of one editor
#[derive(Debug, Clone)]
pub struct Scene {
    canvas_size: Size,
    pub background: Option<Arc<ImageAsset>>,
    pub images: ImageLayerStore,
    pub texts: TextLayerStore,
    pub selection: Selection,
    pub view: ViewState,
}

impl Scene {
    pub fn new(canvas_size: Size) -> Self {
        Self {
            canvas_size,
            background: None,
            images: ImageLayerStore::new(),
            texts: TextLayerStore::new(),
            selection: Selection::new(),
            view: ViewState::default(),
        }
    }

    /// Logical design size, unaffected by view mode
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Size of the space live layer geometry lives in: the canvas size,
    /// scaled down while the bottle view is active.
    pub fn display_size(&self) -> Size {
        let s = self.view.layer_scale();
        Size::new(self.canvas_size.width * s, self.canvas_size.height * s)
    }

    /// Whether a layer reference still points at a live layer
    pub fn contains(&self, layer: LayerRef) -> bool {
        match layer {
            LayerRef::Image(id) => self.images.get(id).is_some(),
            LayerRef::Text(id) => self.texts.get(id).is_some(),
        }
    }

    /// Select a layer, replacing any selection of either kind.
    pub fn select(&mut self, layer: LayerRef) -> Result<()> {
        if !self.contains(layer) {
            return Err(EditorError::LayerNotFound(layer.id()));
        }
        self.selection.select(layer);
        Ok(())
    }

    /// Remove an image layer. When the selection was on an image, it moves
    /// to the layer now at the same index, or the last one. Returns the
    /// newly selected layer, if any.
    pub fn remove_image(&mut self, id: LayerId) -> Result<Option<LayerId>> {
        let (index, _) = self.images.remove(id).ok_or(EditorError::LayerNotFound(id))?;
        tracing::debug!("[Scene::remove_image] {:?} at index {}", id, index);

        if self.selection.text().is_some() {
            return Ok(None);
        }
        match self.images.neighbor_of_removed(index) {
            Some(next) => {
                self.selection.select(LayerRef::Image(next));
                Ok(Some(next))
            }
            None => {
                self.selection.clear();
                Ok(None)
            }
        }
    }

    /// Remove every image layer placed from `source`. Returns how many
    /// layers went away.
    pub fn remove_images_by_source(&mut self, source: SourceId) -> usize {
        let removed = self.images.remove_by_source(source);
        for id in &removed {
            self.selection.forget(*id);
        }
        if !removed.is_empty() {
            tracing::debug!(
                "[Scene::remove_images_by_source] {:?} removed {} layer(s)",
                source,
                removed.len()
            );
        }
        removed.len()
    }

    /// Remove a text layer, clearing the selection if it pointed there.
    pub fn remove_text(&mut self, id: LayerId) -> Result<()> {
        self.texts.remove(id).ok_or(EditorError::LayerNotFound(id))?;
        self.selection.forget(id);
        Ok(())
    }

    /// Scale every layer's geometry by `factor`.
    pub fn scale_layers(&mut self, factor: f64) {
        for layer in self.images.iter_mut() {
            layer.scale_geometry(factor);
        }
        for layer in self.texts.iter_mut() {
            layer.scale_geometry(factor);
        }
    }
}
