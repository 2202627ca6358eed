// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! The single selected layer.
//!
//! At most one layer is selected at a time, and it is either an image or a
//! text layer. Encoding that as an enum makes "image A and text B both
//! selected" unrepresentable: selecting one kind replaces the other.

use super::LayerId;

/// Which kind of layer an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRef {
    Image(LayerId),
    Text(LayerId),
}

impl LayerRef {
    pub fn id(self) -> LayerId {
        match self {
            Self::Image(id) | Self::Text(id) => id,
        }
    }
}

/// The current selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Image(LayerId),
    Text(LayerId),
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::None
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The selected image, if the selection is an image
    pub fn image(&self) -> Option<LayerId> {
        match self {
            Self::Image(id) => Some(*id),
            _ => None,
        }
    }

    /// The selected text layer, if the selection is text
    pub fn text(&self) -> Option<LayerId> {
        match self {
            Self::Text(id) => Some(*id),
            _ => None,
        }
    }

    /// Check if a layer is selected
    pub fn contains(&self, layer: LayerRef) -> bool {
        self.layer() == Some(layer)
    }

    /// The selected layer as a tagged reference
    pub fn layer(&self) -> Option<LayerRef> {
        match self {
            Self::None => None,
            Self::Image(id) => Some(LayerRef::Image(*id)),
            Self::Text(id) => Some(LayerRef::Text(*id)),
        }
    }

    /// Select a layer, replacing whatever was selected
    pub fn select(&mut self, layer: LayerRef) {
        *self = match layer {
            LayerRef::Image(id) => Self::Image(id),
            LayerRef::Text(id) => Self::Text(id),
        };
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        *self = Self::None;
    }

    /// Clear the selection if it refers to `id`. Returns true if it did.
    pub fn forget(&mut self, id: LayerId) -> bool {
        if self.layer().map(LayerRef::id) == Some(id) {
            self.clear();
            true
        } else {
            false
        }
    }
}

impl From<LayerRef> for Selection {
    fn from(layer: LayerRef) -> Self {
        let mut sel = Self::new();
        sel.select(layer);
        sel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_selection_is_empty() {
        let sel = Selection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.layer(), None);
    }

    #[test]
    fn select_and_contains() {
        let mut sel = Selection::new();
        let id = LayerId::next();
        sel.select(LayerRef::Image(id));

        assert!(sel.contains(LayerRef::Image(id)));
        assert!(!sel.contains(LayerRef::Text(id)));
        assert_eq!(sel.image(), Some(id));
        assert_eq!(sel.text(), None);
    }

    #[test]
    fn selecting_text_deselects_image() {
        let mut sel = Selection::new();
        let image = LayerId::next();
        let text = LayerId::next();
        sel.select(LayerRef::Image(image));
        sel.select(LayerRef::Text(text));

        assert_eq!(sel.image(), None);
        assert_eq!(sel.text(), Some(text));
    }

    #[test]
    fn forget_only_clears_matching_id() {
        let mut sel = Selection::from(LayerRef::Text(LayerId::next()));
        assert!(!sel.forget(LayerId::next()));
        assert!(!sel.is_empty());

        let id = sel.text().unwrap();
        assert!(sel.forget(id));
        assert!(sel.is_empty());
    }
}
