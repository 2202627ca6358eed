// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Cursor shape requested by the interaction controller

use crate::model::ResizeHandle;

/// Cursor the host should show over the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a draggable layer, or anywhere on a zoomed-in canvas
    Grab,
    /// While dragging a layer or panning
    Grabbing,
    /// Over the delete affordance
    Pointer,
    /// Over, or dragging, a resize handle
    Resize(ResizeHandle),
}

impl CursorHint {
    /// CSS cursor keyword
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Pointer => "pointer",
            Self::Resize(ResizeHandle::TopLeft | ResizeHandle::BottomRight) => "nwse-resize",
            Self::Resize(ResizeHandle::TopRight | ResizeHandle::BottomLeft) => "nesw-resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_handles_share_cursor() {
        assert_eq!(CursorHint::Resize(ResizeHandle::TopLeft).css(), "nwse-resize");
        assert_eq!(CursorHint::Resize(ResizeHandle::BottomRight).css(), "nwse-resize");
        assert_eq!(CursorHint::Resize(ResizeHandle::TopRight).css(), "nesw-resize");
        assert_eq!(CursorHint::default().css(), "default");
    }
}
