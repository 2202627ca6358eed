// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Theme colors and stroke constants for selection chrome and text effects
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use peniko::Color;

// ============================================================================
// BASE COLORS
// ============================================================================
const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);
const BLACK: Color = Color::from_rgb8(0x00, 0x00, 0x00);
const WHITE_SOFT: Color = Color::from_rgba8(0xff, 0xff, 0xff, 0x99);

// ============================================================================
// IMAGE SELECTION -- Dashed outline and corner handles on the selected image
// ============================================================================
const IMAGE_SELECTION_OUTLINE: Color = Color::from_rgb8(0x67, 0xb7, 0xa8);
const IMAGE_HANDLE_FILL: Color = Color::from_rgb8(0x4a, 0x9b, 0x8e);

// ============================================================================
// DELETE AFFORDANCE -- Red disc with a white cross
// ============================================================================
const DELETE_ICON_FILL: Color = Color::from_rgb8(0xff, 0x44, 0x44);

// ============================================================================
// TEXT SELECTION
// ============================================================================
const TEXT_SELECTION_OUTLINE: Color = Color::from_rgb8(0x00, 0x66, 0xff);
const TEXT_HANDLE_FILL: Color = Color::from_rgb8(0x00, 0x44, 0xcc);

// ============================================================================
// TEXT EFFECTS
// ============================================================================
const TEXT_SHADOW: Color = Color::from_rgba8(0x00, 0x00, 0x00, 0x80);
const TEXT_OUTLINE: Color = BLACK;

// ============================================================================
// STROKES
// ============================================================================
const SELECTION_OUTLINE_WIDTH: f64 = 2.0;
const SELECTION_INNER_WIDTH: f64 = 1.0;
const SELECTION_DASH: [f64; 2] = [8.0, 4.0];
const HANDLE_BORDER_WIDTH: f64 = 1.5;
const DELETE_ICON_BORDER_WIDTH: f64 = 2.0;
const DELETE_ICON_CROSS_WIDTH: f64 = 2.5;
const DELETE_ICON_CROSS_SIZE: f64 = 7.0;
const TEXT_OUTLINE_WIDTH: f64 = 2.0;
const TEXT_SHADOW_BLUR: f64 = 4.0;
const TEXT_SHADOW_OFFSET: f64 = 2.0;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Selection chrome drawn around the selected image layer
pub mod image_selection {
    use super::Color;

    pub const OUTLINE: Color = super::IMAGE_SELECTION_OUTLINE;
    pub const INNER: Color = super::WHITE_SOFT;
    /// Outline offset outside the image rect
    pub const OUTLINE_INSET: f64 = 3.0;
    /// Inner line offset outside the image rect
    pub const INNER_INSET: f64 = 2.0;
    pub const HANDLE_FILL: Color = super::IMAGE_HANDLE_FILL;
    pub const HANDLE_BORDER: Color = super::WHITE;
}

/// Delete affordance on the selected image
pub mod delete_icon {
    use super::Color;

    pub const FILL: Color = super::DELETE_ICON_FILL;
    pub const BORDER: Color = super::WHITE;
    pub const BORDER_WIDTH: f64 = super::DELETE_ICON_BORDER_WIDTH;
    pub const CROSS: Color = super::WHITE;
    pub const CROSS_WIDTH: f64 = super::DELETE_ICON_CROSS_WIDTH;
    /// Extent of the cross, edge to edge
    pub const CROSS_SIZE: f64 = super::DELETE_ICON_CROSS_SIZE;
}

/// Selection chrome drawn around the selected text layer
pub mod text_selection {
    use super::Color;

    pub const OUTLINE: Color = super::TEXT_SELECTION_OUTLINE;
    pub const INNER: Color = super::WHITE_SOFT;
    pub const HANDLE_FILL: Color = super::TEXT_HANDLE_FILL;
    pub const HANDLE_BORDER: Color = super::WHITE;
}

/// Stroke widths and dash pattern shared by all selection chrome
pub mod selection_stroke {
    pub const OUTLINE_WIDTH: f64 = super::SELECTION_OUTLINE_WIDTH;
    pub const INNER_WIDTH: f64 = super::SELECTION_INNER_WIDTH;
    pub const DASH: [f64; 2] = super::SELECTION_DASH;
    pub const HANDLE_BORDER_WIDTH: f64 = super::HANDLE_BORDER_WIDTH;
}

/// Text shadow and outline effects
pub mod text_effects {
    use super::Color;

    pub const SHADOW: Color = super::TEXT_SHADOW;
    pub const SHADOW_BLUR: f64 = super::TEXT_SHADOW_BLUR;
    pub const SHADOW_OFFSET: f64 = super::TEXT_SHADOW_OFFSET;
    pub const OUTLINE: Color = super::TEXT_OUTLINE;
    pub const OUTLINE_WIDTH: f64 = super::TEXT_OUTLINE_WIDTH;
}

/// Default text fill
pub mod text {
    use super::Color;

    pub const DEFAULT_FILL: Color = super::BLACK;
}
