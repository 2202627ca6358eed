// Copyright 2025 the Labelcraft Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor settings and geometry constants.
//!
//! This module holds non-visual settings that stay stable across theme
//! changes. Visual styling (colors, stroke widths) belongs in `theme.rs`.
//! Anything a deployment may want to tune is also reachable through
//! `EditorConfig`, which uses these values as its defaults.

// ============================================================================
// CANVAS SETTINGS
// ============================================================================
/// Logical design-space width
const CANVAS_WIDTH: f64 = 400.0;

/// Logical design-space height
const CANVAS_HEIGHT: f64 = 600.0;

// ============================================================================
// ZOOM SETTINGS
// ============================================================================
/// Minimum zoom level
const MIN_ZOOM: f64 = 0.5;

/// Maximum zoom level
const MAX_ZOOM: f64 = 3.0;

/// Multiplier applied by a single zoom-in / zoom-out step
const ZOOM_FACTOR: f64 = 1.5;

/// Level used by the zoom toggle when at 1:1
const TOGGLE_ZOOM_LEVEL: f64 = 1.5;

/// Zoom delta applied per wheel notch
const WHEEL_ZOOM_STEP: f64 = 0.2;

// ============================================================================
// IMAGE LAYER SETTINGS
// ============================================================================
/// Minimum width and height of an image layer after resize
const MIN_IMAGE_SIZE: f64 = 20.0;

/// Longer side of a newly placed image
const MAX_INITIAL_IMAGE_SIZE: f64 = 150.0;

/// Side length of a corner resize handle
const IMAGE_HANDLE_SIZE: f64 = 10.0;

/// Extra hit tolerance around each resize handle
const IMAGE_HANDLE_TOLERANCE: f64 = 6.0;

/// Diameter of the delete affordance
const DELETE_ICON_SIZE: f64 = 20.0;

/// Inset of the delete affordance from the image's top-right corner
const DELETE_ICON_PADDING: f64 = 8.0;

/// Extra hit area around the delete affordance
const DELETE_ICON_HIT_SLOP: f64 = 4.0;

// ============================================================================
// TEXT LAYER SETTINGS
// ============================================================================
const DEFAULT_TEXT: &str = "ENTER TEXT HERE";
const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_FONT_SIZE: f64 = 24.0;
const DEFAULT_LINE_HEIGHT: f64 = 1.2;
const DEFAULT_CURVE_ANGLE: f64 = 90.0;
const DEFAULT_CURVE_RADIUS: f64 = 2.0;
const DEFAULT_CURVE_SPACING: f64 = 1.0;

/// Bounds growth per active shadow or outline effect
const TEXT_EFFECT_PADDING: f64 = 4.0;

/// Padding around text bounds for hit testing and the selection outline
const TEXT_HIT_PADDING: f64 = 8.0;

/// Visible margin a dragged text layer must keep inside the canvas
const TEXT_EDGE_MARGIN: f64 = 20.0;

/// Side length of a text selection handle
const TEXT_HANDLE_SIZE: f64 = 8.0;

/// Advance used when no font face is available, as a fraction of the em
const FALLBACK_ADVANCE_EM: f64 = 0.6;

// ============================================================================
// BOTTLE VIEW SETTINGS
// ============================================================================
/// Label footprint on wide layouts
const DESKTOP_LABEL_WIDTH: f64 = 93.0;
const DESKTOP_LABEL_HEIGHT: f64 = 189.0;

/// Label footprint on compact layouts during the preview step
const COMPACT_LABEL_WIDTH: f64 = 61.722;
const COMPACT_LABEL_HEIGHT: f64 = 126.099;

/// Viewport widths at or below this use the compact label
const COMPACT_BREAKPOINT: f64 = 600.0;

/// Step during which the compact label applies
const COMPACT_STEP: u32 = 3;

// ============================================================================
// EXPORT SETTINGS
// ============================================================================
/// Resolution multiplier for the flat design export
const DESIGN_EXPORT_QUALITY: f64 = 4.0;

/// Resolution multiplier for the bottle preview composite
const PREVIEW_EXPORT_QUALITY: f64 = 8.0;

/// Resolution multiplier of the design rendered into the preview overlay
const PREVIEW_DESIGN_QUALITY: f64 = 4.0;

/// Mockup base size before the preview multiplier
const MOCKUP_WIDTH: f64 = 98.0;
const MOCKUP_HEIGHT: f64 = 446.0;

/// Label overlay rectangle on the mockup, in mockup base units
const OVERLAY_X: f64 = 2.0;
const OVERLAY_Y: f64 = 178.4;
const OVERLAY_WIDTH: f64 = 92.0;
const OVERLAY_HEIGHT: f64 = 189.0;

/// Step requested after a theme background is applied
const THEME_APPLIED_STEP: u32 = 2;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Logical canvas dimensions
pub mod canvas {
    pub const WIDTH: f64 = super::CANVAS_WIDTH;
    pub const HEIGHT: f64 = super::CANVAS_HEIGHT;
}

/// Zoom limits and step sizes
pub mod zoom {
    /// Minimum zoom level
    pub const MIN: f64 = super::MIN_ZOOM;

    /// Maximum zoom level
    pub const MAX: f64 = super::MAX_ZOOM;

    /// Zoom in/out multiplier
    pub const FACTOR: f64 = super::ZOOM_FACTOR;

    /// Target of the 1:1 toggle
    pub const TOGGLE_LEVEL: f64 = super::TOGGLE_ZOOM_LEVEL;

    /// Zoom delta per wheel notch
    pub const WHEEL_STEP: f64 = super::WHEEL_ZOOM_STEP;
}

/// Image layer geometry
pub mod image {
    pub const MIN_SIZE: f64 = super::MIN_IMAGE_SIZE;
    pub const MAX_INITIAL_SIZE: f64 = super::MAX_INITIAL_IMAGE_SIZE;
    pub const HANDLE_SIZE: f64 = super::IMAGE_HANDLE_SIZE;
    pub const HANDLE_TOLERANCE: f64 = super::IMAGE_HANDLE_TOLERANCE;

    /// Delete affordance drawn on the selected image
    pub mod delete_icon {
        pub const SIZE: f64 = super::super::DELETE_ICON_SIZE;
        pub const PADDING: f64 = super::super::DELETE_ICON_PADDING;
        pub const HIT_SLOP: f64 = super::super::DELETE_ICON_HIT_SLOP;
    }
}

/// Text layer defaults and geometry
pub mod text {
    pub const DEFAULT_TEXT: &str = super::DEFAULT_TEXT;
    pub const DEFAULT_FONT_FAMILY: &str = super::DEFAULT_FONT_FAMILY;
    pub const DEFAULT_FONT_SIZE: f64 = super::DEFAULT_FONT_SIZE;
    pub const DEFAULT_LINE_HEIGHT: f64 = super::DEFAULT_LINE_HEIGHT;
    pub const EFFECT_PADDING: f64 = super::TEXT_EFFECT_PADDING;
    pub const HIT_PADDING: f64 = super::TEXT_HIT_PADDING;
    pub const EDGE_MARGIN: f64 = super::TEXT_EDGE_MARGIN;
    pub const HANDLE_SIZE: f64 = super::TEXT_HANDLE_SIZE;
    pub const FALLBACK_ADVANCE_EM: f64 = super::FALLBACK_ADVANCE_EM;

    /// Curve parameter defaults
    pub mod curve {
        pub const ANGLE: f64 = super::super::DEFAULT_CURVE_ANGLE;
        pub const RADIUS: f64 = super::super::DEFAULT_CURVE_RADIUS;
        pub const SPACING: f64 = super::super::DEFAULT_CURVE_SPACING;
    }
}

/// Bottle view label footprints
pub mod bottle {
    pub const DESKTOP_LABEL_WIDTH: f64 = super::DESKTOP_LABEL_WIDTH;
    pub const DESKTOP_LABEL_HEIGHT: f64 = super::DESKTOP_LABEL_HEIGHT;
    pub const COMPACT_LABEL_WIDTH: f64 = super::COMPACT_LABEL_WIDTH;
    pub const COMPACT_LABEL_HEIGHT: f64 = super::COMPACT_LABEL_HEIGHT;
    pub const COMPACT_BREAKPOINT: f64 = super::COMPACT_BREAKPOINT;
    pub const COMPACT_STEP: u32 = super::COMPACT_STEP;
}

/// Export resolution and bottle preview composite geometry
pub mod export {
    pub const DESIGN_QUALITY: f64 = super::DESIGN_EXPORT_QUALITY;
    pub const PREVIEW_QUALITY: f64 = super::PREVIEW_EXPORT_QUALITY;
    pub const PREVIEW_DESIGN_QUALITY: f64 = super::PREVIEW_DESIGN_QUALITY;
    pub const MOCKUP_WIDTH: f64 = super::MOCKUP_WIDTH;
    pub const MOCKUP_HEIGHT: f64 = super::MOCKUP_HEIGHT;
    pub const OVERLAY_X: f64 = super::OVERLAY_X;
    pub const OVERLAY_Y: f64 = super::OVERLAY_Y;
    pub const OVERLAY_WIDTH: f64 = super::OVERLAY_WIDTH;
    pub const OVERLAY_HEIGHT: f64 = super::OVERLAY_HEIGHT;
}

/// Step navigation signals
pub mod steps {
    /// Step requested once a theme background is in place
    pub const THEME_APPLIED: u32 = super::THEME_APPLIED_STEP;
}
